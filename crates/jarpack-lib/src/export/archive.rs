//! Zip-backed jar writer
//!
//! Layout of a produced jar:
//! 1. `META-INF/MANIFEST.MF` (custom manifest verbatim, or a generated one)
//! 2. every source file at its archive destination
//! 3. the entries of every dependency jar, unpacked. Manifests, signature
//!    files and entries whose name is already taken are skipped.
//!
//! The jar is built in a temporary file next to the output and renamed over
//! it only once complete, so a failed write leaves any previous jar intact.

use crate::application::session::{ArchiveProvider, ProviderFuture};
use crate::display::ProgressTracker;
use crate::export::ClasspathEntry;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, Seek, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tokio::sync::mpsc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
const MANIFEST_VERSION: &str = "1.0";
const SIGNATURE_EXTENSIONS: &[&str] = &[".SF", ".RSA", ".DSA", ".EC"];

/// Everything the archive writer needs to produce one jar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveRequest {
    pub sources: Vec<ClasspathEntry>,
    pub dependencies: Vec<String>,
    pub main_class: Option<String>,
    pub manifest_path: Option<PathBuf>,
    pub output_path: PathBuf,
}

impl ArchiveRequest {
    /// Units of work reported to the progress tracker
    pub fn total_work(&self) -> u64 {
        (self.sources.len() + self.dependencies.len()) as u64
    }
}

/// Manifest text written when no custom manifest is given
pub fn default_manifest(main_class: Option<&str>) -> String {
    let mut manifest = format!("Manifest-Version: {}\r\n", MANIFEST_VERSION);
    if let Some(main_class) = main_class.filter(|m| !m.is_empty()) {
        manifest.push_str(&format!("Main-Class: {}\r\n", main_class));
    }
    manifest.push_str("Created-By: jarpack\r\n\r\n");
    manifest
}

/// Entries of dependency jars that never get copied into the output
fn is_excluded_dependency_entry(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    if upper == MANIFEST_PATH {
        return true;
    }
    upper.starts_with("META-INF/")
        && !upper["META-INF/".len()..].contains('/')
        && SIGNATURE_EXTENSIONS.iter().any(|ext| upper.ends_with(ext))
}

/// Temporary file in `dir` that inherits the usual umask-based mode
fn staging_file(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".jarpack-").suffix(".jar.tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Progress reported from the blocking writer thread
#[derive(Debug)]
enum ProgressEvent {
    Tick(String),
    Inc,
}

/// Forwards progress to the async side; finishing stays with the caller
struct ChannelProgress(mpsc::UnboundedSender<ProgressEvent>);

impl ProgressTracker for ChannelProgress {
    fn inc(&self) {
        let _ = self.0.send(ProgressEvent::Inc);
    }

    fn tick(&self, item: &str) {
        let _ = self.0.send(ProgressEvent::Tick(item.to_string()));
    }

    fn finish(&self, _message: &str) {}

    fn abandon(&self, _message: &str) {}
}

/// Live archive writer
#[derive(Debug, Clone, Default)]
pub struct ZipArchiveWriter;

impl ZipArchiveWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write the jar synchronously
    pub fn write(&self, request: &ArchiveRequest, progress: &dyn ProgressTracker) -> Result<PathBuf> {
        let output = &request.output_path;
        let parent = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;

        let staging = staging_file(parent)
            .with_context(|| format!("Failed to create jar {}", output.display()))?;
        let mut writer = ZipWriter::new(staging);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut written: HashSet<String> = HashSet::new();

        let manifest = match &request.manifest_path {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read manifest {}", path.display()))?,
            None => default_manifest(request.main_class.as_deref()),
        };
        writer
            .start_file(MANIFEST_PATH, options)
            .context("Failed to add manifest")?;
        writer
            .write_all(manifest.as_bytes())
            .context("Failed to write manifest")?;
        written.insert(MANIFEST_PATH.to_string());

        for entry in &request.sources {
            progress.tick(&entry.destination);
            if !written.insert(entry.destination.clone()) {
                tracing::debug!(destination = %entry.destination, "Entry already written");
                progress.inc();
                continue;
            }
            writer
                .start_file(entry.destination.as_str(), options)
                .with_context(|| format!("Failed to add {}", entry.destination))?;
            let mut input = File::open(&entry.source)
                .with_context(|| format!("Failed to open {}", entry.source))?;
            io::copy(&mut input, &mut writer)
                .with_context(|| format!("Failed to copy {}", entry.source))?;
            progress.inc();
        }

        for dependency in &request.dependencies {
            progress.tick(dependency);
            let copied = Self::unpack_dependency(&mut writer, Path::new(dependency), options, &mut written)?;
            tracing::debug!(dependency = %dependency, entries = copied, "Unpacked dependency");
            progress.inc();
        }

        let staging = writer.finish().context("Failed to finalize jar")?;
        staging
            .persist(output)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace jar {}", output.display()))?;
        tracing::info!(
            output = %output.display(),
            entries = written.len(),
            "Jar written"
        );
        Ok(output.clone())
    }

    fn unpack_dependency<W: Write + Seek>(
        writer: &mut ZipWriter<W>,
        dependency: &Path,
        options: SimpleFileOptions,
        written: &mut HashSet<String>,
    ) -> Result<usize> {
        let file = File::open(dependency)
            .with_context(|| format!("Failed to open dependency {}", dependency.display()))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .with_context(|| format!("Failed to read dependency {}", dependency.display()))?;

        let mut copied = 0;
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .with_context(|| format!("Failed to read entry {} of {}", index, dependency.display()))?;
            let name = entry.name().to_string();
            if entry.is_dir() || is_excluded_dependency_entry(&name) || written.contains(&name) {
                continue;
            }
            writer
                .start_file(name.as_str(), options)
                .with_context(|| format!("Failed to add {}", name))?;
            io::copy(&mut entry, writer).with_context(|| format!("Failed to copy {}", name))?;
            written.insert(name);
            copied += 1;
        }
        Ok(copied)
    }
}

impl ArchiveProvider for ZipArchiveWriter {
    fn write_archive<'a>(
        &'a self,
        request: &'a ArchiveRequest,
        progress: &'a dyn ProgressTracker,
    ) -> ProviderFuture<'a, PathBuf> {
        Box::pin(async move {
            let (sender, mut events) = mpsc::unbounded_channel();
            let writer = self.clone();
            let owned = request.clone();
            let task = tokio::task::spawn_blocking(move || {
                writer.write(&owned, &ChannelProgress(sender))
            });

            // The channel closes when the writer drops its sender
            while let Some(event) = events.recv().await {
                match event {
                    ProgressEvent::Tick(item) => progress.tick(&item),
                    ProgressEvent::Inc => progress.inc(),
                }
            }
            task.await.context("Jar writer did not complete")?
        })
    }
}

#[cfg(test)]
mod tests {
    include!("archive.test.rs");
}
