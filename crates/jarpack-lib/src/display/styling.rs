//! Semantic styles and symbols on top of `console`

use console::{Emoji, Style};

static CHECKMARK: Emoji<'_, '_> = Emoji("✓", "+");
static CROSS: Emoji<'_, '_> = Emoji("✗", "x");
static WARNING: Emoji<'_, '_> = Emoji("⚠", "!");
static INFO: Emoji<'_, '_> = Emoji("ℹ", "i");
static ARROW: Emoji<'_, '_> = Emoji("→", ">");
static BULLET: Emoji<'_, '_> = Emoji("•", "-");

/// Style manager for status output
#[derive(Debug, Clone)]
pub struct StyleManager {
    success: Style,
    error: Style,
    warning: Style,
    info: Style,
    emphasis: Style,
    subtle: Style,
}

impl StyleManager {
    pub fn new(color: bool) -> Self {
        let base = Style::new().force_styling(color);
        Self {
            success: base.clone().green(),
            error: base.clone().red(),
            warning: base.clone().yellow(),
            info: base.clone().cyan(),
            emphasis: base.clone().bold(),
            subtle: base.dim(),
        }
    }

    pub fn style_success(&self, text: &str) -> String {
        self.success.apply_to(text).to_string()
    }

    pub fn style_error(&self, text: &str) -> String {
        self.error.apply_to(text).to_string()
    }

    pub fn style_emphasis(&self, text: &str) -> String {
        self.emphasis.apply_to(text).to_string()
    }

    pub fn style_subtle(&self, text: &str) -> String {
        self.subtle.apply_to(text).to_string()
    }

    /// Format success message with symbol and styling
    pub fn format_success(&self, message: &str) -> String {
        format!("{} {}", self.success.apply_to(CHECKMARK), message)
    }

    /// Format error message with symbol and styling
    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", self.error.apply_to(CROSS), message)
    }

    pub fn format_warning(&self, message: &str) -> String {
        format!("{} {}", self.warning.apply_to(WARNING), message)
    }

    pub fn format_info(&self, message: &str) -> String {
        format!("{} {}", self.info.apply_to(INFO), message)
    }

    /// Format working/progress message (info color with arrow)
    pub fn format_working(&self, message: &str) -> String {
        format!("{} {}", self.info.apply_to(ARROW), message)
    }

    pub fn bullet(&self) -> String {
        BULLET.to_string()
    }
}

#[cfg(test)]
mod tests {
    include!("styling.test.rs");
}
