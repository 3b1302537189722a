#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jarpack_lib::main().await
}
