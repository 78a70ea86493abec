#[tokio::main]
async fn main() -> anyhow::Result<()> {
    probegate::cli::app::run().await
}
