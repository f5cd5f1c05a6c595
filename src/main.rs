use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    serper_hub::cli::run().await
}
