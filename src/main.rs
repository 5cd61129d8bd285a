use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    focus_shield_cli::cli::app::run().await
}
