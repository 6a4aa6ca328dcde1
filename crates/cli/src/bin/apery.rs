use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    apery_cli::main_entry().await
}
