/*
 * Responsibility
 * - start the tokio runtime
 * - call app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    groups_gate::app::run().await
}
