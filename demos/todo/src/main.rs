//! Terminal todo list.
//!
//! Logs go to stderr (filter with `RUST_LOG`); the list is drawn on stdout.

use anyhow::Context;
use todo::{run, store_from_config, TodoConfig};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo=info,composable_todo_runtime=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = TodoConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "Starting todo list");

    let store = store_from_config(&config);
    run(&store, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("todo prompt failed")?;

    Ok(())
}
