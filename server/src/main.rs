use std::sync::Arc;

use anyhow::Context;
use todo_core::{MemoryStore, Repositories};
use todo_server::{telemetry, AppState, Config};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init();
    info!(?config, "loaded configuration");

    let store = Arc::new(MemoryStore::new());
    if let Some(path) = &config.seed_file {
        let seed = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading seed file {}", path.display()))?;
        store.load_seed(&seed).await?;
    }

    let addr = config.addr();
    let state = AppState::new(config, Repositories::from_backend(store))?;

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    todo_server::run(listener, state).await?;
    Ok(())
}
