use std::sync::Arc;
use tokio::net::TcpListener;

use notekeep::{config::Settings, routes, store::MemStore, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notekeep=info,tower_http=info".into()),
        )
        .init();

    let settings = Settings::load()?;
    let bind_addr = settings.bind_addr;

    let store = Arc::new(MemStore::new());
    let state = Arc::new(AppState::new(store, settings));

    let app = routes::create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
