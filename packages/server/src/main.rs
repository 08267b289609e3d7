use std::sync::Arc;

use tracing::{Level, info};

use common::storage::filesystem::FilesystemAssetStore;
use server::config::AppConfig;
use server::state::AppState;
use server::{database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    seed::ensure_indexes(&db).await?;

    let assets = FilesystemAssetStore::new(
        config.storage.media_root.clone(),
        config.storage.public_base_url.clone(),
        config.storage.max_asset_size,
    )
    .await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        db,
        assets: Arc::new(assets),
        config: Arc::new(config),
    };

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Atrium admin API listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
