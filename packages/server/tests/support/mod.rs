#![allow(dead_code)]

use std::sync::Arc;

use common::storage::filesystem::FilesystemAssetStore;
use sea_orm::DatabaseConnection;
use serde_json::{Map, Value};

pub const MEDIA_BASE: &str = "http://127.0.0.1:3000/media";

/// One isolated database + asset store per test.
pub struct TestEnv {
    pub db: DatabaseConnection,
    pub assets: Arc<FilesystemAssetStore>,
    _dir: tempfile::TempDir,
}

pub async fn setup() -> TestEnv {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let db_path = dir.path().join("test.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let db = server::database::init_db(&url)
        .await
        .expect("Failed to initialize test database");

    let assets = FilesystemAssetStore::new(
        dir.path().join("media"),
        MEDIA_BASE.to_string(),
        10 * 1024 * 1024,
    )
    .await
    .expect("Failed to create asset store");

    TestEnv {
        db,
        assets: Arc::new(assets),
        _dir: dir,
    }
}

/// Build a field map from a JSON literal.
pub fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("expected a JSON object")
}

/// A small fake image upload.
pub fn image(name: &str) -> server::assets::NewAsset {
    server::assets::NewAsset {
        filename: name.to_string(),
        bytes: format!("png-bytes-of-{name}").into_bytes(),
    }
}
