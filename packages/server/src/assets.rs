//! Asset lifecycle for content records.
//!
//! A save that carries a new image runs in three steps: upload the new
//! object, persist the record with the new URL, then best-effort delete the
//! replaced object. A crash between steps can leave a dangling-but-intact
//! object in the store, never a record pointing at a deleted one.

use chrono::Utc;
use common::storage::{AssetPath, AssetStore};

use crate::error::AppError;
use crate::schema::EntitySchema;

/// An uploaded file received from a form, ready for the asset store.
pub struct NewAsset {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Outcome of staging the asset work for one save operation.
///
/// Holds the URL to persist plus the deferred cleanup decisions; exactly one
/// of [`commit`] or [`abort`] must run after the document write.
#[derive(Debug)]
pub struct StagedAsset {
    /// URL to persist on the record.
    pub final_url: Option<String>,
    /// Freshly uploaded URL, removed again if the document write fails.
    uploaded: Option<String>,
    /// Replaced owned URL, removed best-effort once the document write
    /// succeeds.
    cleanup: Option<String>,
}

/// Decide the asset URL for a save and perform any upload.
///
/// Without a new file the previous URL passes through unchanged. With one,
/// the file is uploaded first; an upload failure aborts the whole save
/// before anything is written. A previous URL is only scheduled for cleanup
/// when the store recognizes it as its own — externally hosted images are
/// left untouched.
pub async fn stage(
    store: &dyn AssetStore,
    schema: &EntitySchema,
    new_file: Option<NewAsset>,
    previous_url: Option<&str>,
) -> Result<StagedAsset, AppError> {
    let Some(file) = new_file else {
        return Ok(StagedAsset {
            final_url: previous_url.map(str::to_string),
            uploaded: None,
            cleanup: None,
        });
    };

    let path = AssetPath::generate(schema.asset_prefix, &file.filename, Utc::now())
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let url = store
        .put(&file.bytes, &path)
        .await
        .map_err(|e| AppError::AssetUpload(e.to_string()))?;

    let cleanup = previous_url
        .filter(|prev| store.owns_url(prev))
        .map(str::to_string);

    Ok(StagedAsset {
        final_url: Some(url.clone()),
        uploaded: Some(url),
        cleanup,
    })
}

/// Finish the asset work after the document write succeeded: best-effort
/// removal of the replaced object.
pub async fn commit(store: &dyn AssetStore, staged: StagedAsset) {
    if let Some(old) = staged.cleanup {
        discard(store, &old).await;
    }
}

/// Undo the asset work after the document write failed: best-effort removal
/// of the fresh upload so the orphan is bounded.
pub async fn abort(store: &dyn AssetStore, staged: StagedAsset) {
    if let Some(url) = staged.uploaded {
        discard(store, &url).await;
    }
}

/// Best-effort delete of an owned asset URL. Failures are logged and
/// swallowed; cleanup must never block the enclosing operation.
pub async fn discard(store: &dyn AssetStore, url: &str) {
    if !store.owns_url(url) {
        return;
    }
    match store.delete_url(url).await {
        Ok(_) => {}
        Err(e) => tracing::warn!(url, error = %e, "failed to delete replaced asset"),
    }
}
