use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::storage::StorageError;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Stream a stored asset.
///
/// Asset paths are unique per upload and never rewritten, so responses are
/// cacheable indefinitely.
#[instrument(skip(state))]
pub async fn serve_media(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let size = state.assets.size(&path).await.map_err(map_storage_error)?;
    let reader = state
        .assets
        .get_stream(&path)
        .await
        .map_err(map_storage_error)?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

fn map_storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(_) | StorageError::InvalidPath(_) => {
            AppError::NotFound("Asset not found".into())
        }
        other => AppError::Internal(other.to_string()),
    }
}
