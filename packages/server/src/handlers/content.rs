use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use uuid::Uuid;

use crate::assets::NewAsset;
use crate::error::{AppError, ErrorBody};
use crate::extractors::session::StaffSession;
use crate::models::content::{
    ContentListQuery, ContentListResponse, ContentResponse, CreateContentData, UpdateContentData,
};
use crate::repository::{self, ListFilter};
use crate::schema::EntitySchema;
use crate::state::AppState;

/// Body limit layer for content save routes (covers the image plus the JSON
/// part).
pub fn content_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(32 * 1024 * 1024) // 32 MB
}

#[utoipa::path(
    get,
    path = "/{collection}",
    tag = "Content",
    operation_id = "listContent",
    summary = "List a content collection",
    description = "Returns all records of a collection in display order. Staff see inactive \
        records too; pass `active=true` to preview the public listing.",
    params(
        ("collection" = String, Path, description = "Collection name (e.g. advisors, facilities)"),
        ContentListQuery,
    ),
    responses(
        (status = 200, description = "Collection records", body = ContentListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown collection (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session, query), fields(collection))]
pub async fn list_content(
    _session: StaffSession,
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<ContentListQuery>,
) -> Result<Json<ContentListResponse>, AppError> {
    let schema = find_schema(&collection)?;

    let filter = ListFilter {
        active: query.active,
    };
    let records = repository::list(&state.db, schema, filter).await?;

    let total = records.len() as u64;
    let data = records.into_iter().map(ContentResponse::from).collect();

    Ok(Json(ContentListResponse { data, total }))
}

#[utoipa::path(
    get,
    path = "/{collection}/{id}",
    tag = "Content",
    operation_id = "getContent",
    summary = "Get a content record",
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Record ID (UUID)"),
    ),
    responses(
        (status = 200, description = "Record details", body = ContentResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Record or collection not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session), fields(collection, id))]
pub async fn get_content(
    _session: StaffSession,
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<ContentResponse>, AppError> {
    let schema = find_schema(&collection)?;
    let id = parse_id(&id)?;

    let record = repository::get(&state.db, schema, id).await?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    post,
    path = "/{collection}",
    tag = "Content",
    operation_id = "createContent",
    summary = "Create a content record",
    description = "Creates a record from a multipart form. The `data` part holds the JSON field \
        payload; the optional `file` part attaches an image. The image is uploaded before the \
        record is written, so a failed upload leaves no record behind.",
    params(("collection" = String, Path, description = "Collection name")),
    request_body(content_type = "multipart/form-data", description = "`data` JSON part plus optional `file` image part"),
    responses(
        (status = 201, description = "Record created", body = ContentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown collection (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Image upload failed (ASSET_UPLOAD_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session, multipart), fields(collection, staff = %session.staff_id))]
pub async fn create_content(
    session: StaffSession,
    State(state): State<AppState>,
    Path(collection): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let schema = find_schema(&collection)?;

    let upload = read_save_upload(multipart, state.config.storage.max_asset_size).await?;
    let data: CreateContentData = match upload.data {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| AppError::Validation(format!("Invalid 'data' payload: {e}")))?,
        None => return Err(AppError::Validation("Missing 'data' field".into())),
    };

    let record = repository::create(
        &state.db,
        &*state.assets,
        schema,
        data.into(),
        upload.file,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ContentResponse::from(record))))
}

#[utoipa::path(
    patch,
    path = "/{collection}/{id}",
    tag = "Content",
    operation_id = "updateContent",
    summary = "Update a content record",
    description = "Partially updates a record from a multipart form using PATCH semantics — only \
        fields present in the `data` part are modified. A `file` part replaces the record's image; \
        the previous owned image is deleted best-effort after the record is written. A form with \
        neither part returns the record unchanged.",
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Record ID (UUID)"),
    ),
    request_body(content_type = "multipart/form-data", description = "Optional `data` JSON part plus optional `file` image part"),
    responses(
        (status = 200, description = "Record updated", body = ContentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Record or collection not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Image upload failed (ASSET_UPLOAD_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session, multipart), fields(collection, id, staff = %session.staff_id))]
pub async fn update_content(
    session: StaffSession,
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<Json<ContentResponse>, AppError> {
    let schema = find_schema(&collection)?;
    let id = parse_id(&id)?;

    let upload = read_save_upload(multipart, state.config.storage.max_asset_size).await?;
    let data: UpdateContentData = match upload.data {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| AppError::Validation(format!("Invalid 'data' payload: {e}")))?,
        None => UpdateContentData::default(),
    };

    let record = repository::update(
        &state.db,
        &*state.assets,
        schema,
        id,
        data.into(),
        upload.file,
    )
    .await?;

    Ok(Json(record.into()))
}

#[utoipa::path(
    delete,
    path = "/{collection}/{id}",
    tag = "Content",
    operation_id = "deleteContent",
    summary = "Delete a content record",
    description = "Permanently deletes the record and best-effort deletes its owned image.",
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Record ID (UUID)"),
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Record or collection not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(collection, id, staff = %session.staff_id))]
pub async fn delete_content(
    session: StaffSession,
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let schema = find_schema(&collection)?;
    let id = parse_id(&id)?;

    repository::delete(&state.db, &*state.assets, schema, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{collection}/{id}/toggle-active",
    tag = "Content",
    operation_id = "toggleContentActive",
    summary = "Toggle a record's active flag",
    description = "Flips `is_active` without touching fields or the image.",
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Record ID (UUID)"),
    ),
    responses(
        (status = 200, description = "Record updated", body = ContentResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Record or collection not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(collection, id, staff = %session.staff_id))]
pub async fn toggle_content_active(
    session: StaffSession,
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<ContentResponse>, AppError> {
    let schema = find_schema(&collection)?;
    let id = parse_id(&id)?;

    let record = repository::toggle_active(&state.db, schema, id).await?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    get,
    path = "/content/{collection}",
    tag = "Public",
    operation_id = "listPublicContent",
    summary = "List active records of a collection",
    description = "The read surface for the public site: active records only, in display order.",
    params(("collection" = String, Path, description = "Collection name")),
    responses(
        (status = 200, description = "Active records", body = ContentListResponse),
        (status = 404, description = "Unknown collection (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(collection))]
pub async fn list_public_content(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<ContentListResponse>, AppError> {
    let schema = find_schema(&collection)?;

    let filter = ListFilter { active: Some(true) };
    let records = repository::list(&state.db, schema, filter).await?;

    let total = records.len() as u64;
    let data = records.into_iter().map(ContentResponse::from).collect();

    Ok(Json(ContentListResponse { data, total }))
}

fn find_schema(collection: &str) -> Result<&'static EntitySchema, AppError> {
    EntitySchema::lookup(collection)
        .ok_or_else(|| AppError::NotFound(format!("Unknown collection '{collection}'")))
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::Validation("Invalid record ID".into()))
}

/// Parts of a content save form.
struct SaveUpload {
    data: Option<String>,
    file: Option<NewAsset>,
}

/// Read the `data` and `file` parts of a save form. The file is buffered in
/// memory with a running size check; images beyond the configured limit are
/// rejected before any store I/O.
async fn read_save_upload(
    mut multipart: Multipart,
    max_size: u64,
) -> Result<SaveUpload, AppError> {
    let mut data: Option<String> = None;
    let mut file: Option<NewAsset> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("data") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read data: {e}")))?;
                data = Some(text);
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| {
                        AppError::Validation("File field must have a filename".into())
                    })?;

                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
                {
                    if (bytes.len() + chunk.len()) as u64 > max_size {
                        return Err(AppError::Validation(format!(
                            "File exceeds maximum size of {max_size} bytes"
                        )));
                    }
                    bytes.extend_from_slice(&chunk);
                }

                file = Some(NewAsset { filename, bytes });
            }
            _ => {} // Ignore unknown fields.
        }
    }

    Ok(SaveUpload { data, file })
}
