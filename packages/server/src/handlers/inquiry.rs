use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::InquiryStatus;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::session::StaffSession;
use crate::models::inquiry::{
    CreateInquiryRequest, InquiryListQuery, InquiryListResponse, InquiryResponse,
    SetInquiryStatusRequest,
};
use crate::models::shared::Pagination;
use crate::state::AppState;
use crate::workflow;

#[utoipa::path(
    post,
    path = "/inquiries",
    tag = "Public",
    operation_id = "submitInquiry",
    summary = "Submit a visitor inquiry",
    description = "The contact-form write path. New inquiries always start `Pending`.",
    request_body = CreateInquiryRequest,
    responses(
        (status = 201, description = "Inquiry recorded", body = InquiryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(subject = %payload.subject))]
pub async fn submit_inquiry(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateInquiryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let model = workflow::create(&state.db, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(InquiryResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Inquiries",
    operation_id = "listInquiries",
    summary = "List inquiries for triage",
    description = "Returns inquiries newest-first with optional status filter and pagination.",
    params(InquiryListQuery),
    responses(
        (status = 200, description = "Inquiry list", body = InquiryListResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session, query))]
pub async fn list_inquiries(
    _session: StaffSession,
    State(state): State<AppState>,
    Query(query): Query<InquiryListQuery>,
) -> Result<Json<InquiryListResponse>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            s.parse::<InquiryStatus>()
                .map_err(|e| AppError::Validation(e.to_string()))
        })
        .transpose()?;

    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let (records, total) = workflow::list(&state.db, status, page, per_page).await?;

    let data = records.into_iter().map(InquiryResponse::from).collect();
    let total_pages = total.div_ceil(per_page);

    Ok(Json(InquiryListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Inquiries",
    operation_id = "getInquiry",
    summary = "Get an inquiry",
    params(("id" = String, Path, description = "Inquiry ID (UUID)")),
    responses(
        (status = 200, description = "Inquiry details", body = InquiryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Inquiry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session), fields(id))]
pub async fn get_inquiry(
    _session: StaffSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InquiryResponse>, AppError> {
    let model = workflow::get(&state.db, parse_id(&id)?).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/{id}/assign",
    tag = "Inquiries",
    operation_id = "assignInquiry",
    summary = "Take ownership of a pending inquiry",
    description = "Moves a `Pending` inquiry to `InProgress`. Inquiries in any other state are \
        rejected with 409; assignment only moves forward from `Pending`.",
    params(("id" = String, Path, description = "Inquiry ID (UUID)")),
    responses(
        (status = 200, description = "Inquiry assigned", body = InquiryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Inquiry not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Not pending (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(id, staff = %session.staff_id))]
pub async fn assign_inquiry(
    session: StaffSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InquiryResponse>, AppError> {
    let model = workflow::assign(&state.db, parse_id(&id)?).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = "Inquiries",
    operation_id = "setInquiryStatus",
    summary = "Transition an inquiry",
    description = "Explicit staff transition to any status. Resolving stamps `resolved_at` and \
        stores the response if one is provided; leaving `Resolved` clears `resolved_at` but keeps \
        the stored response so it can be revised and re-sent without retyping.",
    params(("id" = String, Path, description = "Inquiry ID (UUID)")),
    request_body = SetInquiryStatusRequest,
    responses(
        (status = 200, description = "Inquiry updated", body = InquiryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Inquiry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session, payload), fields(id, staff = %session.staff_id))]
pub async fn set_inquiry_status(
    session: StaffSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<SetInquiryStatusRequest>,
) -> Result<Json<InquiryResponse>, AppError> {
    let model = workflow::set_status(
        &state.db,
        parse_id(&id)?,
        payload.status,
        payload.response,
    )
    .await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Inquiries",
    operation_id = "deleteInquiry",
    summary = "Delete an inquiry",
    description = "Hard delete, allowed from any state.",
    params(("id" = String, Path, description = "Inquiry ID (UUID)")),
    responses(
        (status = 204, description = "Inquiry deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Inquiry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(id, staff = %session.staff_id))]
pub async fn delete_inquiry(
    session: StaffSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    workflow::delete(&state.db, parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::Validation("Invalid inquiry ID".into()))
}
