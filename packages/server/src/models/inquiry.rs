use chrono::{DateTime, Utc};
use common::InquiryStatus;
use serde::{Deserialize, Serialize};

use crate::workflow::NewInquiry;

use super::shared::Pagination;

/// Contact-form submission body.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateInquiryRequest {
    #[schema(example = "Lee")]
    pub name: String,
    /// Phone number or email address to reach the visitor.
    #[schema(example = "010-1234-5678")]
    pub contact: String,
    #[schema(example = "Tour request")]
    pub subject: String,
    pub message: String,
    /// Optional free-form service category.
    pub service_tag: Option<String>,
}

impl From<CreateInquiryRequest> for NewInquiry {
    fn from(req: CreateInquiryRequest) -> Self {
        Self {
            name: req.name,
            contact: req.contact,
            subject: req.subject,
            message: req.message,
            service_tag: req.service_tag,
        }
    }
}

/// Staff transition request.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetInquiryStatusRequest {
    pub status: InquiryStatus,
    /// Staff reply; only accepted when `status` is `Resolved`.
    pub response: Option<String>,
}

/// Response DTO for a single inquiry.
#[derive(Serialize, utoipa::ToSchema)]
pub struct InquiryResponse {
    /// Inquiry ID (UUIDv7).
    pub id: String,
    pub name: String,
    pub contact: String,
    pub subject: String,
    pub message: String,
    pub service_tag: Option<String>,
    pub status: InquiryStatus,
    pub response: Option<String>,
    /// Present exactly while `status == Resolved`.
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Response DTO for the triage listing.
#[derive(Serialize, utoipa::ToSchema)]
pub struct InquiryListResponse {
    pub data: Vec<InquiryResponse>,
    pub pagination: Pagination,
}

impl From<crate::entity::inquiry::Model> for InquiryResponse {
    fn from(m: crate::entity::inquiry::Model) -> Self {
        Self {
            id: m.id.to_string(),
            name: m.name,
            contact: m.contact,
            subject: m.subject,
            message: m.message,
            service_tag: m.service_tag,
            status: m.status,
            response: m.response,
            resolved_at: m.resolved_at,
            created_at: m.created_at,
        }
    }
}

/// Query parameters for the triage listing.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InquiryListQuery {
    /// Filter by status (`Pending`, `InProgress`, `Resolved`).
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}
