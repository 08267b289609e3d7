use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::repository::{CreateData, UpdateData};

use super::shared::double_option;

/// JSON payload carried in the `data` part of a create upload.
#[derive(Deserialize)]
pub struct CreateContentData {
    /// Field values per the collection's schema.
    pub fields: Map<String, Value>,
    /// Display position; appended after the current maximum when omitted.
    pub display_order: Option<i32>,
    /// Defaults to `true`.
    pub is_active: Option<bool>,
}

/// JSON payload carried in the `data` part of an update upload.
///
/// PATCH semantics: omitted fields stay untouched, `display_order: null`
/// clears the position.
#[derive(Deserialize, Default)]
pub struct UpdateContentData {
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default, deserialize_with = "double_option")]
    pub display_order: Option<Option<i32>>,
    pub is_active: Option<bool>,
}

impl From<CreateContentData> for CreateData {
    fn from(data: CreateContentData) -> Self {
        Self {
            fields: data.fields,
            display_order: data.display_order,
            is_active: data.is_active,
        }
    }
}

impl From<UpdateContentData> for UpdateData {
    fn from(data: UpdateContentData) -> Self {
        Self {
            fields: data.fields,
            display_order: data.display_order,
            is_active: data.is_active,
        }
    }
}

/// Response DTO for a single content record.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ContentResponse {
    /// Record ID (UUIDv7).
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: String,
    #[schema(example = "advisors")]
    pub collection: String,
    /// Field values per the collection's schema.
    #[schema(value_type = Object)]
    pub fields: Value,
    /// Durable URL of the record's image, if one is attached.
    pub asset_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response DTO for listing a collection.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ContentListResponse {
    pub data: Vec<ContentResponse>,
    pub total: u64,
}

impl From<crate::entity::content_document::Model> for ContentResponse {
    fn from(m: crate::entity::content_document::Model) -> Self {
        Self {
            id: m.id.to_string(),
            collection: m.collection,
            fields: m.fields,
            asset_url: m.asset_url,
            display_order: m.display_order,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Query parameters for staff content listings.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContentListQuery {
    /// Filter on the active flag; omit to list everything.
    pub active: Option<bool>,
}
