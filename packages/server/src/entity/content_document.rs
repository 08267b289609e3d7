use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_document")]
pub struct Model {
    /// UUIDv7 primary key, assigned on creation.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Collection discriminator (e.g. "advisors", "facilities").
    pub collection: String,

    /// Schema-validated attributes as a JSON object.
    #[sea_orm(column_type = "JsonBinary")]
    pub fields: Json,

    /// Durable URL of the primary image, if one is attached.
    pub asset_url: Option<String>,

    /// Lower sorts first in listings; ties broken by creation time.
    pub display_order: Option<i32>,

    /// Inactive records stay editable but drop out of public listings.
    pub is_active: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
