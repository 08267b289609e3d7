use common::InquiryStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inquiry")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    pub contact: String,
    pub subject: String,
    pub message: String,

    /// Free-form service category picked on the contact form.
    pub service_tag: Option<String>,

    pub status: InquiryStatus,

    /// Staff reply. Kept across reopen cycles so it can be revised
    /// without retyping.
    pub response: Option<String>,

    /// Set exactly while `status == Resolved`.
    pub resolved_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
