use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::{content_document, inquiry};

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Composite index for content listings:
    // SELECT * FROM content_document WHERE collection = ? ORDER BY display_order
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_content_collection_order")
        .table(content_document::Entity)
        .col(content_document::Column::Collection)
        .col(content_document::Column::DisplayOrder)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_content_collection_order exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_content_collection_order: {}", e);
        }
    }

    // Composite index for the inquiry triage queue:
    // list by status, newest first
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_inquiry_status_created")
        .table(inquiry::Entity)
        .col(inquiry::Column::Status)
        .col(inquiry::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_inquiry_status_created exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_inquiry_status_created: {}", e);
        }
    }

    Ok(())
}
