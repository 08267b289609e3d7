//! Query layer over the `content_document` collection table.
//!
//! No business logic lives here; the repository composes these with schema
//! validation and the asset lifecycle.

use sea_orm::sea_query::NullOrdering;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::content_document;

/// Fetch one document by id, scoped to its collection.
///
/// A matching id in a different collection resolves to `None` so ids cannot
/// be addressed across collection boundaries.
pub async fn get<C: ConnectionTrait>(
    db: &C,
    collection: &str,
    id: Uuid,
) -> Result<Option<content_document::Model>, DbErr> {
    content_document::Entity::find_by_id(id)
        .filter(content_document::Column::Collection.eq(collection))
        .one(db)
        .await
}

/// List a collection ordered for display: `display_order` ascending with
/// unordered records last, ties broken by creation time.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    collection: &str,
    active: Option<bool>,
) -> Result<Vec<content_document::Model>, DbErr> {
    let mut select = content_document::Entity::find()
        .filter(content_document::Column::Collection.eq(collection));

    if let Some(active) = active {
        select = select.filter(content_document::Column::IsActive.eq(active));
    }

    select
        .order_by_with_nulls(
            content_document::Column::DisplayOrder,
            Order::Asc,
            NullOrdering::Last,
        )
        .order_by_asc(content_document::Column::CreatedAt)
        .all(db)
        .await
}

/// Compute the appended-last display order for a new document.
pub async fn next_display_order<C: ConnectionTrait>(
    db: &C,
    collection: &str,
) -> Result<i32, DbErr> {
    let max_order: Option<i32> = content_document::Entity::find()
        .filter(content_document::Column::Collection.eq(collection))
        .select_only()
        .column_as(content_document::Column::DisplayOrder.max(), "max_order")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();

    Ok(max_order.unwrap_or(-1).saturating_add(1))
}

/// Hard-delete one document. Returns `true` if a row was removed.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = content_document::Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
