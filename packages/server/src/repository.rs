//! Generic CRUD over content collections.
//!
//! One implementation serves every collection in the catalog; the schema
//! descriptor supplies validation and the asset namespace. Asset-bearing
//! saves follow the upload → persist → delete-old ordering from `assets`.

use chrono::Utc;
use common::storage::AssetStore;
use sea_orm::*;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::assets::{self, NewAsset};
use crate::entity::content_document;
use crate::error::AppError;
use crate::schema::{self, EntitySchema};
use crate::store;

/// Listing filter. Admin callers leave `active` unset and see everything;
/// public-facing callers pass `Some(true)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListFilter {
    pub active: Option<bool>,
}

/// Payload for `create`.
pub struct CreateData {
    pub fields: Map<String, Value>,
    /// Appended after the current maximum when unset.
    pub display_order: Option<i32>,
    /// Defaults to `true`.
    pub is_active: Option<bool>,
}

/// Payload for `update`. PATCH semantics throughout: absent means untouched.
#[derive(Default)]
pub struct UpdateData {
    pub fields: Map<String, Value>,
    /// `Some(None)` clears the display order.
    pub display_order: Option<Option<i32>>,
    pub is_active: Option<bool>,
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    schema: &EntitySchema,
    filter: ListFilter,
) -> Result<Vec<content_document::Model>, AppError> {
    Ok(store::list(db, schema.collection, filter.active).await?)
}

pub async fn get<C: ConnectionTrait>(
    db: &C,
    schema: &EntitySchema,
    id: Uuid,
) -> Result<content_document::Model, AppError> {
    store::get(db, schema.collection, id)
        .await?
        .ok_or_else(|| not_found(schema))
}

/// Create a record, uploading its image first when one is attached.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    assets_store: &dyn AssetStore,
    schema: &EntitySchema,
    data: CreateData,
    file: Option<NewAsset>,
) -> Result<content_document::Model, AppError> {
    schema.validate_create(&data.fields)?;

    let display_order = match data.display_order {
        Some(order) => order,
        None => store::next_display_order(db, schema.collection).await?,
    };

    let staged = assets::stage(assets_store, schema, file, None).await?;

    let now = Utc::now();
    let model = content_document::ActiveModel {
        id: Set(Uuid::now_v7()),
        collection: Set(schema.collection.to_string()),
        fields: Set(Value::Object(data.fields)),
        asset_url: Set(staged.final_url.clone()),
        display_order: Set(Some(display_order)),
        is_active: Set(data.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    match model.insert(db).await {
        Ok(created) => {
            assets::commit(assets_store, staged).await;
            Ok(created)
        }
        Err(e) => {
            assets::abort(assets_store, staged).await;
            Err(e.into())
        }
    }
}

/// Partially update a record; a new image replaces (and best-effort deletes)
/// the previous owned one only after the document write commits.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    assets_store: &dyn AssetStore,
    schema: &EntitySchema,
    id: Uuid,
    data: UpdateData,
    file: Option<NewAsset>,
) -> Result<content_document::Model, AppError> {
    schema.validate_partial(&data.fields)?;

    let existing = get(db, schema, id).await?;

    // An empty save returns the record unchanged.
    if data.fields.is_empty()
        && data.display_order.is_none()
        && data.is_active.is_none()
        && file.is_none()
    {
        return Ok(existing);
    }

    let merged = schema::merge_fields(&existing.fields, &data.fields);

    let staged = assets::stage(
        assets_store,
        schema,
        file,
        existing.asset_url.as_deref(),
    )
    .await?;

    let mut active: content_document::ActiveModel = existing.into();
    active.fields = Set(merged);
    active.asset_url = Set(staged.final_url.clone());
    if let Some(order) = data.display_order {
        active.display_order = Set(order);
    }
    if let Some(is_active) = data.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => {
            assets::commit(assets_store, staged).await;
            Ok(updated)
        }
        // Vanished between the read and the write.
        Err(DbErr::RecordNotUpdated) => {
            assets::abort(assets_store, staged).await;
            Err(not_found(schema))
        }
        Err(e) => {
            assets::abort(assets_store, staged).await;
            Err(e.into())
        }
    }
}

/// Hard-delete a record and best-effort delete its owned image.
///
/// The image goes first; if the document delete then fails the operation
/// reports failure even though the image may already be gone.
pub async fn delete<C: ConnectionTrait>(
    db: &C,
    assets_store: &dyn AssetStore,
    schema: &EntitySchema,
    id: Uuid,
) -> Result<(), AppError> {
    let existing = get(db, schema, id).await?;

    if let Some(url) = existing.asset_url.as_deref() {
        assets::discard(assets_store, url).await;
    }

    if !store::delete(db, id).await? {
        // Vanished between the read and the delete.
        return Err(not_found(schema));
    }

    Ok(())
}

/// Flip `is_active`. Touches neither the fields nor the asset.
pub async fn toggle_active<C: ConnectionTrait>(
    db: &C,
    schema: &EntitySchema,
    id: Uuid,
) -> Result<content_document::Model, AppError> {
    let existing = get(db, schema, id).await?;
    let flipped = !existing.is_active;

    let mut active: content_document::ActiveModel = existing.into();
    active.is_active = Set(flipped);
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => Ok(updated),
        Err(DbErr::RecordNotUpdated) => Err(not_found(schema)),
        Err(e) => Err(e.into()),
    }
}

fn not_found(schema: &EntitySchema) -> AppError {
    AppError::NotFound(format!(
        "No such record in collection '{}'",
        schema.collection
    ))
}
