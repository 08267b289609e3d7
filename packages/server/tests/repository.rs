//! Repository behavior against a real (SQLite) document store and a
//! filesystem asset store.

mod support;

use ::common::storage::AssetStore;
use support::{fields, image, setup};
use serde_json::json;
use server::error::AppError;
use server::repository::{self, CreateData, ListFilter, UpdateData};
use server::schema::EntitySchema;
use uuid::Uuid;

fn advisors() -> &'static EntitySchema {
    EntitySchema::lookup("advisors").unwrap()
}

fn facilities() -> &'static EntitySchema {
    EntitySchema::lookup("facilities").unwrap()
}

fn create_data(fields: serde_json::Map<String, serde_json::Value>) -> CreateData {
    CreateData {
        fields,
        display_order: None,
        is_active: None,
    }
}

fn patch(fields: serde_json::Map<String, serde_json::Value>) -> UpdateData {
    UpdateData {
        fields,
        ..Default::default()
    }
}

#[tokio::test]
async fn create_without_image_appends_last_and_defaults_active() {
    let env = setup().await;

    let first = repository::create(
        &env.db,
        &*env.assets,
        advisors(),
        create_data(fields(
            json!({"name": "Kim", "organization": "X University", "role": "Professor"}),
        )),
        None,
    )
    .await
    .unwrap();

    assert_eq!(first.collection, "advisors");
    assert_eq!(first.asset_url, None);
    assert!(first.is_active);
    assert_eq!(first.display_order, Some(0));
    assert_eq!(first.fields["name"], "Kim");

    let second = repository::create(
        &env.db,
        &*env.assets,
        advisors(),
        create_data(fields(json!({"name": "Park"}))),
        None,
    )
    .await
    .unwrap();

    assert_eq!(second.display_order, Some(1));
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn create_honors_explicit_order_and_active_flag() {
    let env = setup().await;

    let record = repository::create(
        &env.db,
        &*env.assets,
        advisors(),
        CreateData {
            fields: fields(json!({"name": "Kim"})),
            display_order: Some(7),
            is_active: Some(false),
        },
        None,
    )
    .await
    .unwrap();

    assert_eq!(record.display_order, Some(7));
    assert!(!record.is_active);
}

#[tokio::test]
async fn create_with_missing_required_field_writes_nothing() {
    let env = setup().await;

    let err = repository::create(
        &env.db,
        &*env.assets,
        advisors(),
        create_data(fields(json!({"organization": "X University"}))),
        Some(image("portrait.png")),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));

    let all = repository::list(&env.db, advisors(), ListFilter::default())
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn update_replaces_image_and_deletes_the_previous_one() {
    let env = setup().await;

    // Scenario: created without an image, then given one, then a second one.
    let record = repository::create(
        &env.db,
        &*env.assets,
        advisors(),
        create_data(fields(json!({"name": "Kim"}))),
        None,
    )
    .await
    .unwrap();

    let with_first = repository::update(
        &env.db,
        &*env.assets,
        advisors(),
        record.id,
        UpdateData::default(),
        Some(image("first.png")),
    )
    .await
    .unwrap();

    let first_url = with_first.asset_url.clone().unwrap();
    assert!(env.assets.exists_url(&first_url).await.unwrap());

    let with_second = repository::update(
        &env.db,
        &*env.assets,
        advisors(),
        record.id,
        UpdateData::default(),
        Some(image("second.png")),
    )
    .await
    .unwrap();

    let second_url = with_second.asset_url.clone().unwrap();
    assert_ne!(first_url, second_url);
    assert!(env.assets.exists_url(&second_url).await.unwrap());
    assert!(!env.assets.exists_url(&first_url).await.unwrap());
}

#[tokio::test]
async fn partial_update_leaves_other_fields_untouched() {
    let env = setup().await;

    let record = repository::create(
        &env.db,
        &*env.assets,
        advisors(),
        create_data(fields(
            json!({"name": "Kim", "organization": "X University", "role": "Professor"}),
        )),
        Some(image("portrait.png")),
    )
    .await
    .unwrap();

    let updated = repository::update(
        &env.db,
        &*env.assets,
        advisors(),
        record.id,
        patch(fields(json!({"role": "Director"}))),
        None,
    )
    .await
    .unwrap();

    assert_eq!(updated.fields["name"], "Kim");
    assert_eq!(updated.fields["organization"], "X University");
    assert_eq!(updated.fields["role"], "Director");
    assert_eq!(updated.asset_url, record.asset_url);
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let env = setup().await;

    let err = repository::update(
        &env.db,
        &*env.assets,
        advisors(),
        Uuid::now_v7(),
        UpdateData::default(),
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn ids_do_not_resolve_across_collections() {
    let env = setup().await;

    let record = repository::create(
        &env.db,
        &*env.assets,
        advisors(),
        create_data(fields(json!({"name": "Kim"}))),
        None,
    )
    .await
    .unwrap();

    let err = repository::get(&env.db, facilities(), record.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_document_and_owned_image() {
    let env = setup().await;

    let record = repository::create(
        &env.db,
        &*env.assets,
        advisors(),
        create_data(fields(json!({"name": "Kim"}))),
        Some(image("portrait.png")),
    )
    .await
    .unwrap();
    let url = record.asset_url.clone().unwrap();

    repository::delete(&env.db, &*env.assets, advisors(), record.id)
        .await
        .unwrap();

    let err = repository::get(&env.db, advisors(), record.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(!env.assets.exists_url(&url).await.unwrap());
}

#[tokio::test]
async fn delete_missing_record_is_not_found() {
    let env = setup().await;

    let err = repository::delete(&env.db, &*env.assets, advisors(), Uuid::now_v7())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn toggle_active_twice_round_trips_and_keeps_the_image() {
    let env = setup().await;

    let record = repository::create(
        &env.db,
        &*env.assets,
        advisors(),
        create_data(fields(json!({"name": "Kim"}))),
        Some(image("portrait.png")),
    )
    .await
    .unwrap();

    let off = repository::toggle_active(&env.db, advisors(), record.id)
        .await
        .unwrap();
    assert!(!off.is_active);
    assert_eq!(off.asset_url, record.asset_url);
    assert_eq!(off.fields, record.fields);

    let on = repository::toggle_active(&env.db, advisors(), record.id)
        .await
        .unwrap();
    assert!(on.is_active);
    assert_eq!(on.asset_url, record.asset_url);
}

#[tokio::test]
async fn list_orders_by_display_order_and_filters_active() {
    let env = setup().await;

    for (name, order, active) in [("C", 2, true), ("A", 0, true), ("B", 1, false)] {
        repository::create(
            &env.db,
            &*env.assets,
            advisors(),
            CreateData {
                fields: fields(json!({"name": name})),
                display_order: Some(order),
                is_active: Some(active),
            },
            None,
        )
        .await
        .unwrap();
    }

    let admin_view = repository::list(&env.db, advisors(), ListFilter::default())
        .await
        .unwrap();
    let names: Vec<&str> = admin_view
        .iter()
        .map(|m| m.fields["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["A", "B", "C"]);

    let public_view = repository::list(&env.db, advisors(), ListFilter { active: Some(true) })
        .await
        .unwrap();
    let names: Vec<&str> = public_view
        .iter()
        .map(|m| m.fields["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["A", "C"]);
}
