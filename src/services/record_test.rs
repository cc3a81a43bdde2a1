use super::*;

#[test]
fn update_builder_only_sets_present_fields() {
    let mut update = UpdateBuilder::new("machines");
    update
        .set("status", Some("idle".to_string()))
        .set::<String>("admin_notes", None)
        .set("usage_percentage", Some(40_i32));
    assert_eq!(update.field_count(), 2);

    let query = update.finish("machine_id", "MCH_1");
    assert_eq!(
        query.sql(),
        "UPDATE machines SET updated_at = now(), status = $1, usage_percentage = $2 WHERE machine_id = $3 RETURNING *"
    );
}

#[test]
fn empty_patch_still_touches_updated_at() {
    let update = UpdateBuilder::new("drivers");
    assert_eq!(update.field_count(), 0);
    let query = update.finish("driver_id", "DRV1");
    assert_eq!(query.sql(), "UPDATE drivers SET updated_at = now() WHERE driver_id = $1 RETURNING *");
}

#[test]
fn stamp_uses_database_clock() {
    let mut update = UpdateBuilder::new("bookings");
    update.set("current_booking_status", Some("Completed".to_string())).stamp("last_status_update_timestamp");
    let query = update.finish("booking_id", "B1");
    assert_eq!(
        query.sql(),
        "UPDATE bookings SET updated_at = now(), current_booking_status = $1, last_status_update_timestamp = now() WHERE booking_id = $2 RETURNING *"
    );
}

#[test]
fn key_or_generate_keeps_supplied_key() {
    assert_eq!(key_or_generate(Some("  LM_7 ".into())), "LM_7");
}

#[test]
fn key_or_generate_fills_blank_with_uuid() {
    let generated = key_or_generate(Some("   ".into()));
    assert!(Uuid::parse_str(&generated).is_ok());
    assert!(Uuid::parse_str(&key_or_generate(None)).is_ok());
}

#[test]
fn required_rejects_blank() {
    assert_eq!(required("name", " Suds ").unwrap(), "Suds");
    let err = required("name", "  ").unwrap_err();
    assert!(matches!(err, RecordError::Invalid(msg) if msg == "name is required"));
}

#[test]
fn required_patch_trims_present_values() {
    assert_eq!(required_patch("name", None).unwrap(), None);
    assert_eq!(required_patch("name", Some("  Suds Shop ")).unwrap().as_deref(), Some("Suds Shop"));
    assert!(matches!(required_patch("name", Some(" ")), Err(RecordError::Invalid(_))));
}

// =============================================================================
// LIVE DATABASE
// =============================================================================

#[cfg(feature = "live-db-tests")]
use crate::services::{booking, machine, participating, product, stats};
#[cfg(feature = "live-db-tests")]
use crate::state::test_helpers::integration_pool;

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn machine_crud_round_trip() {
    let (pool, _db) = integration_pool().await;

    participating::create_participating(
        &pool,
        participating::NewParticipatingLaundromat {
            laundromat_id: Some("PL1".into()),
            name: "Bubbles".into(),
            ..Default::default()
        },
    )
    .await
    .expect("create location");

    let created = machine::create_machine(
        &pool,
        machine::NewMachine { laundromat_id: "PL1".into(), machine_type: "Washer".into(), ..Default::default() },
    )
    .await
    .expect("create machine");
    assert!(!created.machine_id.is_empty());

    let updated = machine::update_machine_status(&pool, &created.machine_id, "maintenance")
        .await
        .expect("update status");
    assert_eq!(updated.status.as_deref(), Some("maintenance"));
    assert!(updated.updated_at >= created.updated_at);

    let listed = machine::list_machines(&pool).await.expect("list machines");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].laundromat_name.as_deref(), Some("Bubbles"));

    let dashboard = stats::load_dashboard_stats(&pool).await.expect("dashboard");
    assert_eq!(dashboard.broken_machines, 1);

    let missing = machine::get_machine(&pool, "nope").await.unwrap_err();
    assert!(matches!(missing, RecordError::NotFound(_)));
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn renaming_a_location_stores_the_trimmed_name() {
    let (pool, _db) = integration_pool().await;
    participating::create_participating(
        &pool,
        participating::NewParticipatingLaundromat {
            laundromat_id: Some("PL1".into()),
            name: "Bubbles".into(),
            ..Default::default()
        },
    )
    .await
    .expect("create location");

    let renamed = participating::update_participating(
        &pool,
        "PL1",
        participating::ParticipatingLaundromatPatch { name: Some("  Bubbles Too  ".into()), ..Default::default() },
    )
    .await
    .expect("rename location");
    assert_eq!(renamed.name, "Bubbles Too");
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn machine_for_unknown_location_is_rejected() {
    let (pool, _db) = integration_pool().await;
    let err = machine::create_machine(
        &pool,
        machine::NewMachine { laundromat_id: "PL404".into(), machine_type: "Dryer".into(), ..Default::default() },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RecordError::Database(_)));
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn booking_status_change_stamps_timestamp() {
    let (pool, _db) = integration_pool().await;
    let created = booking::create_booking(
        &pool,
        booking::NewBooking { user_id: "U1".into(), current_booking_status: Some("Pending".into()), ..Default::default() },
    )
    .await
    .expect("create booking");
    assert!(created.booking_creation_timestamp.is_some());

    let updated = booking::update_booking_status(&pool, &created.booking_id, "Completed")
        .await
        .expect("update booking");
    assert_eq!(updated.current_booking_status.as_deref(), Some("Completed"));
    assert!(updated.last_status_update_timestamp >= created.last_status_update_timestamp);
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn empty_catalog_serves_demo_products() {
    let (pool, _db) = integration_pool().await;
    let products = product::list_products(&pool).await.expect("list products");
    assert_eq!(products, product::demo_products());

    let demo = product::get_product(&pool, "demo-2").await.expect("demo product resolves");
    assert_eq!(demo.brand.as_deref(), Some("Tide"));
}
