mod helpers;

use chrono::NaiveDateTime;
use helpers::*;
use slotbook::models::{AppointmentStatus, BlockedPeriod};
use slotbook::services::{BookingOutcome, BookingRejection, BookingRequest};

const MONDAY: &str = "2025-06-02";
const SUNDAY: &str = "2025-06-01";

fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M")
        .expect("valid datetime")
}

fn request(date: &str, time_slot: &str, service_id: &str) -> BookingRequest {
    BookingRequest {
        client_name: "Carol".to_string(),
        phone: "11 98888-7777".to_string(),
        date: date.to_string(),
        time_slot: time_slot.to_string(),
        service_id: service_id.to_string(),
        notes: None,
    }
}

// `now` well before the requested day, so only the check under test
// can reject.
fn day_before(date: &str) -> NaiveDateTime {
    at(date, "08:00") - chrono::Duration::days(1)
}

#[tokio::test]
async fn valid_booking_is_accepted_and_persisted() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;
    let bookings = booking_service(&db);

    let outcome = bookings
        .create_booking_at(request(MONDAY, "09:00", &catalog.id), day_before(MONDAY))
        .await
        .expect("booking");

    let BookingOutcome::Accepted(appointment) = outcome else {
        panic!("expected acceptance, got {:?}", outcome);
    };
    assert_eq!(appointment.status, AppointmentStatus::Scheduled);

    let stored = db
        .get_appointment(&appointment.id)
        .await
        .expect("query")
        .expect("appointment persisted");
    assert_eq!(stored.date, MONDAY);
    assert_eq!(stored.time_slot, "09:00");
}

#[tokio::test]
async fn booking_on_closed_day_is_rejected() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;
    let bookings = booking_service(&db);

    let outcome = bookings
        .create_booking_at(request(SUNDAY, "09:00", &catalog.id), day_before(SUNDAY))
        .await
        .expect("booking");

    assert!(matches!(
        outcome,
        BookingOutcome::Rejected(BookingRejection::ClosedDay)
    ));
}

#[tokio::test]
async fn occupied_slot_is_rejected_with_conflicting_client() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;
    create_test_appointment(
        &db,
        "Alice",
        MONDAY,
        "09:00",
        &catalog.id,
        AppointmentStatus::Scheduled,
    )
    .await;
    let bookings = booking_service(&db);

    let outcome = bookings
        .create_booking_at(request(MONDAY, "09:00", &catalog.id), day_before(MONDAY))
        .await
        .expect("booking");

    let BookingOutcome::Rejected(BookingRejection::SlotConflict { client_name }) = outcome else {
        panic!("expected slot conflict, got {:?}", outcome);
    };
    assert_eq!(client_name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn conflict_check_is_duration_aware() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let long_service = create_test_service(&db, "Full treatment", 90).await;
    let short_service = create_test_service(&db, "Haircut", 30).await;
    // Alice holds 09:00, 09:30 and 10:00
    create_test_appointment(
        &db,
        "Alice",
        MONDAY,
        "09:00",
        &long_service.id,
        AppointmentStatus::Scheduled,
    )
    .await;
    let bookings = booking_service(&db);

    // A slot in the middle of the running appointment
    let outcome = bookings
        .create_booking_at(
            request(MONDAY, "10:00", &short_service.id),
            day_before(MONDAY),
        )
        .await
        .expect("booking");
    assert!(matches!(
        outcome,
        BookingOutcome::Rejected(BookingRejection::SlotConflict { .. })
    ));

    // A long booking whose tail would overlap Alice's start
    let outcome = bookings
        .create_booking_at(
            request(MONDAY, "08:00", &long_service.id),
            day_before(MONDAY),
        )
        .await
        .expect("booking");
    assert!(matches!(
        outcome,
        BookingOutcome::Rejected(BookingRejection::SlotConflict { .. })
    ));

    // The slot right after the appointment ends is free
    let outcome = bookings
        .create_booking_at(
            request(MONDAY, "10:30", &short_service.id),
            day_before(MONDAY),
        )
        .await
        .expect("booking");
    assert!(matches!(outcome, BookingOutcome::Accepted(_)));
}

#[tokio::test]
async fn blocked_slot_is_rejected_with_reason() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;
    db.create_blocked_period(&BlockedPeriod::new(
        MONDAY.to_string(),
        None,
        "14:00".to_string(),
        Some("15:00".to_string()),
        "Staff meeting".to_string(),
    ))
    .await
    .expect("create block");
    let bookings = booking_service(&db);

    let outcome = bookings
        .create_booking_at(request(MONDAY, "14:30", &catalog.id), day_before(MONDAY))
        .await
        .expect("booking");

    let BookingOutcome::Rejected(BookingRejection::SlotBlocked { reason }) = outcome else {
        panic!("expected slot blocked, got {:?}", outcome);
    };
    assert_eq!(reason, "Staff meeting");
}

#[tokio::test]
async fn inactive_service_is_rejected() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;
    db.deactivate_service(&catalog.id).await.expect("deactivate");
    let bookings = booking_service(&db);

    let outcome = bookings
        .create_booking_at(request(MONDAY, "09:00", &catalog.id), day_before(MONDAY))
        .await
        .expect("booking");

    assert!(matches!(
        outcome,
        BookingOutcome::Rejected(BookingRejection::InvalidService)
    ));
}

#[tokio::test]
async fn unknown_service_is_rejected() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let bookings = booking_service(&db);

    let outcome = bookings
        .create_booking_at(request(MONDAY, "09:00", "no-such-id"), day_before(MONDAY))
        .await
        .expect("booking");

    assert!(matches!(
        outcome,
        BookingOutcome::Rejected(BookingRejection::InvalidService)
    ));
}

#[tokio::test]
async fn past_slot_beyond_grace_margin_is_rejected() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;
    let bookings = booking_service(&db);

    // 09:30 requested at 10:00: 30 minutes in the past, margin is 15
    let outcome = bookings
        .create_booking_at(request(MONDAY, "09:30", &catalog.id), at(MONDAY, "10:00"))
        .await
        .expect("booking");

    assert!(matches!(
        outcome,
        BookingOutcome::Rejected(BookingRejection::PastDate)
    ));
}

#[tokio::test]
async fn past_slot_within_grace_margin_is_accepted() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;
    let bookings = booking_service(&db);

    // 09:30 requested at 09:40: 10 minutes in the past, inside margin
    let outcome = bookings
        .create_booking_at(request(MONDAY, "09:30", &catalog.id), at(MONDAY, "09:40"))
        .await
        .expect("booking");

    assert!(matches!(outcome, BookingOutcome::Accepted(_)));
}

#[tokio::test]
async fn slot_exactly_at_margin_boundary_is_rejected() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;
    let bookings = booking_service(&db);

    // requested == now - margin rejects (boundary is inclusive)
    let outcome = bookings
        .create_booking_at(request(MONDAY, "10:00", &catalog.id), at(MONDAY, "10:15"))
        .await
        .expect("booking");

    assert!(matches!(
        outcome,
        BookingOutcome::Rejected(BookingRejection::PastDate)
    ));
}

#[tokio::test]
async fn off_grid_time_is_a_bad_request() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;
    let bookings = booking_service(&db);

    // 09:45 is not on the 30-minute grid
    let result = bookings
        .create_booking_at(request(MONDAY, "09:45", &catalog.id), day_before(MONDAY))
        .await;
    assert!(result.is_err());

    // 12:00 falls inside the default break
    let result = bookings
        .create_booking_at(request(MONDAY, "12:00", &catalog.id), day_before(MONDAY))
        .await;
    assert!(result.is_err());
}
