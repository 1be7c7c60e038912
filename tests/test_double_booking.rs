mod helpers;

use chrono::NaiveDateTime;
use helpers::*;
use slotbook::services::{BookingOutcome, BookingRejection, BookingRequest};

const MONDAY: &str = "2025-06-02";

fn noon_day_before() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2025-06-01 12:00", "%Y-%m-%d %H:%M").expect("valid datetime")
}

fn request(client_name: &str) -> BookingRequest {
    BookingRequest {
        client_name: client_name.to_string(),
        phone: "11 97777-6666".to_string(),
        date: MONDAY.to_string(),
        time_slot: "09:00".to_string(),
        service_id: String::new(),
        notes: None,
    }
}

#[tokio::test]
async fn second_booking_for_same_slot_is_rejected() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;
    let bookings = booking_service(&db);

    let mut first = request("Alice");
    first.service_id = catalog.id.clone();
    let outcome = bookings
        .create_booking_at(first, noon_day_before())
        .await
        .expect("first booking");
    assert!(matches!(outcome, BookingOutcome::Accepted(_)));

    let mut second = request("Bob");
    second.service_id = catalog.id.clone();
    let outcome = bookings
        .create_booking_at(second, noon_day_before())
        .await
        .expect("second booking");

    let BookingOutcome::Rejected(BookingRejection::SlotConflict { client_name }) = outcome else {
        panic!("expected slot conflict, got {:?}", outcome);
    };
    assert_eq!(client_name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn lenient_date_and_time_spellings_hit_the_same_slot() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;
    let bookings = booking_service(&db);

    let mut first = request("Alice");
    first.service_id = catalog.id.clone();
    let outcome = bookings
        .create_booking_at(first, noon_day_before())
        .await
        .expect("first booking");
    assert!(matches!(outcome, BookingOutcome::Accepted(_)));

    // Non-padded spellings parse to the same physical slot and must
    // collide with the canonical one, not slip past the conflict check
    let mut second = request("Bob");
    second.service_id = catalog.id.clone();
    second.date = "2025-6-2".to_string();
    second.time_slot = "9:00".to_string();
    let outcome = bookings
        .create_booking_at(second, noon_day_before())
        .await
        .expect("second booking");

    let BookingOutcome::Rejected(BookingRejection::SlotConflict { client_name }) = outcome else {
        panic!("expected slot conflict, got {:?}", outcome);
    };
    assert_eq!(client_name.as_deref(), Some("Alice"));

    let appointments = db
        .list_appointments(None, None)
        .await
        .expect("list appointments");
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].appointment.date, "2025-06-02");
    assert_eq!(appointments[0].appointment.time_slot, "09:00");
}

/// N simultaneous requests for one slot must produce exactly one
/// acceptance. The pre-insert checks race, but the partial unique
/// index on (date, time_slot) makes the insert itself decide.
#[tokio::test]
async fn concurrent_bookings_for_same_slot_accept_exactly_one() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let catalog = create_test_service(&db, "Haircut", 30).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let bookings = booking_service(&db);
        let mut req = request(&format!("Client {}", i));
        req.service_id = catalog.id.clone();
        handles.push(tokio::spawn(async move {
            bookings.create_booking_at(req, noon_day_before()).await
        }));
    }

    let mut accepted = 0;
    let mut conflicts = 0;
    for handle in handles {
        let outcome = handle
            .await
            .expect("task completed")
            .expect("booking call succeeded");
        match outcome {
            BookingOutcome::Accepted(_) => accepted += 1,
            BookingOutcome::Rejected(BookingRejection::SlotConflict { .. }) => conflicts += 1,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    assert_eq!(accepted, 1, "exactly one concurrent booking must win");
    assert_eq!(conflicts, 7);

    let appointments = db
        .list_appointments(Some(MONDAY), None)
        .await
        .expect("list appointments");
    assert_eq!(appointments.len(), 1);
}
