use slotbook::database::Database;
use slotbook::models::{Appointment, AppointmentStatus, Service};
use slotbook::services::{AvailabilityService, BookingService};

/// File-based SQLite database with a unique name per test so tests can
/// run in parallel. The file is removed when the handle drops.
pub struct TestDatabase {
    db: Database,
    path: String,
}

impl TestDatabase {
    pub fn db(&self) -> Database {
        self.db.clone()
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub async fn setup_test_db() -> TestDatabase {
    // Install drivers for AnyPool (required for tests)
    sqlx::any::install_default_drivers();

    let path = format!("test_{}.db", uuid::Uuid::new_v4());
    let db_url = format!("sqlite://{}?mode=rwc", path);

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    db.run_migrations()
        .await
        .expect("Failed to run migrations");

    TestDatabase { db, path }
}

pub fn booking_service(db: &Database) -> BookingService {
    BookingService::new(db.clone(), AvailabilityService::new(db.clone()))
}

pub async fn create_test_service(db: &Database, name: &str, duration_minutes: i64) -> Service {
    let service = Service::new(name.to_string(), None, 50.0, duration_minutes);
    db.create_service(&service)
        .await
        .expect("Failed to create test service");
    service
}

/// Insert an appointment directly, bypassing the booking validator.
pub async fn create_test_appointment(
    db: &Database,
    client_name: &str,
    date: &str,
    time_slot: &str,
    service_id: &str,
    status: AppointmentStatus,
) -> Appointment {
    let appointment = Appointment::new(
        client_name.to_string(),
        "11 99999-0000".to_string(),
        date.to_string(),
        time_slot.to_string(),
        service_id.to_string(),
        None,
        status,
    );
    db.insert_appointment(&appointment)
        .await
        .expect("Failed to insert test appointment");
    appointment
}
