pub mod error;

pub use error::*;

use crate::database::Database;
use crate::services::{AvailabilityService, BookingService};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub availability_service: AvailabilityService,
    pub booking_service: BookingService,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let availability_service = AvailabilityService::new(db.clone());
        let booking_service = BookingService::new(db.clone(), availability_service.clone());
        Self {
            db,
            availability_service,
            booking_service,
        }
    }
}
