pub mod appointments;
pub mod availability;
pub mod blocks;
pub mod bookings;
pub mod middleware;
pub mod router;
pub mod services;
pub mod settings;

pub use middleware::*;
