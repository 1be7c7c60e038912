pub mod appointment;
pub mod blocked_period;
pub mod schedule;
pub mod service;

pub use appointment::*;
pub use blocked_period::*;
pub use schedule::*;
pub use service::*;
