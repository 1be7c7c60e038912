pub mod api;
pub mod config;
pub mod database;
pub mod models;
pub mod services;

pub use api::*;
pub use config::*;
pub use database::*;
pub use models::*;
pub use services::*;
