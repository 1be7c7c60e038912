use serde::{Deserialize, Serialize};

/// Catalog entry for a bookable service.
///
/// The availability engine only reads `duration_minutes` and `active`;
/// everything else is presentation data for the booking UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_minutes: i64,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Service {
    pub fn new(
        name: String,
        description: Option<String>,
        price: f64,
        duration_minutes: i64,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            description,
            price,
            duration_minutes,
            active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
