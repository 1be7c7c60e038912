use serde::{Deserialize, Serialize};

/// Administrator-imposed unavailability window.
///
/// `end_time = None` marks a single slot at `start_time`; a populated
/// `end_time` blocks every slot in the half-open range
/// `[start_time, end_time)`. `end_date = None` limits the block to
/// `start_date` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedPeriod {
    pub id: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub reason: String,
    pub active: bool,
    pub created_at: String,
}

impl BlockedPeriod {
    pub fn new(
        start_date: String,
        end_date: Option<String>,
        start_time: String,
        end_time: Option<String>,
        reason: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            start_date,
            end_date,
            start_time,
            end_time,
            reason,
            active: true,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
