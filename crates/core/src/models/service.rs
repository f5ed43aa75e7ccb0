use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Duration assumed for a service whose record carries none.
pub const DEFAULT_SERVICE_DURATION_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration: Option<i32>,
}

impl Service {
    /// Length of one appointment in minutes, falling back to an hour.
    pub fn duration_minutes(&self) -> i64 {
        self.duration
            .map(i64::from)
            .unwrap_or(DEFAULT_SERVICE_DURATION_MINUTES)
    }
}
