use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billable catalog entry. `price` is the current list price; booked
/// appointments snapshot it into their own line rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub price: f64,
    pub duration_minutes: i32,
}
