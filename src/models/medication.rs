use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry, unique per (name, strength) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    pub strength: String,
    pub manufacturer: Option<String>,
    pub unit_of_measure: Option<String>,
}
