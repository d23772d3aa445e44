use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock level, exactly one row per medication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub id: Uuid,
    pub medication_id: Uuid,
    pub quantity_on_hand: i32,
    pub reorder_level: i32,
}

impl Inventory {
    pub fn needs_reorder(&self) -> bool {
        self.quantity_on_hand <= self.reorder_level
    }
}
