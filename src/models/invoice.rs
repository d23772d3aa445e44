use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::InvoiceStatus;

/// Bill issued to a patient. `total_amount` is stored as entered and is
/// not derived from the line items; recalculate_invoice_total reconciles
/// the two on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub total_amount: f64,
    pub status: InvoiceStatus,
}

/// A line must be tagged with a service, a medication, or carry a
/// non-empty free-text description. line_total is generated in the
/// database as quantity * unit_price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub service_id: Option<Uuid>,
    pub medication_id: Option<Uuid>,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: f64,
}

impl InvoiceItem {
    /// Same arithmetic as the generated line_total column.
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}
