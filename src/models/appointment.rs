use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

/// Scheduled visit. The schema requires scheduled_end > scheduled_start
/// but does not prevent the same doctor or room being double-booked;
/// see the conflict queries in the appointment repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub room_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub scheduled_start: NaiveDateTime,
    pub scheduled_end: NaiveDateTime,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// Service line billed on an appointment. `unit_price` is copied from
/// the service catalog at booking time and does not follow later price
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentService {
    pub appointment_id: Uuid,
    pub service_id: Uuid,
    pub quantity: i32,
    pub unit_price: f64,
}
