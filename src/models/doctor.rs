use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Practitioner record. `user_id` optionally links to a login account;
/// deleting that account nulls the link, the doctor record stays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Care relationship between a patient and a doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDoctor {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub is_primary: bool,
    pub assigned_date: NaiveDate,
}
