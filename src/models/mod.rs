pub mod enums;

mod appointment;
mod doctor;
mod inventory;
mod invoice;
mod medication;
mod patient;
mod prescription;
mod room;
mod service;
mod specialty;
mod user;

pub use appointment::*;
pub use doctor::*;
pub use inventory::*;
pub use invoice::*;
pub use medication::*;
pub use patient::*;
pub use prescription::*;
pub use room::*;
pub use service::*;
pub use specialty::*;
pub use user::*;

#[cfg(test)]
mod tests {
    use super::enums::*;
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn appointment_serializes_to_json() {
        let appt = Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            room_id: None,
            created_by: None,
            scheduled_start: NaiveDate::from_ymd_opt(2026, 3, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            scheduled_end: NaiveDate::from_ymd_opt(2026, 3, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            status: AppointmentStatus::Scheduled,
            reason: Some("Annual check-up".into()),
            notes: None,
        };
        let json = serde_json::to_string(&appt).unwrap();
        assert!(json.contains("Scheduled"));
        let back: Appointment = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scheduled_start, appt.scheduled_start);
    }

    #[test]
    fn invoice_item_line_total_matches_generated_column_arithmetic() {
        let item = InvoiceItem {
            id: Uuid::new_v4(),
            invoice_id: Uuid::new_v4(),
            service_id: None,
            medication_id: None,
            description: Some("Dressing change".into()),
            quantity: 3,
            unit_price: 50.0,
        };
        assert_eq!(item.line_total(), 150.0);
    }

    #[test]
    fn inventory_needs_reorder_at_or_below_level() {
        let mut inv = Inventory {
            id: Uuid::new_v4(),
            medication_id: Uuid::new_v4(),
            quantity_on_hand: 10,
            reorder_level: 10,
        };
        assert!(inv.needs_reorder());
        inv.quantity_on_hand = 11;
        assert!(!inv.needs_reorder());
    }
}
