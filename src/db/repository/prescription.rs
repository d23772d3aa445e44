use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Prescription, PrescriptionItem};

/// Write a prescription and its items in one transaction. The unique FK
/// on appointment_id rejects a second prescription for the same
/// appointment.
pub fn create_prescription(
    conn: &Connection,
    prescription: &Prescription,
    items: &[PrescriptionItem],
) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO prescriptions (id, appointment_id, doctor_id, notes)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            prescription.id.to_string(),
            prescription.appointment_id.to_string(),
            prescription.doctor_id.to_string(),
            prescription.notes,
        ],
    )?;
    for item in items {
        insert_prescription_item(&tx, item)?;
    }
    tx.commit()?;
    Ok(())
}

pub fn insert_prescription_item(
    conn: &Connection,
    item: &PrescriptionItem,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO prescription_items (id, prescription_id, medication_id, dosage,
         frequency, duration_days, instructions)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            item.id.to_string(),
            item.prescription_id.to_string(),
            item.medication_id.to_string(),
            item.dosage,
            item.frequency,
            item.duration_days,
            item.instructions,
        ],
    )?;
    Ok(())
}

pub fn get_prescription(conn: &Connection, id: &Uuid) -> Result<Option<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, appointment_id, doctor_id, notes FROM prescriptions WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(prescription_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The one-to-one lookup: an appointment has at most one prescription.
pub fn get_prescription_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Option<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, appointment_id, doctor_id, notes
         FROM prescriptions WHERE appointment_id = ?1",
    )?;

    let result = stmt.query_row(params![appointment_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(prescription_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_prescription_items(
    conn: &Connection,
    prescription_id: &Uuid,
) -> Result<Vec<PrescriptionItem>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, prescription_id, medication_id, dosage, frequency, duration_days, instructions
         FROM prescription_items WHERE prescription_id = ?1",
    )?;

    let rows = stmt.query_map(params![prescription_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, Option<i32>>(5)?,
            row.get::<_, Option<String>>(6)?,
        ))
    })?;

    let mut items = Vec::new();
    for row in rows {
        let (id, prescription_id, medication_id, dosage, frequency, duration_days, instructions) =
            row?;
        items.push(PrescriptionItem {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            prescription_id: Uuid::parse_str(&prescription_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            medication_id: Uuid::parse_str(&medication_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            dosage,
            frequency,
            duration_days,
            instructions,
        });
    }
    Ok(items)
}

/// Items cascade away with the prescription.
pub fn delete_prescription(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute("DELETE FROM prescriptions WHERE id = ?1", params![id.to_string()])?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Prescription".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn prescription_from_row(
    row: (String, String, String, Option<String>),
) -> Result<Prescription, DatabaseError> {
    let (id, appointment_id, doctor_id, notes) = row;
    Ok(Prescription {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        appointment_id: Uuid::parse_str(&appointment_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        doctor_id: Uuid::parse_str(&doctor_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        notes,
    })
}
