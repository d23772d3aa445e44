use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Patient;

const PATIENT_COLUMNS: &str = "id, first_name, last_name, date_of_birth, gender, national_id,
     phone, email, address, emergency_contact_name, emergency_contact_phone";

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, first_name, last_name, date_of_birth, gender, national_id,
         phone, email, address, emergency_contact_name, emergency_contact_phone)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            patient.id.to_string(),
            patient.first_name,
            patient.last_name,
            patient.date_of_birth.map(|d| d.to_string()),
            patient.gender,
            patient.national_id,
            patient.phone,
            patient.email,
            patient.address,
            patient.emergency_contact_name,
            patient.emergency_contact_phone,
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;

    let result = stmt.query_row(params![id.to_string()], |row| Ok(patient_row(row)));

    match result {
        Ok(row) => Ok(Some(patient_from_row(row?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_patient_by_national_id(
    conn: &Connection,
    national_id: &str,
) -> Result<Option<Patient>, DatabaseError> {
    let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE national_id = ?1 LIMIT 1");
    let mut stmt = conn.prepare(&sql)?;

    let result = stmt.query_row(params![national_id], |row| Ok(patient_row(row)));

    match result {
        Ok(row) => Ok(Some(patient_from_row(row?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Case-insensitive substring match on first or last name.
pub fn search_patients_by_name(conn: &Connection, name: &str) -> Result<Vec<Patient>, DatabaseError> {
    let pattern = format!("%{name}%");
    let sql = format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         WHERE LOWER(first_name) LIKE LOWER(?1) OR LOWER(last_name) LIKE LOWER(?1)
         ORDER BY last_name, first_name"
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map(params![pattern], |row| Ok(patient_row(row)))?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row??)?);
    }
    Ok(patients)
}

pub fn get_all_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY last_name, first_name");
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map([], |row| Ok(patient_row(row)))?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row??)?);
    }
    Ok(patients)
}

pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE patients SET first_name = ?2, last_name = ?3, date_of_birth = ?4, gender = ?5,
         national_id = ?6, phone = ?7, email = ?8, address = ?9,
         emergency_contact_name = ?10, emergency_contact_phone = ?11
         WHERE id = ?1",
        params![
            patient.id.to_string(),
            patient.first_name,
            patient.last_name,
            patient.date_of_birth.map(|d| d.to_string()),
            patient.gender,
            patient.national_id,
            patient.phone,
            patient.email,
            patient.address,
            patient.emergency_contact_name,
            patient.emergency_contact_phone,
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: patient.id.to_string(),
        });
    }
    Ok(())
}

/// Fails with a foreign-key violation while appointments or invoices
/// still reference the patient; care-team links cascade away.
pub fn delete_patient(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute("DELETE FROM patients WHERE id = ?1", params![id.to_string()])?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for Patient mapping
struct PatientRow {
    id: String,
    first_name: String,
    last_name: String,
    date_of_birth: Option<String>,
    gender: Option<String>,
    national_id: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    emergency_contact_name: Option<String>,
    emergency_contact_phone: Option<String>,
}

fn patient_row(row: &rusqlite::Row<'_>) -> Result<PatientRow, rusqlite::Error> {
    Ok(PatientRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        gender: row.get(4)?,
        national_id: row.get(5)?,
        phone: row.get(6)?,
        email: row.get(7)?,
        address: row.get(8)?,
        emergency_contact_name: row.get(9)?,
        emergency_contact_phone: row.get(10)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        first_name: row.first_name,
        last_name: row.last_name,
        date_of_birth: row
            .date_of_birth
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        gender: row.gender,
        national_id: row.national_id,
        phone: row.phone,
        email: row.email,
        address: row.address,
        emergency_contact_name: row.emergency_contact_name,
        emergency_contact_phone: row.emergency_contact_phone,
    })
}
