use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Doctor, PatientDoctor, Specialty};

const DOCTOR_COLUMNS: &str =
    "id, user_id, first_name, last_name, license_number, phone, email";

pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, user_id, first_name, last_name, license_number, phone, email)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            doctor.id.to_string(),
            doctor.user_id.map(|id| id.to_string()),
            doctor.first_name,
            doctor.last_name,
            doctor.license_number,
            doctor.phone,
            doctor.email,
        ],
    )?;
    Ok(())
}

pub fn get_doctor(conn: &Connection, id: &Uuid) -> Result<Option<Doctor>, DatabaseError> {
    let sql = format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1");
    fetch_doctor(conn, &sql, &id.to_string())
}

pub fn get_doctor_by_license_number(
    conn: &Connection,
    license_number: &str,
) -> Result<Option<Doctor>, DatabaseError> {
    let sql = format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE license_number = ?1 LIMIT 1");
    fetch_doctor(conn, &sql, license_number)
}

pub fn get_doctor_by_user(conn: &Connection, user_id: &Uuid) -> Result<Option<Doctor>, DatabaseError> {
    let sql = format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE user_id = ?1 LIMIT 1");
    fetch_doctor(conn, &sql, &user_id.to_string())
}

fn fetch_doctor(conn: &Connection, sql: &str, arg: &str) -> Result<Option<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;

    let result = stmt.query_row(params![arg], |row| Ok(doctor_row(row)));

    match result {
        Ok(row) => Ok(Some(doctor_from_row(row?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let sql = format!("SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY last_name, first_name");
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map([], |row| Ok(doctor_row(row)))?;

    let mut doctors = Vec::new();
    for row in rows {
        doctors.push(doctor_from_row(row??)?);
    }
    Ok(doctors)
}

pub fn update_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE doctors SET user_id = ?2, first_name = ?3, last_name = ?4,
         license_number = ?5, phone = ?6, email = ?7
         WHERE id = ?1",
        params![
            doctor.id.to_string(),
            doctor.user_id.map(|id| id.to_string()),
            doctor.first_name,
            doctor.last_name,
            doctor.license_number,
            doctor.phone,
            doctor.email,
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: doctor.id.to_string(),
        });
    }
    Ok(())
}

/// Fails with a foreign-key violation while appointments or
/// prescriptions still reference the doctor; specialty and care-team
/// links cascade away.
pub fn delete_doctor(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute("DELETE FROM doctors WHERE id = ?1", params![id.to_string()])?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn add_doctor_specialty(
    conn: &Connection,
    doctor_id: &Uuid,
    specialty_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctor_specialties (doctor_id, specialty_id) VALUES (?1, ?2)",
        params![doctor_id.to_string(), specialty_id.to_string()],
    )?;
    Ok(())
}

pub fn remove_doctor_specialty(
    conn: &Connection,
    doctor_id: &Uuid,
    specialty_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM doctor_specialties WHERE doctor_id = ?1 AND specialty_id = ?2",
        params![doctor_id.to_string(), specialty_id.to_string()],
    )?;
    Ok(())
}

pub fn get_specialties_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<Specialty>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name, s.description
         FROM specialties s
         JOIN doctor_specialties ds ON ds.specialty_id = s.id
         WHERE ds.doctor_id = ?1
         ORDER BY s.name",
    )?;

    let rows = stmt.query_map(params![doctor_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;

    let mut specialties = Vec::new();
    for row in rows {
        let (id, name, description) = row?;
        specialties.push(Specialty {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            name,
            description,
        });
    }
    Ok(specialties)
}

pub fn get_doctors_with_specialty(
    conn: &Connection,
    specialty_id: &Uuid,
) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT d.id, d.user_id, d.first_name, d.last_name, d.license_number, d.phone, d.email
         FROM doctors d
         JOIN doctor_specialties ds ON ds.doctor_id = d.id
         WHERE ds.specialty_id = ?1
         ORDER BY d.last_name, d.first_name",
    )?;

    let rows = stmt.query_map(params![specialty_id.to_string()], |row| Ok(doctor_row(row)))?;

    let mut doctors = Vec::new();
    for row in rows {
        doctors.push(doctor_from_row(row??)?);
    }
    Ok(doctors)
}

pub fn assign_doctor_to_patient(
    conn: &Connection,
    link: &PatientDoctor,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patient_doctors (patient_id, doctor_id, is_primary, assigned_date)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            link.patient_id.to_string(),
            link.doctor_id.to_string(),
            link.is_primary as i32,
            link.assigned_date.to_string(),
        ],
    )?;
    Ok(())
}

pub fn unassign_doctor_from_patient(
    conn: &Connection,
    patient_id: &Uuid,
    doctor_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM patient_doctors WHERE patient_id = ?1 AND doctor_id = ?2",
        params![patient_id.to_string(), doctor_id.to_string()],
    )?;
    Ok(())
}

/// Make the given doctor the patient's primary, clearing any previous
/// primary flag. The link row must already exist.
pub fn set_primary_doctor(
    conn: &Connection,
    patient_id: &Uuid,
    doctor_id: &Uuid,
) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE patient_doctors SET is_primary = 0 WHERE patient_id = ?1",
        params![patient_id.to_string()],
    )?;
    let rows = tx.execute(
        "UPDATE patient_doctors SET is_primary = 1 WHERE patient_id = ?1 AND doctor_id = ?2",
        params![patient_id.to_string(), doctor_id.to_string()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "PatientDoctor".into(),
            id: format!("{patient_id}/{doctor_id}"),
        });
    }
    tx.commit()?;
    Ok(())
}

pub fn get_care_team(conn: &Connection, patient_id: &Uuid) -> Result<Vec<PatientDoctor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT patient_id, doctor_id, is_primary, assigned_date
         FROM patient_doctors WHERE patient_id = ?1
         ORDER BY is_primary DESC, assigned_date",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i32>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut links = Vec::new();
    for row in rows {
        links.push(patient_doctor_from_row(row?)?);
    }
    Ok(links)
}

pub fn get_patients_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<PatientDoctor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT patient_id, doctor_id, is_primary, assigned_date
         FROM patient_doctors WHERE doctor_id = ?1
         ORDER BY assigned_date",
    )?;

    let rows = stmt.query_map(params![doctor_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i32>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut links = Vec::new();
    for row in rows {
        links.push(patient_doctor_from_row(row?)?);
    }
    Ok(links)
}

// Internal row type for Doctor mapping
struct DoctorRow {
    id: String,
    user_id: Option<String>,
    first_name: String,
    last_name: String,
    license_number: String,
    phone: Option<String>,
    email: Option<String>,
}

fn doctor_row(row: &rusqlite::Row<'_>) -> Result<DoctorRow, rusqlite::Error> {
    Ok(DoctorRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        license_number: row.get(4)?,
        phone: row.get(5)?,
        email: row.get(6)?,
    })
}

fn doctor_from_row(row: DoctorRow) -> Result<Doctor, DatabaseError> {
    Ok(Doctor {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        user_id: row.user_id.and_then(|s| Uuid::parse_str(&s).ok()),
        first_name: row.first_name,
        last_name: row.last_name,
        license_number: row.license_number,
        phone: row.phone,
        email: row.email,
    })
}

fn patient_doctor_from_row(
    row: (String, String, i32, String),
) -> Result<PatientDoctor, DatabaseError> {
    let (patient_id, doctor_id, is_primary, assigned_date) = row;
    Ok(PatientDoctor {
        patient_id: Uuid::parse_str(&patient_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        doctor_id: Uuid::parse_str(&doctor_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        is_primary: is_primary != 0,
        assigned_date: NaiveDate::parse_from_str(&assigned_date, "%Y-%m-%d").unwrap_or_default(),
    })
}
