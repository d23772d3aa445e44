use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::AppointmentStatus;
use crate::models::{Appointment, AppointmentService};

const APPOINTMENT_COLUMNS: &str = "id, patient_id, doctor_id, room_id, created_by,
     scheduled_start, scheduled_end, status, reason, notes";

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn fmt_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Book an appointment together with its billed service lines in one
/// transaction. Each line snapshots the service's current catalog price
/// into unit_price. Nothing here rejects an overlapping booking; see
/// [`find_conflicts_for_doctor`] and [`find_conflicts_for_room`].
pub fn schedule_appointment(
    conn: &Connection,
    appt: &Appointment,
    service_lines: &[(Uuid, i32)],
) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    insert_appointment(&tx, appt)?;
    for (service_id, quantity) in service_lines {
        add_service_to_appointment(&tx, &appt.id, service_id, *quantity)?;
    }
    tx.commit()?;
    tracing::info!("Scheduled appointment {} for patient {}", appt.id, appt.patient_id);
    Ok(())
}

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, doctor_id, room_id, created_by,
         scheduled_start, scheduled_end, status, reason, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appt.id.to_string(),
            appt.patient_id.to_string(),
            appt.doctor_id.to_string(),
            appt.room_id.map(|id| id.to_string()),
            appt.created_by.map(|id| id.to_string()),
            fmt_datetime(&appt.scheduled_start),
            fmt_datetime(&appt.scheduled_end),
            appt.status.as_str(),
            appt.reason,
            appt.notes,
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;

    let result = stmt.query_row(params![id.to_string()], |row| Ok(appointment_row(row)));

    match result {
        Ok(row) => Ok(Some(appointment_from_row(row?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_appointments_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE patient_id = ?1 ORDER BY scheduled_start"
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| Ok(appointment_row(row)))?;

    let mut appts = Vec::new();
    for row in rows {
        appts.push(appointment_from_row(row??)?);
    }
    Ok(appts)
}

pub fn get_appointments_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE doctor_id = ?1 ORDER BY scheduled_start"
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map(params![doctor_id.to_string()], |row| Ok(appointment_row(row)))?;

    let mut appts = Vec::new();
    for row in rows {
        appts.push(appointment_from_row(row??)?);
    }
    Ok(appts)
}

/// Doctor's schedule inside a half-open window [from, to).
pub fn get_doctor_schedule(
    conn: &Connection,
    doctor_id: &Uuid,
    from: &NaiveDateTime,
    to: &NaiveDateTime,
) -> Result<Vec<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE doctor_id = ?1 AND scheduled_start >= ?2 AND scheduled_start < ?3
         ORDER BY scheduled_start"
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map(
        params![doctor_id.to_string(), fmt_datetime(from), fmt_datetime(to)],
        |row| Ok(appointment_row(row)),
    )?;

    let mut appts = Vec::new();
    for row in rows {
        appts.push(appointment_from_row(row??)?);
    }
    Ok(appts)
}

pub fn update_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE appointments SET patient_id = ?2, doctor_id = ?3, room_id = ?4, created_by = ?5,
         scheduled_start = ?6, scheduled_end = ?7, status = ?8, reason = ?9, notes = ?10
         WHERE id = ?1",
        params![
            appt.id.to_string(),
            appt.patient_id.to_string(),
            appt.doctor_id.to_string(),
            appt.room_id.map(|id| id.to_string()),
            appt.created_by.map(|id| id.to_string()),
            fmt_datetime(&appt.scheduled_start),
            fmt_datetime(&appt.scheduled_end),
            appt.status.as_str(),
            appt.reason,
            appt.notes,
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: appt.id.to_string(),
        });
    }
    Ok(())
}

/// Plain overwrite: any status may replace any other, there is no
/// transition graph. Cancellation goes through here — appointments are
/// never deleted.
pub fn update_appointment_status(
    conn: &Connection,
    id: &Uuid,
    status: &AppointmentStatus,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE appointments SET status = ?2 WHERE id = ?1",
        params![id.to_string(), status.as_str()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Attach a service line, snapshotting the catalog price at this moment.
pub fn add_service_to_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
    service_id: &Uuid,
    quantity: i32,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "INSERT INTO appointment_services (appointment_id, service_id, quantity, unit_price)
         SELECT ?1, id, ?3, price FROM services WHERE id = ?2",
        params![appointment_id.to_string(), service_id.to_string(), quantity],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Service".into(),
            id: service_id.to_string(),
        });
    }
    Ok(())
}

pub fn remove_service_from_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
    service_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM appointment_services WHERE appointment_id = ?1 AND service_id = ?2",
        params![appointment_id.to_string(), service_id.to_string()],
    )?;
    Ok(())
}

pub fn get_services_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<AppointmentService>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT appointment_id, service_id, quantity, unit_price
         FROM appointment_services WHERE appointment_id = ?1",
    )?;

    let rows = stmt.query_map(params![appointment_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i32>(2)?,
            row.get::<_, f64>(3)?,
        ))
    })?;

    let mut lines = Vec::new();
    for row in rows {
        let (appointment_id, service_id, quantity, unit_price) = row?;
        lines.push(AppointmentService {
            appointment_id: Uuid::parse_str(&appointment_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            service_id: Uuid::parse_str(&service_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            quantity,
            unit_price,
        });
    }
    Ok(lines)
}

/// Appointments of the given doctor overlapping [start, end), cancelled
/// and no-show ones excluded. Advisory only: checking and booking are
/// separate statements, and the schema itself never rejects an overlap.
pub fn find_conflicts_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
) -> Result<Vec<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE doctor_id = ?1
           AND status NOT IN ('cancelled', 'no_show')
           AND scheduled_start < ?3 AND scheduled_end > ?2
         ORDER BY scheduled_start"
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map(
        params![doctor_id.to_string(), fmt_datetime(start), fmt_datetime(end)],
        |row| Ok(appointment_row(row)),
    )?;

    let mut appts = Vec::new();
    for row in rows {
        appts.push(appointment_from_row(row??)?);
    }
    Ok(appts)
}

/// Same overlap query keyed by room.
pub fn find_conflicts_for_room(
    conn: &Connection,
    room_id: &Uuid,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
) -> Result<Vec<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE room_id = ?1
           AND status NOT IN ('cancelled', 'no_show')
           AND scheduled_start < ?3 AND scheduled_end > ?2
         ORDER BY scheduled_start"
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map(
        params![room_id.to_string(), fmt_datetime(start), fmt_datetime(end)],
        |row| Ok(appointment_row(row)),
    )?;

    let mut appts = Vec::new();
    for row in rows {
        appts.push(appointment_from_row(row??)?);
    }
    Ok(appts)
}

// Internal row type for Appointment mapping
struct AppointmentRow {
    id: String,
    patient_id: String,
    doctor_id: String,
    room_id: Option<String>,
    created_by: Option<String>,
    scheduled_start: String,
    scheduled_end: String,
    status: String,
    reason: Option<String>,
    notes: Option<String>,
}

fn appointment_row(row: &rusqlite::Row<'_>) -> Result<AppointmentRow, rusqlite::Error> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        room_id: row.get(3)?,
        created_by: row.get(4)?,
        scheduled_start: row.get(5)?,
        scheduled_end: row.get(6)?,
        status: row.get(7)?,
        reason: row.get(8)?,
        notes: row.get(9)?,
    })
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_id: Uuid::parse_str(&row.patient_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        doctor_id: Uuid::parse_str(&row.doctor_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        room_id: row.room_id.and_then(|s| Uuid::parse_str(&s).ok()),
        created_by: row.created_by.and_then(|s| Uuid::parse_str(&s).ok()),
        scheduled_start: NaiveDateTime::parse_from_str(&row.scheduled_start, DATETIME_FORMAT)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        scheduled_end: NaiveDateTime::parse_from_str(&row.scheduled_end, DATETIME_FORMAT)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        status: AppointmentStatus::from_str(&row.status)?,
        reason: row.reason,
        notes: row.notes,
    })
}
