use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Service;

pub fn insert_service(conn: &Connection, service: &Service) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO services (id, code, name, price, duration_minutes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            service.id.to_string(),
            service.code,
            service.name,
            service.price,
            service.duration_minutes,
        ],
    )?;
    Ok(())
}

pub fn get_service(conn: &Connection, id: &Uuid) -> Result<Option<Service>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, code, name, price, duration_minutes FROM services WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, f64>(3)?,
            row.get::<_, i32>(4)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(service_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_service_by_code(conn: &Connection, code: &str) -> Result<Option<Service>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, code, name, price, duration_minutes FROM services WHERE code = ?1 LIMIT 1",
    )?;

    let result = stmt.query_row(params![code], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, f64>(3)?,
            row.get::<_, i32>(4)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(service_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_services(conn: &Connection) -> Result<Vec<Service>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, code, name, price, duration_minutes FROM services ORDER BY code",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, f64>(3)?,
            row.get::<_, i32>(4)?,
        ))
    })?;

    let mut services = Vec::new();
    for row in rows {
        services.push(service_from_row(row?)?);
    }
    Ok(services)
}

/// Price changes here do not touch unit_price snapshots already taken on
/// appointment or invoice lines.
pub fn update_service(conn: &Connection, service: &Service) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE services SET code = ?2, name = ?3, price = ?4, duration_minutes = ?5
         WHERE id = ?1",
        params![
            service.id.to_string(),
            service.code,
            service.name,
            service.price,
            service.duration_minutes,
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Service".into(),
            id: service.id.to_string(),
        });
    }
    Ok(())
}

/// Fails with a foreign-key violation while appointment lines still
/// reference the service; invoice lines only hold a nullable tag and do
/// not block.
pub fn delete_service(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute("DELETE FROM services WHERE id = ?1", params![id.to_string()])?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Service".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn service_from_row(row: (String, String, String, f64, i32)) -> Result<Service, DatabaseError> {
    let (id, code, name, price, duration_minutes) = row;
    Ok(Service {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        code,
        name,
        price,
        duration_minutes,
    })
}
