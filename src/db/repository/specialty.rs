use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Specialty;

pub fn insert_specialty(conn: &Connection, specialty: &Specialty) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO specialties (id, name, description) VALUES (?1, ?2, ?3)",
        params![specialty.id.to_string(), specialty.name, specialty.description],
    )?;
    Ok(())
}

pub fn get_specialty(conn: &Connection, id: &Uuid) -> Result<Option<Specialty>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, name, description FROM specialties WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(specialty_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_specialty_by_name(conn: &Connection, name: &str) -> Result<Option<Specialty>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, name, description FROM specialties WHERE name = ?1 LIMIT 1")?;

    let result = stmt.query_row(params![name], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(specialty_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_specialties(conn: &Connection) -> Result<Vec<Specialty>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, name, description FROM specialties ORDER BY name")?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;

    let mut specialties = Vec::new();
    for row in rows {
        specialties.push(specialty_from_row(row?)?);
    }
    Ok(specialties)
}

pub fn update_specialty(conn: &Connection, specialty: &Specialty) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE specialties SET name = ?2, description = ?3 WHERE id = ?1",
        params![specialty.id.to_string(), specialty.name, specialty.description],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Specialty".into(),
            id: specialty.id.to_string(),
        });
    }
    Ok(())
}

/// Doctor links cascade away with the specialty.
pub fn delete_specialty(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute("DELETE FROM specialties WHERE id = ?1", params![id.to_string()])?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Specialty".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn specialty_from_row(row: (String, String, Option<String>)) -> Result<Specialty, DatabaseError> {
    let (id, name, description) = row;
    Ok(Specialty {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        name,
        description,
    })
}
