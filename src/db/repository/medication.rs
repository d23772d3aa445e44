use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Medication;

pub fn insert_medication(conn: &Connection, med: &Medication) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, name, strength, manufacturer, unit_of_measure)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            med.id.to_string(),
            med.name,
            med.strength,
            med.manufacturer,
            med.unit_of_measure,
        ],
    )?;
    Ok(())
}

pub fn get_medication(conn: &Connection, id: &Uuid) -> Result<Option<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, strength, manufacturer, unit_of_measure
         FROM medications WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(medication_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_medication_by_name_and_strength(
    conn: &Connection,
    name: &str,
    strength: &str,
) -> Result<Option<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, strength, manufacturer, unit_of_measure
         FROM medications WHERE name = ?1 AND strength = ?2 LIMIT 1",
    )?;

    let result = stmt.query_row(params![name, strength], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(medication_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn search_medications_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Vec<Medication>, DatabaseError> {
    let pattern = format!("%{name}%");
    let mut stmt = conn.prepare(
        "SELECT id, name, strength, manufacturer, unit_of_measure
         FROM medications WHERE LOWER(name) LIKE LOWER(?1)
         ORDER BY name, strength",
    )?;

    let rows = stmt.query_map(params![pattern], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
        ))
    })?;

    let mut meds = Vec::new();
    for row in rows {
        meds.push(medication_from_row(row?)?);
    }
    Ok(meds)
}

pub fn get_all_medications(conn: &Connection) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, strength, manufacturer, unit_of_measure
         FROM medications ORDER BY name, strength",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
        ))
    })?;

    let mut meds = Vec::new();
    for row in rows {
        meds.push(medication_from_row(row?)?);
    }
    Ok(meds)
}

pub fn update_medication(conn: &Connection, med: &Medication) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE medications SET name = ?2, strength = ?3, manufacturer = ?4, unit_of_measure = ?5
         WHERE id = ?1",
        params![
            med.id.to_string(),
            med.name,
            med.strength,
            med.manufacturer,
            med.unit_of_measure,
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Medication".into(),
            id: med.id.to_string(),
        });
    }
    Ok(())
}

/// The stock row cascades away; prescription items block the delete with
/// a foreign-key violation; invoice lines keep their text and lose the
/// medication tag.
pub fn delete_medication(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute("DELETE FROM medications WHERE id = ?1", params![id.to_string()])?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Medication".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn medication_from_row(
    row: (String, String, String, Option<String>, Option<String>),
) -> Result<Medication, DatabaseError> {
    let (id, name, strength, manufacturer, unit_of_measure) = row;
    Ok(Medication {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        name,
        strength,
        manufacturer,
        unit_of_measure,
    })
}
