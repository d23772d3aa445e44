use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Room;

pub fn insert_room(conn: &Connection, room: &Room) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO rooms (id, name, capacity) VALUES (?1, ?2, ?3)",
        params![room.id.to_string(), room.name, room.capacity],
    )?;
    Ok(())
}

pub fn get_room(conn: &Connection, id: &Uuid) -> Result<Option<Room>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name, capacity FROM rooms WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i32>(2)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(room_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_room_by_name(conn: &Connection, name: &str) -> Result<Option<Room>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name, capacity FROM rooms WHERE name = ?1 LIMIT 1")?;

    let result = stmt.query_row(params![name], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i32>(2)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(room_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_rooms(conn: &Connection) -> Result<Vec<Room>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name, capacity FROM rooms ORDER BY name")?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i32>(2)?,
        ))
    })?;

    let mut rooms = Vec::new();
    for row in rows {
        rooms.push(room_from_row(row?)?);
    }
    Ok(rooms)
}

pub fn update_room(conn: &Connection, room: &Room) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE rooms SET name = ?2, capacity = ?3 WHERE id = ?1",
        params![room.id.to_string(), room.name, room.capacity],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Room".into(),
            id: room.id.to_string(),
        });
    }
    Ok(())
}

/// Appointments held in the room keep running with room set to NULL.
pub fn delete_room(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute("DELETE FROM rooms WHERE id = ?1", params![id.to_string()])?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Room".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn room_from_row(row: (String, String, i32)) -> Result<Room, DatabaseError> {
    let (id, name, capacity) = row;
    Ok(Room {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        name,
        capacity,
    })
}
