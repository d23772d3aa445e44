use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Inventory;

/// Create or replace the stock row for a medication. The unique FK keeps
/// it at one row per medication.
pub fn upsert_inventory(conn: &Connection, inv: &Inventory) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO inventory (id, medication_id, quantity_on_hand, reorder_level)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(medication_id) DO UPDATE SET
             quantity_on_hand = excluded.quantity_on_hand,
             reorder_level = excluded.reorder_level",
        params![
            inv.id.to_string(),
            inv.medication_id.to_string(),
            inv.quantity_on_hand,
            inv.reorder_level,
        ],
    )?;
    Ok(())
}

pub fn get_inventory_for_medication(
    conn: &Connection,
    medication_id: &Uuid,
) -> Result<Option<Inventory>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, medication_id, quantity_on_hand, reorder_level
         FROM inventory WHERE medication_id = ?1",
    )?;

    let result = stmt.query_row(params![medication_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i32>(2)?,
            row.get::<_, i32>(3)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(inventory_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Apply a signed stock movement (receipt positive, dispense negative).
/// The CHECK on quantity_on_hand rejects movements that would go
/// negative.
pub fn adjust_inventory_quantity(
    conn: &Connection,
    medication_id: &Uuid,
    delta: i32,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE inventory SET quantity_on_hand = quantity_on_hand + ?2
         WHERE medication_id = ?1",
        params![medication_id.to_string(), delta],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Inventory".into(),
            id: medication_id.to_string(),
        });
    }
    Ok(())
}

pub fn set_reorder_level(
    conn: &Connection,
    medication_id: &Uuid,
    reorder_level: i32,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE inventory SET reorder_level = ?2 WHERE medication_id = ?1",
        params![medication_id.to_string(), reorder_level],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Inventory".into(),
            id: medication_id.to_string(),
        });
    }
    Ok(())
}

/// Stock rows at or below their reorder level.
pub fn get_inventory_below_reorder(conn: &Connection) -> Result<Vec<Inventory>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, medication_id, quantity_on_hand, reorder_level
         FROM inventory WHERE quantity_on_hand <= reorder_level",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i32>(2)?,
            row.get::<_, i32>(3)?,
        ))
    })?;

    let mut stock = Vec::new();
    for row in rows {
        stock.push(inventory_from_row(row?)?);
    }
    Ok(stock)
}

fn inventory_from_row(row: (String, String, i32, i32)) -> Result<Inventory, DatabaseError> {
    let (id, medication_id, quantity_on_hand, reorder_level) = row;
    Ok(Inventory {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        medication_id: Uuid::parse_str(&medication_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        quantity_on_hand,
        reorder_level,
    })
}
