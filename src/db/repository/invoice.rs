use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::InvoiceStatus;
use crate::models::{Invoice, InvoiceItem};

/// Write an invoice and its line items in one transaction. total_amount
/// is stored exactly as given — it is not derived from the lines.
pub fn create_invoice(
    conn: &Connection,
    invoice: &Invoice,
    items: &[InvoiceItem],
) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO invoices (id, patient_id, appointment_id, created_by, total_amount, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            invoice.id.to_string(),
            invoice.patient_id.to_string(),
            invoice.appointment_id.map(|id| id.to_string()),
            invoice.created_by.map(|id| id.to_string()),
            invoice.total_amount,
            invoice.status.as_str(),
        ],
    )?;
    for item in items {
        insert_invoice_item(&tx, item)?;
    }
    tx.commit()?;
    Ok(())
}

pub fn insert_invoice_item(conn: &Connection, item: &InvoiceItem) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO invoice_items (id, invoice_id, service_id, medication_id, description,
         quantity, unit_price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            item.id.to_string(),
            item.invoice_id.to_string(),
            item.service_id.map(|id| id.to_string()),
            item.medication_id.map(|id| id.to_string()),
            item.description,
            item.quantity,
            item.unit_price,
        ],
    )?;
    Ok(())
}

pub fn get_invoice(conn: &Connection, id: &Uuid) -> Result<Option<Invoice>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, appointment_id, created_by, total_amount, status
         FROM invoices WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, f64>(4)?,
            row.get::<_, String>(5)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(invoice_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_invoices_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Invoice>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, appointment_id, created_by, total_amount, status
         FROM invoices WHERE patient_id = ?1 ORDER BY created_at",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, f64>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut invoices = Vec::new();
    for row in rows {
        invoices.push(invoice_from_row(row?)?);
    }
    Ok(invoices)
}

/// Plain overwrite between pending, paid, and void.
pub fn update_invoice_status(
    conn: &Connection,
    id: &Uuid,
    status: &InvoiceStatus,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE invoices SET status = ?2 WHERE id = ?1",
        params![id.to_string(), status.as_str()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Invoice".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn remove_invoice_item(conn: &Connection, item_id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "DELETE FROM invoice_items WHERE id = ?1",
        params![item_id.to_string()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "InvoiceItem".into(),
            id: item_id.to_string(),
        });
    }
    Ok(())
}

pub fn get_invoice_items(
    conn: &Connection,
    invoice_id: &Uuid,
) -> Result<Vec<InvoiceItem>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, invoice_id, service_id, medication_id, description, quantity, unit_price
         FROM invoice_items WHERE invoice_id = ?1",
    )?;

    let rows = stmt.query_map(params![invoice_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, i32>(5)?,
            row.get::<_, f64>(6)?,
        ))
    })?;

    let mut items = Vec::new();
    for row in rows {
        let (id, invoice_id, service_id, medication_id, description, quantity, unit_price) = row?;
        items.push(InvoiceItem {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            invoice_id: Uuid::parse_str(&invoice_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            service_id: service_id.and_then(|s| Uuid::parse_str(&s).ok()),
            medication_id: medication_id.and_then(|s| Uuid::parse_str(&s).ok()),
            description,
            quantity,
            unit_price,
        });
    }
    Ok(items)
}

/// Sum the generated line_total column into the stored total_amount.
/// The schema never does this on its own; callers decide when the two
/// should agree.
pub fn recalculate_invoice_total(conn: &Connection, invoice_id: &Uuid) -> Result<f64, DatabaseError> {
    let total: f64 = conn.query_row(
        "SELECT COALESCE(SUM(line_total), 0) FROM invoice_items WHERE invoice_id = ?1",
        params![invoice_id.to_string()],
        |row| row.get(0),
    )?;
    let rows = conn.execute(
        "UPDATE invoices SET total_amount = ?2 WHERE id = ?1",
        params![invoice_id.to_string(), total],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Invoice".into(),
            id: invoice_id.to_string(),
        });
    }
    Ok(total)
}

fn invoice_from_row(
    row: (String, String, Option<String>, Option<String>, f64, String),
) -> Result<Invoice, DatabaseError> {
    let (id, patient_id, appointment_id, created_by, total_amount, status) = row;
    Ok(Invoice {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_id: Uuid::parse_str(&patient_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        appointment_id: appointment_id.and_then(|s| Uuid::parse_str(&s).ok()),
        created_by: created_by.and_then(|s| Uuid::parse_str(&s).ok()),
        total_amount,
        status: InvoiceStatus::from_str(&status)?,
    })
}
