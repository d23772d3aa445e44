use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::UserRole;
use crate::models::User;

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, username, email, password_hash, full_name, role, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id.to_string(),
            user.username,
            user.email,
            user.password_hash,
            user.full_name,
            user.role.as_str(),
            user.is_active as i32,
        ],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<Option<User>, DatabaseError> {
    fetch_user(conn, "id = ?1", &id.to_string())
}

pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>, DatabaseError> {
    fetch_user(conn, "username = ?1", username)
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    fetch_user(conn, "email = ?1", email)
}

fn fetch_user(conn: &Connection, predicate: &str, arg: &str) -> Result<Option<User>, DatabaseError> {
    let sql = format!(
        "SELECT id, username, email, password_hash, full_name, role, is_active
         FROM users WHERE {predicate} LIMIT 1"
    );
    let mut stmt = conn.prepare(&sql)?;

    let result = stmt.query_row(params![arg], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, i32>(6)?,
        ))
    });

    match result {
        Ok(row) => Ok(Some(user_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All accounts, retired ones included.
pub fn get_all_users(conn: &Connection) -> Result<Vec<User>, DatabaseError> {
    list_users(conn, false)
}

pub fn get_active_users(conn: &Connection) -> Result<Vec<User>, DatabaseError> {
    list_users(conn, true)
}

fn list_users(conn: &Connection, active_only: bool) -> Result<Vec<User>, DatabaseError> {
    let sql = if active_only {
        "SELECT id, username, email, password_hash, full_name, role, is_active
         FROM users WHERE is_active = 1 ORDER BY username"
    } else {
        "SELECT id, username, email, password_hash, full_name, role, is_active
         FROM users ORDER BY username"
    };
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, i32>(6)?,
        ))
    })?;

    let mut users = Vec::new();
    for row in rows {
        users.push(user_from_row(row?)?);
    }
    Ok(users)
}

pub fn update_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE users SET username = ?2, email = ?3, password_hash = ?4, full_name = ?5,
         role = ?6, is_active = ?7
         WHERE id = ?1",
        params![
            user.id.to_string(),
            user.username,
            user.email,
            user.password_hash,
            user.full_name,
            user.role.as_str(),
            user.is_active as i32,
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: user.id.to_string(),
        });
    }
    Ok(())
}

/// Retire an account. Accounts are never hard-deleted — rows referencing
/// them keep their back-reference.
pub fn deactivate_user(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE users SET is_active = 0 WHERE id = ?1",
        params![id.to_string()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: id.to_string(),
        });
    }
    tracing::info!("Deactivated user {id}");
    Ok(())
}

fn user_from_row(
    row: (String, String, String, String, Option<String>, String, i32),
) -> Result<User, DatabaseError> {
    let (id, username, email, password_hash, full_name, role, is_active) = row;
    Ok(User {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        username,
        email,
        password_hash,
        full_name,
        role: UserRole::from_str(&role)?,
        is_active: is_active != 0,
    })
}
