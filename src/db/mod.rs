pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Check constraint violated: {0}")]
    CheckViolation(String),

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
}

// Constraint failures are split by extended result code so callers can
// tell a duplicate key from a dangling reference from a failed CHECK.
impl From<rusqlite::Error> for DatabaseError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(err, ref msg) = e {
            if err.code == rusqlite::ErrorCode::ConstraintViolation {
                let detail = msg.clone().unwrap_or_else(|| err.to_string());
                return match err.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        Self::UniqueViolation(detail)
                    }
                    rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                        Self::ForeignKeyViolation(detail)
                    }
                    rusqlite::ffi::SQLITE_CONSTRAINT_CHECK => Self::CheckViolation(detail),
                    _ => Self::ConstraintViolation(detail),
                };
            }
        }
        Self::Sqlite(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_maps_to_distinct_variant() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO rooms (id, name, capacity) VALUES ('r1', 'Exam 1', 1)",
            [],
        )
        .unwrap();
        let err: DatabaseError = conn
            .execute(
                "INSERT INTO rooms (id, name, capacity) VALUES ('r2', 'Exam 1', 2)",
                [],
            )
            .unwrap_err()
            .into();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)), "{err}");
    }

    #[test]
    fn foreign_key_violation_maps_to_distinct_variant() {
        let conn = open_memory_database().unwrap();
        let err: DatabaseError = conn
            .execute(
                "INSERT INTO doctor_specialties (doctor_id, specialty_id) VALUES ('missing', 'also-missing')",
                [],
            )
            .unwrap_err()
            .into();
        assert!(matches!(err, DatabaseError::ForeignKeyViolation(_)), "{err}");
    }

    #[test]
    fn check_violation_maps_to_distinct_variant() {
        let conn = open_memory_database().unwrap();
        let err: DatabaseError = conn
            .execute(
                "INSERT INTO patients (id, first_name, last_name) VALUES ('p1', '', 'Doe')",
                [],
            )
            .unwrap_err()
            .into();
        assert!(matches!(err, DatabaseError::CheckViolation(_)), "{err}");
    }

    #[test]
    fn non_constraint_errors_pass_through() {
        let conn = open_memory_database().unwrap();
        let err: DatabaseError = conn
            .execute("INSERT INTO no_such_table (id) VALUES (1)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DatabaseError::Sqlite(_)), "{err}");
    }
}
