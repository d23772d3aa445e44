use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::UserRole;

/// Staff account. Accounts are deactivated, never hard-deleted, so rows
/// referencing them stay resolvable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
}
