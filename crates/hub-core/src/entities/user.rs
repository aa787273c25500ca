use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UserRole;

/// Department and team ids given to identities the directory does not know.
pub const UNKNOWN_ORG_ID: &str = "unknown";

/// A directory user. Every user belongs to exactly one department and team.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub role: UserRole,
    pub department_id: String,
    pub team_id: String,
}

impl User {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
