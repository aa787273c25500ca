//! CLI response types returned as JSON by `linkhub` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Department, Link, Team, User};
use crate::enums::{EntityType, LinkStatus};
use crate::identity::AuthIdentity;

/// Response from `linkhub link approve|reject|archive|resubmit`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ModerationResponse {
    pub link: Link,
    pub previous_status: LinkStatus,
}

/// Response from `linkhub link click`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClickResponse {
    pub link_id: String,
    pub url: String,
    pub short_url: String,
    pub clicks: u64,
}

/// Response from every `delete` subcommand.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeleteResponse {
    pub entity_type: EntityType,
    pub id: String,
    pub deleted: bool,
}

/// A department row of the admin table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DepartmentRow {
    #[serde(flatten)]
    pub department: Department,
    pub label: String,
    pub parent_name: String,
}

/// A team row of the admin table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TeamRow {
    #[serde(flatten)]
    pub team: Team,
    pub label: String,
    pub parent: String,
}

/// Response from `linkhub auth status`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthStatusResponse {
    pub logged_in: bool,
    /// Where the session was found: `keyring` or `file`.
    pub source: Option<String>,
    pub identity: Option<AuthIdentity>,
    /// Directory user the identity resolves to.
    pub user: Option<User>,
}
