use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{UNKNOWN_ORG_ID, User};
use crate::enums::UserRole;

/// Avatar used when the identity provider returns none.
pub const DEFAULT_AVATAR: &str = "https://picsum.photos/seed/default/100/100";

/// Profile returned by the identity provider after a successful login.
///
/// Produced by `hub-auth`, consumed by `hub-cli` to resolve the viewer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthIdentity {
    /// Provider-scoped user id.
    pub open_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    /// Tenant-scoped user id, when the app has permission to read it.
    pub user_id: Option<String>,
}

impl AuthIdentity {
    /// Resolve the identity against the directory.
    ///
    /// A directory user with the same email (case-insensitive) wins. Anyone
    /// else becomes a plain `user` with unknown department and team.
    #[must_use]
    pub fn resolve(&self, directory: &[User]) -> User {
        if let Some(known) = self.find_in(directory) {
            return known.clone();
        }
        User {
            id: self.open_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self
                .avatar_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            role: UserRole::User,
            department_id: UNKNOWN_ORG_ID.to_string(),
            team_id: UNKNOWN_ORG_ID.to_string(),
        }
    }

    #[must_use]
    pub fn find_in<'a>(&self, directory: &'a [User]) -> Option<&'a User> {
        if self.email.is_empty() {
            return None;
        }
        directory
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(&self.email))
    }
}
