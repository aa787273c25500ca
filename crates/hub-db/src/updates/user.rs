//! User update builder.

use hub_core::enums::UserRole;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

pub struct UserUpdateBuilder(UserUpdate);

impl UserUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(UserUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.0.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.0.avatar = Some(avatar.into());
        self
    }

    #[must_use]
    pub const fn role(mut self, role: UserRole) -> Self {
        self.0.role = Some(role);
        self
    }

    #[must_use]
    pub fn department_id(mut self, department_id: impl Into<String>) -> Self {
        self.0.department_id = Some(department_id.into());
        self
    }

    #[must_use]
    pub fn team_id(mut self, team_id: impl Into<String>) -> Self {
        self.0.team_id = Some(team_id.into());
        self
    }

    #[must_use]
    pub fn build(self) -> UserUpdate {
        self.0
    }
}

impl Default for UserUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
