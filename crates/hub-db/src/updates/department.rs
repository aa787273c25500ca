//! Department update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DepartmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `Some(None)` makes the department a root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<String>>,
}

pub struct DepartmentUpdateBuilder(DepartmentUpdate);

impl DepartmentUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(DepartmentUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn parent_id(mut self, parent_id: Option<String>) -> Self {
        self.0.parent_id = Some(parent_id);
        self
    }

    #[must_use]
    pub fn build(self) -> DepartmentUpdate {
        self.0
    }
}

impl Default for DepartmentUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
