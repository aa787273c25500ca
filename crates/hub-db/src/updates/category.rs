//! Category update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

pub struct CategoryUpdateBuilder(CategoryUpdate);

impl CategoryUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CategoryUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.0.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn build(self) -> CategoryUpdate {
        self.0
    }
}

impl Default for CategoryUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
