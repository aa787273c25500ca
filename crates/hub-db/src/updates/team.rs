//! Team update builder.

use hub_core::entities::TeamAffiliation;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<TeamAffiliation>,
}

pub struct TeamUpdateBuilder(TeamUpdate);

impl TeamUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TeamUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn affiliation(mut self, affiliation: TeamAffiliation) -> Self {
        self.0.affiliation = Some(affiliation);
        self
    }

    #[must_use]
    pub fn build(self) -> TeamUpdate {
        self.0
    }
}

impl Default for TeamUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
