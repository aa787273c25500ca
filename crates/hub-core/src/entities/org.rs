use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A node of the department tree.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Department {
    pub id: String,
    pub name: String,
    /// Parent department. The id may dangle after the parent is deleted.
    pub parent_id: Option<String>,
}

/// A flat, cross-cutting initiative that teams can be attached to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// A link category shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

/// Where a team sits in the org chart. A team hangs off a department or a
/// project, never both.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TeamAffiliation {
    #[default]
    Unassigned,
    Department {
        department_id: String,
    },
    Project {
        project_id: String,
    },
}

/// A team of users.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub affiliation: TeamAffiliation,
}

impl Team {
    #[must_use]
    pub fn department_id(&self) -> Option<&str> {
        match &self.affiliation {
            TeamAffiliation::Department { department_id } => Some(department_id),
            _ => None,
        }
    }

    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        match &self.affiliation {
            TeamAffiliation::Project { project_id } => Some(project_id),
            _ => None,
        }
    }
}
