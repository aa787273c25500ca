//! Link audiences: a visibility mode together with the allow-lists it uses.
//!
//! Each variant carries only the id lists that mean something for its mode,
//! so a `team` link can never hold a stray department grant.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{GrantKind, VisibilityMode};

/// Who may see a link, besides its creator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Audience {
    #[default]
    Public,
    Department {
        department_ids: Vec<String>,
    },
    Team {
        team_ids: Vec<String>,
    },
    /// Project grants cover every team affiliated with the project; teams may
    /// also be granted directly.
    Project {
        project_ids: Vec<String>,
        #[serde(default)]
        team_ids: Vec<String>,
    },
    Private {
        user_ids: Vec<String>,
    },
}

/// Unsorted allow-lists, as collected from CLI flags or grant rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudienceParts {
    pub department_ids: Vec<String>,
    pub team_ids: Vec<String>,
    pub project_ids: Vec<String>,
    pub user_ids: Vec<String>,
}

impl AudienceParts {
    /// Push a stored grant row into the matching list.
    pub fn push(&mut self, kind: GrantKind, id: String) {
        match kind {
            GrantKind::Department => self.department_ids.push(id),
            GrantKind::Team => self.team_ids.push(id),
            GrantKind::Project => self.project_ids.push(id),
            GrantKind::User => self.user_ids.push(id),
        }
    }
}

impl Audience {
    #[must_use]
    pub const fn mode(&self) -> VisibilityMode {
        match self {
            Self::Public => VisibilityMode::Public,
            Self::Department { .. } => VisibilityMode::Department,
            Self::Team { .. } => VisibilityMode::Team,
            Self::Project { .. } => VisibilityMode::Project,
            Self::Private { .. } => VisibilityMode::Private,
        }
    }

    /// Build an audience for `mode`, keeping only the lists that mode uses.
    #[must_use]
    pub fn from_parts(mode: VisibilityMode, parts: AudienceParts) -> Self {
        match mode {
            VisibilityMode::Public => Self::Public,
            VisibilityMode::Department => Self::Department {
                department_ids: dedup(parts.department_ids),
            },
            VisibilityMode::Team => Self::Team {
                team_ids: dedup(parts.team_ids),
            },
            VisibilityMode::Project => Self::Project {
                project_ids: dedup(parts.project_ids),
                team_ids: dedup(parts.team_ids),
            },
            VisibilityMode::Private => Self::Private {
                user_ids: dedup(parts.user_ids),
            },
        }
    }

    /// Flatten the allow-lists into `(kind, id)` rows for storage.
    #[must_use]
    pub fn grants(&self) -> Vec<(GrantKind, &str)> {
        match self {
            Self::Public => Vec::new(),
            Self::Department { department_ids } => tag(GrantKind::Department, department_ids),
            Self::Team { team_ids } => tag(GrantKind::Team, team_ids),
            Self::Project {
                project_ids,
                team_ids,
            } => {
                let mut rows = tag(GrantKind::Project, project_ids);
                rows.extend(tag(GrantKind::Team, team_ids));
                rows
            }
            Self::Private { user_ids } => tag(GrantKind::User, user_ids),
        }
    }

    /// True when no id is granted (public links are never empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !matches!(self, Self::Public) && self.grants().is_empty()
    }
}

fn tag(kind: GrantKind, ids: &[String]) -> Vec<(GrantKind, &str)> {
    ids.iter().map(|id| (kind, id.as_str())).collect()
}

fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim().to_string();
        if !id.is_empty() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn serializes_with_mode_tag() {
        let audience = Audience::Team {
            team_ids: ids(&["team-1"]),
        };
        let json = serde_json::to_value(&audience).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "mode": "team", "team_ids": ["team-1"] })
        );
    }

    #[test]
    fn project_team_ids_default_to_empty() {
        let audience: Audience =
            serde_json::from_str(r#"{"mode":"project","project_ids":["proj-1"]}"#).unwrap();
        assert_eq!(
            audience,
            Audience::Project {
                project_ids: ids(&["proj-1"]),
                team_ids: Vec::new(),
            }
        );
    }

    #[test]
    fn from_parts_drops_lists_the_mode_ignores() {
        let parts = AudienceParts {
            department_ids: ids(&["dept-1"]),
            team_ids: ids(&["team-1", "team-1", " "]),
            project_ids: ids(&["proj-1"]),
            user_ids: ids(&["user-2"]),
        };
        assert_eq!(
            Audience::from_parts(VisibilityMode::Team, parts.clone()),
            Audience::Team {
                team_ids: ids(&["team-1"])
            }
        );
        assert_eq!(
            Audience::from_parts(VisibilityMode::Public, parts),
            Audience::Public
        );
    }

    #[test]
    fn project_grants_include_direct_teams() {
        let audience = Audience::Project {
            project_ids: ids(&["proj-1"]),
            team_ids: ids(&["team-4"]),
        };
        assert_eq!(
            audience.grants(),
            vec![(GrantKind::Project, "proj-1"), (GrantKind::Team, "team-4")]
        );
        assert!(!audience.is_empty());
    }

    #[test]
    fn empty_allow_list_is_reported() {
        assert!(Audience::Private { user_ids: vec![] }.is_empty());
        assert!(!Audience::Public.is_empty());
    }
}
