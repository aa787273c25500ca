//! Org-chart queries: department lineage, team projections, and display labels.
//!
//! [`OrgChart`] is a snapshot of the departments, teams, and projects. It is
//! loaded once per command by `hub-db` and handed to the visibility resolver
//! and the admin views.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Department, Project, Team, TeamAffiliation};

/// Upper bound on department ancestor walks.
pub const MAX_DEPARTMENT_DEPTH: usize = 64;

/// Label for a department id that is not in the chart.
pub const UNKNOWN_DEPARTMENT_LABEL: &str = "Unknown department";

/// Snapshot of the organizational taxonomy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OrgChart {
    pub departments: Vec<Department>,
    pub teams: Vec<Team>,
    pub projects: Vec<Project>,
}

/// Narrowing applied to the team picker of the link form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TeamFilter {
    #[default]
    All,
    Department(String),
    Project(String),
}

impl OrgChart {
    #[must_use]
    pub fn department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    #[must_use]
    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// The department itself followed by its ancestors, nearest first.
    ///
    /// The walk stops at a root, at an id missing from the chart, on the
    /// first revisited id, or after [`MAX_DEPARTMENT_DEPTH`] steps.
    #[must_use]
    pub fn department_lineage<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        let mut lineage = vec![id];
        let mut visited: HashSet<&str> = HashSet::from([id]);
        let mut current = id;

        while lineage.len() < MAX_DEPARTMENT_DEPTH {
            let Some(parent) = self
                .department(current)
                .and_then(|d| d.parent_id.as_deref())
            else {
                break;
            };
            if !visited.insert(parent) {
                break;
            }
            lineage.push(parent);
            current = parent;
        }
        lineage
    }

    /// True if making `new_parent` the parent of `department_id` closes a loop.
    #[must_use]
    pub fn would_create_cycle(&self, department_id: &str, new_parent: &str) -> bool {
        new_parent == department_id || self.department_lineage(new_parent).contains(&department_id)
    }

    #[must_use]
    pub fn teams_in_department(&self, department_id: &str) -> Vec<&Team> {
        self.teams
            .iter()
            .filter(|t| t.department_id() == Some(department_id))
            .collect()
    }

    #[must_use]
    pub fn teams_in_project(&self, project_id: &str) -> Vec<&Team> {
        self.teams
            .iter()
            .filter(|t| t.project_id() == Some(project_id))
            .collect()
    }

    /// Ids of every team attached to one of `project_ids`.
    #[must_use]
    pub fn team_ids_in_projects(&self, project_ids: &[String]) -> HashSet<&str> {
        self.teams
            .iter()
            .filter(|t| t.project_id().is_some_and(|p| project_ids.iter().any(|id| id == p)))
            .map(|t| t.id.as_str())
            .collect()
    }

    /// Teams shown in the picker. An empty filter id shows everything.
    #[must_use]
    pub fn filter_teams(&self, filter: &TeamFilter) -> Vec<&Team> {
        match filter {
            TeamFilter::Department(id) if !id.is_empty() => self.teams_in_department(id),
            TeamFilter::Project(id) if !id.is_empty() => self.teams_in_project(id),
            _ => self.teams.iter().collect(),
        }
    }

    /// Keep only directly granted teams that belong to a selected project.
    #[must_use]
    pub fn prune_team_grants(&self, team_ids: &[String], project_ids: &[String]) -> Vec<String> {
        let allowed = self.team_ids_in_projects(project_ids);
        team_ids
            .iter()
            .filter(|id| allowed.contains(id.as_str()))
            .cloned()
            .collect()
    }

    /// `"Name (Parent)"`, `"Name (Sub-department)"` when the parent is gone,
    /// or just `"Name"` for a root.
    #[must_use]
    pub fn department_label(&self, department: &Department) -> String {
        match department.parent_id.as_deref() {
            Some(parent_id) => {
                let parent = self
                    .department(parent_id)
                    .map_or("Sub-department", |p| p.name.as_str());
                format!("{} ({parent})", department.name)
            }
            None => department.name.clone(),
        }
    }

    #[must_use]
    pub fn department_label_by_id(&self, id: &str) -> String {
        self.department(id).map_or_else(
            || UNKNOWN_DEPARTMENT_LABEL.to_string(),
            |d| self.department_label(d),
        )
    }

    /// Parent column of the department admin table.
    #[must_use]
    pub fn parent_department_name(&self, parent_id: Option<&str>) -> &str {
        match parent_id {
            None => "N/A",
            Some(id) => self.department(id).map_or("Unknown", |d| d.name.as_str()),
        }
    }

    /// `"Name (Department name)"` or `"Name (Project name)"`.
    #[must_use]
    pub fn team_label(&self, team: &Team) -> String {
        match &team.affiliation {
            TeamAffiliation::Department { department_id } => {
                let parent = self
                    .department(department_id)
                    .map_or("Department", |d| d.name.as_str());
                format!("{} ({parent})", team.name)
            }
            TeamAffiliation::Project { project_id } => {
                let parent = self
                    .project(project_id)
                    .map_or("Project", |p| p.name.as_str());
                format!("{} ({parent})", team.name)
            }
            TeamAffiliation::Unassigned => team.name.clone(),
        }
    }

    /// Parent column of the team admin table.
    #[must_use]
    pub fn team_parent_label(&self, team: &Team) -> String {
        match &team.affiliation {
            TeamAffiliation::Department { department_id } => format!(
                "Dept: {}",
                self.department(department_id).map_or("?", |d| d.name.as_str())
            ),
            TeamAffiliation::Project { project_id } => format!(
                "Proj: {}",
                self.project(project_id).map_or("?", |p| p.name.as_str())
            ),
            TeamAffiliation::Unassigned => "N/A".to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn dept(id: &str, name: &str, parent: Option<&str>) -> Department {
        Department {
            id: id.into(),
            name: name.into(),
            parent_id: parent.map(String::from),
        }
    }

    pub fn team(id: &str, name: &str, affiliation: TeamAffiliation) -> Team {
        Team {
            id: id.into(),
            name: name.into(),
            affiliation,
        }
    }

    pub fn in_dept(id: &str) -> TeamAffiliation {
        TeamAffiliation::Department {
            department_id: id.into(),
        }
    }

    pub fn in_proj(id: &str) -> TeamAffiliation {
        TeamAffiliation::Project {
            project_id: id.into(),
        }
    }

    /// The seeded directory's org chart.
    pub fn chart() -> OrgChart {
        OrgChart {
            departments: vec![
                dept("dept-1", "Technology", None),
                dept("dept-1-1", "Platform Engineering", Some("dept-1")),
                dept("dept-2", "Business", None),
                dept("dept-3", "Operations", None),
            ],
            teams: vec![
                team("team-1", "Frontend", in_dept("dept-1-1")),
                team("team-2", "Backend", in_dept("dept-1-1")),
                team("team-3", "Sales", in_dept("dept-2")),
                team("team-4", "Core UX", in_proj("proj-1")),
                team("team-5", "Data Analytics", in_proj("proj-2")),
            ],
            projects: vec![
                Project {
                    id: "proj-1".into(),
                    name: "Project Phoenix".into(),
                },
                Project {
                    id: "proj-2".into(),
                    name: "Project Titan".into(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(teams: &[&Team]) -> Vec<String> {
        teams.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn lineage_walks_to_root() {
        let chart = chart();
        assert_eq!(chart.department_lineage("dept-1-1"), vec!["dept-1-1", "dept-1"]);
        assert_eq!(chart.department_lineage("dept-2"), vec!["dept-2"]);
    }

    #[test]
    fn lineage_of_unknown_department_is_itself() {
        assert_eq!(chart().department_lineage("unknown"), vec!["unknown"]);
    }

    #[test]
    fn lineage_terminates_on_cycles() {
        let chart = OrgChart {
            departments: vec![
                dept("a", "A", Some("b")),
                dept("b", "B", Some("c")),
                dept("c", "C", Some("a")),
            ],
            ..OrgChart::default()
        };
        assert_eq!(chart.department_lineage("a"), vec!["a", "b", "c"]);
    }

    #[test]
    fn lineage_stops_at_depth_limit() {
        let departments = (0..100)
            .map(|i| {
                let parent = format!("d{}", i + 1);
                dept(&format!("d{i}"), "D", Some(&parent))
            })
            .collect();
        let chart = OrgChart {
            departments,
            ..OrgChart::default()
        };
        assert_eq!(chart.department_lineage("d0").len(), MAX_DEPARTMENT_DEPTH);
    }

    #[test]
    fn cycle_detection_on_reparent() {
        let chart = chart();
        assert!(chart.would_create_cycle("dept-1", "dept-1-1"));
        assert!(chart.would_create_cycle("dept-1", "dept-1"));
        assert!(!chart.would_create_cycle("dept-2", "dept-1-1"));
    }

    #[test]
    fn teams_by_department_and_project() {
        let chart = chart();
        assert_eq!(ids(&chart.teams_in_department("dept-1-1")), vec!["team-1", "team-2"]);
        assert_eq!(ids(&chart.teams_in_project("proj-2")), vec!["team-5"]);
        assert!(chart.teams_in_department("dept-1").is_empty());
    }

    #[test]
    fn empty_filter_id_shows_all_teams() {
        let chart = chart();
        assert_eq!(chart.filter_teams(&TeamFilter::Project(String::new())).len(), 5);
        assert_eq!(
            ids(&chart.filter_teams(&TeamFilter::Project("proj-1".into()))),
            vec!["team-4"]
        );
    }

    #[test]
    fn pruning_keeps_only_teams_of_selected_projects() {
        let chart = chart();
        let teams = vec!["team-4".to_string(), "team-5".to_string(), "team-1".to_string()];
        assert_eq!(
            chart.prune_team_grants(&teams, &["proj-1".to_string()]),
            vec!["team-4"]
        );
        assert!(chart.prune_team_grants(&teams, &[]).is_empty());
    }

    #[test]
    fn department_labels() {
        let mut chart = chart();
        assert_eq!(
            chart.department_label_by_id("dept-1-1"),
            "Platform Engineering (Technology)"
        );
        assert_eq!(chart.department_label_by_id("dept-2"), "Business");
        assert_eq!(chart.department_label_by_id("dept-9"), UNKNOWN_DEPARTMENT_LABEL);

        chart.departments.retain(|d| d.id != "dept-1");
        assert_eq!(
            chart.department_label_by_id("dept-1-1"),
            "Platform Engineering (Sub-department)"
        );
        assert_eq!(chart.parent_department_name(Some("dept-1")), "Unknown");
        assert_eq!(chart.parent_department_name(None), "N/A");
    }

    #[test]
    fn team_labels() {
        let chart = chart();
        let frontend = chart.team("team-1").unwrap();
        let core_ux = chart.team("team-4").unwrap();
        assert_eq!(chart.team_label(frontend), "Frontend (Platform Engineering)");
        assert_eq!(chart.team_label(core_ux), "Core UX (Project Phoenix)");
        assert_eq!(chart.team_parent_label(core_ux), "Proj: Project Phoenix");

        let orphan = team("team-9", "Ghost", in_proj("proj-9"));
        assert_eq!(chart.team_label(&orphan), "Ghost (Project)");
        assert_eq!(chart.team_parent_label(&orphan), "Proj: ?");
        let loose = team("team-8", "Loose", TeamAffiliation::Unassigned);
        assert_eq!(chart.team_parent_label(&loose), "N/A");
    }
}
