//! Team repository. A team hangs off a department or a project, never both.

use hub_core::audit_detail::UpdatedDetail;
use hub_core::entities::{Team, TeamAffiliation, User};
use hub_core::enums::{AuditAction, EntityType};
use hub_core::ids::PREFIX_TEAM;
use hub_core::org::TeamFilter;
use hub_core::responses::TeamRow;
use hub_core::validation;

use crate::error::DatabaseError;
use crate::helpers::get_opt_string;
use crate::service::{HubService, require_admin};
use crate::updates::field_names;
use crate::updates::team::TeamUpdate;

const SELECT_COLS: &str = "id, name, affiliation, affiliation_id";

fn row_to_team(row: &libsql::Row) -> Result<Team, DatabaseError> {
    let id: String = row.get(0)?;
    let kind: String = row.get(2)?;
    let parent = get_opt_string(row, 3)?;
    let affiliation = match (kind.as_str(), parent) {
        ("unassigned", None) => TeamAffiliation::Unassigned,
        ("department", Some(department_id)) => TeamAffiliation::Department { department_id },
        ("project", Some(project_id)) => TeamAffiliation::Project { project_id },
        (kind, parent) => {
            return Err(DatabaseError::InvalidState(format!(
                "team {id} has affiliation '{kind}' with parent {parent:?}"
            )));
        }
    };
    Ok(Team {
        id,
        name: row.get(1)?,
        affiliation,
    })
}

fn affiliation_columns(affiliation: &TeamAffiliation) -> (&'static str, Option<&str>) {
    match affiliation {
        TeamAffiliation::Unassigned => ("unassigned", None),
        TeamAffiliation::Department { department_id } => ("department", Some(department_id.as_str())),
        TeamAffiliation::Project { project_id } => ("project", Some(project_id.as_str())),
    }
}

impl HubService {
    pub(crate) async fn insert_team(&self, team: &Team) -> Result<(), DatabaseError> {
        let (kind, parent) = affiliation_columns(&team.affiliation);
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO teams ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![team.id.as_str(), team.name.as_str(), kind, parent],
            )
            .await?;
        Ok(())
    }

    async fn check_affiliation(&self, affiliation: &TeamAffiliation) -> Result<(), DatabaseError> {
        match affiliation {
            TeamAffiliation::Unassigned => Ok(()),
            TeamAffiliation::Department { department_id } => {
                self.get_department(department_id).await.map(drop)
            }
            TeamAffiliation::Project { project_id } => self.get_project(project_id).await.map(drop),
        }
    }

    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, `Validation` for a blank name, and
    /// `NotFound` for an unknown department or project.
    pub async fn create_team(
        &self,
        actor: &User,
        name: &str,
        affiliation: TeamAffiliation,
    ) -> Result<Team, DatabaseError> {
        require_admin(actor, "creating a team")?;
        let name = validation::require("name", name)?;
        self.check_affiliation(&affiliation).await?;
        let team = Team {
            id: self.db().generate_id(PREFIX_TEAM).await?,
            name,
            affiliation,
        };
        self.insert_team(&team).await?;
        self.audit(Some(actor), EntityType::Team, &team.id, AuditAction::Created, None)
            .await?;
        Ok(team)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no team has this id.
    pub async fn get_team(&self, id: &str) -> Result<Team, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM teams WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Team, id))?;
        row_to_team(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_teams(&self) -> Result<Vec<Team>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM teams ORDER BY rowid"), ())
            .await?;
        let mut teams = Vec::new();
        while let Some(row) = rows.next().await? {
            teams.push(row_to_team(&row)?);
        }
        Ok(teams)
    }

    /// Teams narrowed like the link form's team picker, with labels.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the org chart cannot be loaded.
    pub async fn team_rows(&self, filter: &TeamFilter) -> Result<Vec<TeamRow>, DatabaseError> {
        let chart = self.org_chart().await?;
        Ok(chart
            .filter_teams(filter)
            .into_iter()
            .map(|team| TeamRow {
                label: chart.team_label(team),
                parent: chart.team_parent_label(team),
                team: team.clone(),
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns `Forbidden`, `NotFound`, or `Validation`.
    pub async fn update_team(
        &self,
        actor: &User,
        id: &str,
        update: TeamUpdate,
    ) -> Result<Team, DatabaseError> {
        require_admin(actor, "updating a team")?;
        let mut team = self.get_team(id).await?;
        if let Some(name) = update.name.as_deref() {
            team.name = validation::require("name", name)?;
        }
        if let Some(affiliation) = &update.affiliation {
            self.check_affiliation(affiliation).await?;
            team.affiliation = affiliation.clone();
        }
        let fields = field_names(&update);
        if fields.is_empty() {
            return Ok(team);
        }

        let (kind, parent) = affiliation_columns(&team.affiliation);
        self.db()
            .conn()
            .execute(
                "UPDATE teams SET name = ?1, affiliation = ?2, affiliation_id = ?3 WHERE id = ?4",
                libsql::params![team.name.as_str(), kind, parent, id],
            )
            .await?;
        self.audit(
            Some(actor),
            EntityType::Team,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&UpdatedDetail { fields })?),
        )
        .await?;
        Ok(team)
    }

    /// Users and link grants naming the team keep the dangling id.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` or `NotFound`.
    pub async fn delete_team(&self, actor: &User, id: &str) -> Result<(), DatabaseError> {
        require_admin(actor, "deleting a team")?;
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM teams WHERE id = ?1", [id])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found(EntityType::Team, id));
        }
        self.audit(Some(actor), EntityType::Team, id, AuditAction::Deleted, None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{admin, seeded_service};
    use crate::updates::team::TeamUpdateBuilder;
    use pretty_assertions::assert_eq;

    fn ids(rows: &[TeamRow]) -> Vec<&str> {
        rows.iter().map(|r| r.team.id.as_str()).collect()
    }

    #[tokio::test]
    async fn rows_follow_the_picker_filter() {
        let svc = seeded_service().await;
        let all = svc.team_rows(&TeamFilter::All).await.unwrap();
        assert_eq!(ids(&all), vec!["team-1", "team-2", "team-3", "team-4", "team-5"]);

        let platform = svc
            .team_rows(&TeamFilter::Department("dept-1-1".into()))
            .await
            .unwrap();
        assert_eq!(ids(&platform), vec!["team-1", "team-2"]);
        assert_eq!(platform[0].label, "Frontend (Platform Engineering)");
        assert_eq!(platform[0].parent, "Dept: Platform Engineering");

        let phoenix = svc
            .team_rows(&TeamFilter::Project("proj-1".into()))
            .await
            .unwrap();
        assert_eq!(ids(&phoenix), vec!["team-4"]);
        assert_eq!(phoenix[0].parent, "Proj: Project Phoenix");
    }

    #[tokio::test]
    async fn moving_a_team_between_parents() {
        let svc = seeded_service().await;
        let moved = svc
            .update_team(
                &admin(),
                "team-3",
                TeamUpdateBuilder::new()
                    .affiliation(TeamAffiliation::Project {
                        project_id: "proj-2".into(),
                    })
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(moved.project_id(), Some("proj-2"));
        assert_eq!(moved.department_id(), None);
        assert_eq!(svc.get_team("team-3").await.unwrap(), moved);
    }

    #[tokio::test]
    async fn unassigned_teams_roundtrip() {
        let svc = seeded_service().await;
        let team = svc
            .create_team(&admin(), "Guild", TeamAffiliation::Unassigned)
            .await
            .unwrap();
        let rows = svc.team_rows(&TeamFilter::All).await.unwrap();
        let row = rows.iter().find(|r| r.team.id == team.id).unwrap();
        assert_eq!(row.label, "Guild");
        assert_eq!(row.parent, "N/A");
    }

    #[tokio::test]
    async fn unknown_parent_is_rejected() {
        let svc = seeded_service().await;
        let err = svc
            .create_team(
                &admin(),
                "Ghost",
                TeamAffiliation::Department {
                    department_id: "dept-404".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn deleted_project_labels_teams_with_placeholder() {
        let svc = seeded_service().await;
        svc.delete_project(&admin(), "proj-2").await.unwrap();
        let rows = svc
            .team_rows(&TeamFilter::Project("proj-2".into()))
            .await
            .unwrap();
        assert_eq!(rows[0].label, "Data Analytics (Project)");
        assert_eq!(rows[0].parent, "Proj: ?");
    }
}
