//! Project repository.

use hub_core::audit_detail::UpdatedDetail;
use hub_core::entities::{Project, User};
use hub_core::enums::{AuditAction, EntityType};
use hub_core::ids::PREFIX_PROJECT;
use hub_core::validation;

use crate::error::DatabaseError;
use crate::service::{HubService, require_admin};
use crate::updates::field_names;
use crate::updates::project::ProjectUpdate;

const SELECT_COLS: &str = "id, name";

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

impl HubService {
    pub(crate) async fn insert_project(&self, project: &Project) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO projects ({SELECT_COLS}) VALUES (?1, ?2)"),
                libsql::params![project.id.as_str(), project.name.as_str()],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins and `Validation` for a blank name.
    pub async fn create_project(&self, actor: &User, name: &str) -> Result<Project, DatabaseError> {
        require_admin(actor, "creating a project")?;
        let project = Project {
            id: self.db().generate_id(PREFIX_PROJECT).await?,
            name: validation::require("name", name)?,
        };
        self.insert_project(&project).await?;
        self.audit(
            Some(actor),
            EntityType::Project,
            &project.id,
            AuditAction::Created,
            None,
        )
        .await?;
        Ok(project)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no project has this id.
    pub async fn get_project(&self, id: &str) -> Result<Project, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Project, id))?;
        row_to_project(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM projects ORDER BY name, id"), ())
            .await?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        Ok(projects)
    }

    /// # Errors
    ///
    /// Returns `Forbidden`, `NotFound`, or `Validation`.
    pub async fn update_project(
        &self,
        actor: &User,
        id: &str,
        update: ProjectUpdate,
    ) -> Result<Project, DatabaseError> {
        require_admin(actor, "updating a project")?;
        let current = self.get_project(id).await?;
        let Some(name) = update.name.as_deref() else {
            return Ok(current);
        };
        let name = validation::require("name", name)?;
        self.db()
            .conn()
            .execute(
                "UPDATE projects SET name = ?1 WHERE id = ?2",
                libsql::params![name.as_str(), id],
            )
            .await?;
        let detail = UpdatedDetail {
            fields: field_names(&update),
        };
        self.audit(
            Some(actor),
            EntityType::Project,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&detail)?),
        )
        .await?;
        Ok(Project { name, ..current })
    }

    /// Teams affiliated with the project keep the dangling id.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` or `NotFound`.
    pub async fn delete_project(&self, actor: &User, id: &str) -> Result<(), DatabaseError> {
        require_admin(actor, "deleting a project")?;
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1", [id])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found(EntityType::Project, id));
        }
        self.audit(Some(actor), EntityType::Project, id, AuditAction::Deleted, None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{admin, maria, test_service};
    use crate::updates::project::ProjectUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn crud_cycle_is_audited() {
        let svc = test_service().await;
        let actor = admin();

        let created = svc.create_project(&actor, "  Project Atlas ").await.unwrap();
        assert_eq!(created.name, "Project Atlas");
        assert!(created.id.starts_with("proj-"));

        let renamed = svc
            .update_project(
                &actor,
                &created.id,
                ProjectUpdateBuilder::new().name("Project Hermes").build(),
            )
            .await
            .unwrap();
        assert_eq!(svc.get_project(&created.id).await.unwrap(), renamed);

        svc.delete_project(&actor, &created.id).await.unwrap();
        assert!(svc.get_project(&created.id).await.unwrap_err().is_not_found());

        let trail = svc
            .query_audit(&AuditFilter {
                entity_id: Some(created.id.clone()),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        let actions: Vec<_> = trail.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![AuditAction::Deleted, AuditAction::Updated, AuditAction::Created]
        );
    }

    #[tokio::test]
    async fn members_cannot_manage_projects() {
        let svc = test_service().await;
        let err = svc.create_project(&maria(), "Side quest").await.unwrap_err();
        assert!(err.is_forbidden());
        assert!(svc.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_names_and_missing_rows_are_rejected() {
        let svc = test_service().await;
        assert!(svc.create_project(&admin(), " ").await.is_err());
        assert!(
            svc.delete_project(&admin(), "proj-404")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }
}
