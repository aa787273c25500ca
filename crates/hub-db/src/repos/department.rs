//! Department repository: the department tree and its admin rows.

use hub_core::audit_detail::UpdatedDetail;
use hub_core::entities::{Department, User};
use hub_core::enums::{AuditAction, EntityType};
use hub_core::ids::PREFIX_DEPARTMENT;
use hub_core::org::OrgChart;
use hub_core::responses::DepartmentRow;
use hub_core::validation;

use crate::error::DatabaseError;
use crate::helpers::get_opt_string;
use crate::service::{HubService, require_admin};
use crate::updates::department::DepartmentUpdate;
use crate::updates::field_names;

const SELECT_COLS: &str = "id, name, parent_id";

fn row_to_department(row: &libsql::Row) -> Result<Department, DatabaseError> {
    Ok(Department {
        id: row.get(0)?,
        name: row.get(1)?,
        parent_id: get_opt_string(row, 2)?,
    })
}

fn blank_to_none(id: Option<&str>) -> Option<String> {
    id.map(str::trim).filter(|id| !id.is_empty()).map(String::from)
}

impl HubService {
    pub(crate) async fn insert_department(&self, department: &Department) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO departments ({SELECT_COLS}) VALUES (?1, ?2, ?3)"),
                libsql::params![
                    department.id.as_str(),
                    department.name.as_str(),
                    department.parent_id.as_deref()
                ],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, `Validation` for a blank name, and
    /// `NotFound` for an unknown parent.
    pub async fn create_department(
        &self,
        actor: &User,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Department, DatabaseError> {
        require_admin(actor, "creating a department")?;
        let name = validation::require("name", name)?;
        let parent_id = blank_to_none(parent_id);
        if let Some(parent) = parent_id.as_deref() {
            self.get_department(parent).await?;
        }
        let department = Department {
            id: self.db().generate_id(PREFIX_DEPARTMENT).await?,
            name,
            parent_id,
        };
        self.insert_department(&department).await?;
        self.audit(
            Some(actor),
            EntityType::Department,
            &department.id,
            AuditAction::Created,
            None,
        )
        .await?;
        Ok(department)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no department has this id.
    pub async fn get_department(&self, id: &str) -> Result<Department, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM departments WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Department, id))?;
        row_to_department(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_departments(&self) -> Result<Vec<Department>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM departments ORDER BY rowid"), ())
            .await?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next().await? {
            departments.push(row_to_department(&row)?);
        }
        Ok(departments)
    }

    /// Snapshot of departments, teams, and projects for visibility checks
    /// and labels.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any of the three lists cannot be loaded.
    pub async fn org_chart(&self) -> Result<OrgChart, DatabaseError> {
        Ok(OrgChart {
            departments: self.list_departments().await?,
            teams: self.list_teams().await?,
            projects: self.list_projects().await?,
        })
    }

    /// Departments with their display label and parent column.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the org chart cannot be loaded.
    pub async fn department_rows(&self) -> Result<Vec<DepartmentRow>, DatabaseError> {
        let chart = self.org_chart().await?;
        Ok(chart
            .departments
            .iter()
            .map(|department| DepartmentRow {
                label: chart.department_label(department),
                parent_name: chart
                    .parent_department_name(department.parent_id.as_deref())
                    .to_string(),
                department: department.clone(),
            })
            .collect())
    }

    /// `"Name (Parent)"`, or the unknown label for a dangling id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the org chart cannot be loaded.
    pub async fn department_label(&self, id: &str) -> Result<String, DatabaseError> {
        Ok(self.org_chart().await?.department_label_by_id(id))
    }

    /// # Errors
    ///
    /// Returns `Forbidden`, `NotFound` (department or new parent), or
    /// `Validation` for a blank name or a parent that would close a cycle.
    pub async fn update_department(
        &self,
        actor: &User,
        id: &str,
        update: DepartmentUpdate,
    ) -> Result<Department, DatabaseError> {
        require_admin(actor, "updating a department")?;
        let mut department = self.get_department(id).await?;

        if let Some(name) = update.name.as_deref() {
            department.name = validation::require("name", name)?;
        }
        if let Some(parent) = &update.parent_id {
            let parent = blank_to_none(parent.as_deref());
            if let Some(parent_id) = parent.as_deref() {
                self.get_department(parent_id).await?;
                let chart = OrgChart {
                    departments: self.list_departments().await?,
                    ..OrgChart::default()
                };
                if chart.would_create_cycle(id, parent_id) {
                    return Err(DatabaseError::validation(format!(
                        "making {parent_id} the parent of {id} would create a cycle"
                    )));
                }
            }
            department.parent_id = parent;
        }

        let fields = field_names(&update);
        if fields.is_empty() {
            return Ok(department);
        }
        self.db()
            .conn()
            .execute(
                "UPDATE departments SET name = ?1, parent_id = ?2 WHERE id = ?3",
                libsql::params![
                    department.name.as_str(),
                    department.parent_id.as_deref(),
                    id
                ],
            )
            .await?;
        self.audit(
            Some(actor),
            EntityType::Department,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&UpdatedDetail { fields })?),
        )
        .await?;
        Ok(department)
    }

    /// Children, teams, and users keep the dangling id.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` or `NotFound`.
    pub async fn delete_department(&self, actor: &User, id: &str) -> Result<(), DatabaseError> {
        require_admin(actor, "deleting a department")?;
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM departments WHERE id = ?1", [id])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found(EntityType::Department, id));
        }
        self.audit(Some(actor), EntityType::Department, id, AuditAction::Deleted, None)
            .await?;
        Ok(())
    }
}
