//! Category repository.

use hub_core::audit_detail::UpdatedDetail;
use hub_core::entities::{Category, User};
use hub_core::enums::{AuditAction, EntityType};
use hub_core::ids::PREFIX_CATEGORY;
use hub_core::validation;

use crate::error::DatabaseError;
use crate::service::{HubService, require_admin};
use crate::updates::category::CategoryUpdate;
use crate::updates::field_names;

const SELECT_COLS: &str = "id, name, icon";

/// Icon used when a category is created without one.
pub const DEFAULT_CATEGORY_ICON: &str = "🔗";

fn row_to_category(row: &libsql::Row) -> Result<Category, DatabaseError> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
    })
}

impl HubService {
    pub(crate) async fn insert_category(&self, category: &Category) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO categories ({SELECT_COLS}) VALUES (?1, ?2, ?3)"),
                libsql::params![
                    category.id.as_str(),
                    category.name.as_str(),
                    category.icon.as_str()
                ],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins and `Validation` for a blank name.
    pub async fn create_category(
        &self,
        actor: &User,
        name: &str,
        icon: Option<&str>,
    ) -> Result<Category, DatabaseError> {
        require_admin(actor, "creating a category")?;
        let category = Category {
            id: self.db().generate_id(PREFIX_CATEGORY).await?,
            name: validation::require("name", name)?,
            icon: icon
                .map(str::trim)
                .filter(|i| !i.is_empty())
                .unwrap_or(DEFAULT_CATEGORY_ICON)
                .to_string(),
        };
        self.insert_category(&category).await?;
        self.audit(
            Some(actor),
            EntityType::Category,
            &category.id,
            AuditAction::Created,
            None,
        )
        .await?;
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no category has this id.
    pub async fn get_category(&self, id: &str) -> Result<Category, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM categories WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Category, id))?;
        row_to_category(&row)
    }

    /// In insertion order, so the first category is the form default.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM categories ORDER BY rowid"), ())
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row_to_category(&row)?);
        }
        Ok(categories)
    }

    /// # Errors
    ///
    /// Returns `Forbidden`, `NotFound`, or `Validation`.
    pub async fn update_category(
        &self,
        actor: &User,
        id: &str,
        update: CategoryUpdate,
    ) -> Result<Category, DatabaseError> {
        require_admin(actor, "updating a category")?;
        let mut category = self.get_category(id).await?;
        if let Some(name) = update.name.as_deref() {
            category.name = validation::require("name", name)?;
        }
        if let Some(icon) = update.icon.as_deref() {
            category.icon = validation::require("icon", icon)?;
        }
        let fields = field_names(&update);
        if fields.is_empty() {
            return Ok(category);
        }

        self.db()
            .conn()
            .execute(
                "UPDATE categories SET name = ?1, icon = ?2 WHERE id = ?3",
                libsql::params![category.name.as_str(), category.icon.as_str(), id],
            )
            .await?;
        self.audit(
            Some(actor),
            EntityType::Category,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&UpdatedDetail { fields })?),
        )
        .await?;
        Ok(category)
    }

    /// Links filed under the category keep the dangling id.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` or `NotFound`.
    pub async fn delete_category(&self, actor: &User, id: &str) -> Result<(), DatabaseError> {
        require_admin(actor, "deleting a category")?;
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM categories WHERE id = ?1", [id])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found(EntityType::Category, id));
        }
        self.audit(Some(actor), EntityType::Category, id, AuditAction::Deleted, None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{admin, chen, seeded_service, test_service};
    use crate::updates::category::CategoryUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn seeded_categories_keep_fixture_order() {
        let svc = seeded_service().await;
        let names: Vec<_> = svc
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Engineering", "Marketing", "HR", "Design"]);
    }

    #[tokio::test]
    async fn blank_icon_falls_back_to_default() {
        let svc = test_service().await;
        let category = svc.create_category(&admin(), "Legal", Some(" ")).await.unwrap();
        assert_eq!(category.icon, DEFAULT_CATEGORY_ICON);
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let svc = seeded_service().await;
        let updated = svc
            .update_category(&admin(), "cat-3", CategoryUpdateBuilder::new().icon("🧑‍🤝‍🧑").build())
            .await
            .unwrap();
        assert_eq!(updated.name, "HR");
        assert_eq!(updated.icon, "🧑‍🤝‍🧑");
        assert_eq!(svc.get_category("cat-3").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn members_cannot_delete() {
        let svc = seeded_service().await;
        assert!(svc.delete_category(&chen(), "cat-1").await.unwrap_err().is_forbidden());
        assert!(svc.get_category("cat-1").await.is_ok());
    }
}
