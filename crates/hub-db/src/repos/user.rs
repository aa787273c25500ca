//! User directory repository.

use hub_core::audit_detail::{LoggedInDetail, UpdatedDetail};
use hub_core::entities::User;
use hub_core::enums::{AuditAction, EntityType, UserRole};
use hub_core::identity::AuthIdentity;
use hub_core::ids::PREFIX_USER;
use hub_core::validation;

use crate::error::DatabaseError;
use crate::helpers::{org_id_or_unknown, parse_enum};
use crate::service::{HubService, require_admin};
use crate::updates::field_names;
use crate::updates::user::UserUpdate;

const SELECT_COLS: &str = "id, name, email, avatar, role, department_id, team_id";

/// Input for a new directory entry.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Generated from the name when absent.
    pub avatar: Option<String>,
    pub role: UserRole,
    pub department_id: Option<String>,
    pub team_id: Option<String>,
}

/// Seeded placeholder avatar, as the admin form assigns one.
#[must_use]
pub fn avatar_for(name: &str) -> String {
    format!(
        "https://picsum.photos/seed/{}/100/100",
        urlencoding::encode(name)
    )
}

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        avatar: row.get(3)?,
        role: parse_enum(&row.get::<String>(4)?)?,
        department_id: row.get(5)?,
        team_id: row.get(6)?,
    })
}

impl HubService {
    pub(crate) async fn insert_user(&self, user: &User) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO users ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
                libsql::params![
                    user.id.as_str(),
                    user.name.as_str(),
                    user.email.as_str(),
                    user.avatar.as_str(),
                    user.role.as_str(),
                    user.department_id.as_str(),
                    user.team_id.as_str()
                ],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins and `Validation` for a blank name
    /// or malformed email.
    pub async fn create_user(&self, actor: &User, new: NewUser) -> Result<User, DatabaseError> {
        require_admin(actor, "creating a user")?;
        let name = validation::require("name", &new.name)?;
        let email = validation::email(&new.email)?;
        let avatar = new
            .avatar
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| avatar_for(&name));
        let user = User {
            id: self.db().generate_id(PREFIX_USER).await?,
            name,
            email,
            avatar,
            role: new.role,
            department_id: org_id_or_unknown(new.department_id.as_deref()),
            team_id: org_id_or_unknown(new.team_id.as_deref()),
        };
        self.insert_user(&user).await?;
        self.audit(Some(actor), EntityType::User, &user.id, AuditAction::Created, None)
            .await?;
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no user has this id.
    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::User, id))?;
        row_to_user(&row)
    }

    /// Case-insensitive email lookup.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM users WHERE lower(email) = lower(?1) ORDER BY rowid LIMIT 1"
                ),
                [email.trim()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// The directory user matching the identity's email, or a transient
    /// `user` with unknown department and team. Returns whether it matched.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the lookup fails.
    pub async fn resolve_identity(
        &self,
        identity: &AuthIdentity,
    ) -> Result<(User, bool), DatabaseError> {
        if !identity.email.trim().is_empty()
            && let Some(known) = self.find_user_by_email(&identity.email).await?
        {
            return Ok((known, true));
        }
        Ok((identity.resolve(&[]), false))
    }

    /// Resolve a fresh login and record it in the audit trail.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the lookup or the audit append fails.
    pub async fn record_login(
        &self,
        identity: &AuthIdentity,
        provider: &str,
    ) -> Result<User, DatabaseError> {
        let (user, matched_directory) = self.resolve_identity(identity).await?;
        let detail = LoggedInDetail {
            provider: provider.to_string(),
            email: identity.email.clone(),
            matched_directory,
        };
        self.audit(
            Some(&user),
            EntityType::User,
            &user.id,
            AuditAction::LoggedIn,
            Some(serde_json::to_value(&detail)?),
        )
        .await?;
        tracing::info!(user = %user.id, matched_directory, "login recorded");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users ORDER BY rowid"), ())
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    /// # Errors
    ///
    /// Returns `Forbidden`, `NotFound`, or `Validation`.
    pub async fn update_user(
        &self,
        actor: &User,
        id: &str,
        update: UserUpdate,
    ) -> Result<User, DatabaseError> {
        require_admin(actor, "updating a user")?;
        let mut user = self.get_user(id).await?;
        if let Some(name) = update.name.as_deref() {
            user.name = validation::require("name", name)?;
        }
        if let Some(email) = update.email.as_deref() {
            user.email = validation::email(email)?;
        }
        if let Some(avatar) = update.avatar.as_deref() {
            user.avatar = avatar.trim().to_string();
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(department_id) = update.department_id.as_deref() {
            user.department_id = org_id_or_unknown(Some(department_id));
        }
        if let Some(team_id) = update.team_id.as_deref() {
            user.team_id = org_id_or_unknown(Some(team_id));
        }

        let fields = field_names(&update);
        if fields.is_empty() {
            return Ok(user);
        }
        self.db()
            .conn()
            .execute(
                "UPDATE users SET name = ?1, email = ?2, avatar = ?3, role = ?4,
                 department_id = ?5, team_id = ?6 WHERE id = ?7",
                libsql::params![
                    user.name.as_str(),
                    user.email.as_str(),
                    user.avatar.as_str(),
                    user.role.as_str(),
                    user.department_id.as_str(),
                    user.team_id.as_str(),
                    id
                ],
            )
            .await?;
        self.audit(
            Some(actor),
            EntityType::User,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&UpdatedDetail { fields })?),
        )
        .await?;
        Ok(user)
    }

    /// Links created by the user stay in place.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `NotFound`, or `Validation` when an admin tries
    /// to delete their own entry.
    pub async fn delete_user(&self, actor: &User, id: &str) -> Result<(), DatabaseError> {
        require_admin(actor, "deleting a user")?;
        if actor.id == id {
            return Err(DatabaseError::validation("an admin cannot delete their own user"));
        }
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", [id])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found(EntityType::User, id));
        }
        self.audit(Some(actor), EntityType::User, id, AuditAction::Deleted, None)
            .await?;
        Ok(())
    }
}
