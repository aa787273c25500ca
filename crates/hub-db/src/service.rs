//! Service layer carrying every repository operation.
//!
//! `HubService` wraps `HubDb`. All repo methods are implemented as
//! `impl HubService` blocks under `repos/`. Every mutation follows the same
//! protocol:
//! 1. Check the actor's role or ownership
//! 2. Validate input
//! 3. Execute SQL
//! 4. Append an audit entry

use hub_config::DatabaseConfig;
use hub_core::entities::User;

use crate::HubDb;
use crate::error::DatabaseError;

pub struct HubService {
    db: HubDb,
}

impl HubService {
    /// Open a store at `db_path` without seeding it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        Ok(Self {
            db: HubDb::open_local(db_path).await?,
        })
    }

    /// Open the configured store, seeding the fixture directory when it is
    /// enabled and the store is empty.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or seeded.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let service = Self::new_local(&config.path).await?;
        if config.seed_fixtures {
            service.seed_if_empty().await?;
        }
        Ok(service)
    }

    #[must_use]
    pub const fn from_db(db: HubDb) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn db(&self) -> &HubDb {
        &self.db
    }
}

/// Taxonomy and moderation writes are admin-only.
pub(crate) fn require_admin(actor: &User, action: &str) -> Result<(), DatabaseError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(DatabaseError::forbidden(format!(
            "{action} requires an admin (acting as {})",
            actor.id
        )))
    }
}
