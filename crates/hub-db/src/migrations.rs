//! Embedded schema migrations, run on every open.

use crate::HubDb;
use crate::error::DatabaseError;

/// Initial schema: 10 tables and their indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl HubDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
