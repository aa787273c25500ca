//! Directory store configuration.

use serde::{Deserialize, Serialize};

/// libSQL path for a store that lives only as long as the process.
pub const IN_MEMORY: &str = ":memory:";

fn default_path() -> String {
    IN_MEMORY.to_string()
}

const fn default_seed_fixtures() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// `:memory:` or a file path.
    #[serde(default = "default_path")]
    pub path: String,

    /// Load the bundled directory fixtures into an empty store on startup.
    #[serde(default = "default_seed_fixtures")]
    pub seed_fixtures: bool,
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            seed_fixtures: default_seed_fixtures(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_seeded_memory_store() {
        let config = DatabaseConfig::default();
        assert!(config.is_in_memory());
        assert!(config.seed_fixtures);
    }
}
