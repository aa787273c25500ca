//! # hub-config
//!
//! Layered configuration loading for LinkHub using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LINKHUB_*` prefix, `__` as separator)
//! 2. Project-level `.linkhub/config.toml`
//! 3. User-level `~/.config/linkhub/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `LINKHUB_LARK__CLIENT_ID` -> `lark.client_id`,
//! `LINKHUB_DATABASE__PATH` -> `database.path`, etc.
//!
//! ```no_run
//! use hub_config::HubConfig;
//!
//! let config = HubConfig::load_with_dotenv().expect("config");
//! if config.lark.is_configured() {
//!     println!("redirect: {}", config.lark.redirect_uri);
//! }
//! ```

mod database;
mod error;
mod general;
mod lark;

pub use database::{DatabaseConfig, IN_MEMORY};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use lark::LarkConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "LINKHUB_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HubConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub lark: LarkConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl HubConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the workspace root, then [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".linkhub/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that would make list commands or the login flow misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.page_size == 0 {
            return Err(invalid("general.page_size", "must be at least 1"));
        }
        if self.general.my_links_page_size == 0 {
            return Err(invalid("general.my_links_page_size", "must be at least 1"));
        }
        if !self.lark.redirect_uri.starts_with("http://") {
            return Err(invalid(
                "lark.redirect_uri",
                "must be an http:// loopback address",
            ));
        }
        if self.database.path.trim().is_empty() {
            return Err(invalid("database.path", "must not be empty"));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("linkhub").join("config.toml"))
    }

    /// Walk up from `CARGO_MANIFEST_DIR` looking for `.env`, falling back to
    /// the current directory. Silently does nothing if none is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }
        let _ = dotenvy::dotenv();
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = HubConfig::default();
        assert!(!config.lark.is_configured());
        assert!(config.database.is_in_memory());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = HubConfig::default();
        config.general.page_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("general.page_size"));
    }

    #[test]
    fn https_redirect_is_rejected() {
        let mut config = HubConfig::default();
        config.lark.redirect_uri = "https://hub.example.com/auth/callback".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
