//! Lark OAuth configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_redirect_uri() -> String {
    "http://localhost:3000/auth/callback".to_string()
}

fn default_auth_url() -> String {
    "https://accounts.larksuite.com/open-apis/authen/v1/authorize".to_string()
}

fn default_token_url() -> String {
    "https://open.larksuite.com/open-apis/authen/v2/oauth/token".to_string()
}

fn default_user_info_url() -> String {
    "https://open.larksuite.com/open-apis/authen/v1/user_info".to_string()
}

fn default_scope() -> String {
    "contact:user.base:readonly contact:user.email:readonly".to_string()
}

/// Seconds the local callback listener waits for the browser redirect.
const fn default_callback_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LarkConfig {
    /// App id issued by the Lark developer console.
    #[serde(default)]
    pub client_id: String,

    /// App secret issued by the Lark developer console.
    #[serde(default)]
    pub client_secret: String,

    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_user_info_url")]
    pub user_info_url: String,

    /// Space-separated OAuth scopes.
    #[serde(default = "default_scope")]
    pub scope: String,

    #[serde(default = "default_callback_timeout_secs")]
    pub callback_timeout_secs: u64,
}

impl LarkConfig {
    /// Check if the app credentials are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Fail with `NotConfigured` unless the credentials are present.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        if self.is_configured() {
            Ok(self)
        } else {
            Err(ConfigError::NotConfigured {
                section: "lark".into(),
            })
        }
    }
}

impl Default for LarkConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            user_info_url: default_user_info_url(),
            scope: default_scope(),
            callback_timeout_secs: default_callback_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = LarkConfig::default();
        assert!(!config.is_configured());
        assert!(matches!(
            config.require(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }

    #[test]
    fn configured_when_credentials_set() {
        let config = LarkConfig {
            client_id: "cli_a1b2".into(),
            client_secret: "secret".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert!(config.require().is_ok());
    }

    #[test]
    fn not_configured_when_missing_secret() {
        let config = LarkConfig {
            client_id: "cli_a1b2".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn defaults_point_at_larksuite() {
        let config = LarkConfig::default();
        assert_eq!(config.redirect_uri, "http://localhost:3000/auth/callback");
        assert!(config.token_url.ends_with("/authen/v2/oauth/token"));
        assert_eq!(config.callback_timeout_secs, 120);
    }
}
