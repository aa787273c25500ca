//! General application configuration.

use serde::{Deserialize, Serialize};

/// Dashboard page size.
const fn default_page_size() -> u32 {
    12
}

/// Page size of the "my links" view.
const fn default_my_links_page_size() -> u32 {
    10
}

/// Default result limit for list commands.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Viewer id used when neither `--as` nor a stored login is available.
    #[serde(default)]
    pub default_user: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_my_links_page_size")]
    pub my_links_page_size: u32,

    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_user: String::new(),
            page_size: default_page_size(),
            my_links_page_size: default_my_links_page_size(),
            default_limit: default_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert!(config.default_user.is_empty());
        assert_eq!(config.page_size, 12);
        assert_eq!(config.my_links_page_size, 10);
        assert_eq!(config.default_limit, 20);
    }
}
