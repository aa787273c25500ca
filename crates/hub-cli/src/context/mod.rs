mod app_context;

pub use app_context::AppContext;

use hub_config::HubConfig;

/// Log configuration gaps that only matter for some commands.
pub fn warn_unconfigured(config: &HubConfig) {
    if !config.lark.is_configured() {
        tracing::debug!("lark client id/secret not set; `auth login` is unavailable");
    }
    if config.database.is_in_memory() && !config.database.seed_fixtures {
        tracing::warn!("in-memory store without fixtures: the directory starts empty");
    }
}
