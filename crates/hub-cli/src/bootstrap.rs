use hub_config::HubConfig;

/// Load `.env`, then the layered config.
pub fn load_config() -> anyhow::Result<HubConfig> {
    HubConfig::load_with_dotenv().map_err(anyhow::Error::from)
}
