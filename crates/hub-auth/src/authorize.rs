//! Authorization URL construction.

use hub_config::LarkConfig;

/// Build the provider's consent-page URL for `state`.
#[must_use]
pub fn authorization_url(config: &LarkConfig, state: &str) -> String {
    format!(
        "{base}?client_id={client_id}&redirect_uri={redirect}&scope={scope}&state={state}",
        base = config.auth_url,
        client_id = urlencoding::encode(&config.client_id),
        redirect = urlencoding::encode(&config.redirect_uri),
        scope = urlencoding::encode(&config.scope),
        state = urlencoding::encode(state),
    )
}
