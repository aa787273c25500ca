//! Lark (Larksuite) implementation of [`IdentityProvider`].

use hub_config::LarkConfig;
use hub_core::identity::AuthIdentity;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AuthError;
use crate::provider::{IdentityProvider, TokenGrant};

/// HTTP client for the Lark token and user-info endpoints.
#[derive(Debug, Clone)]
pub struct LarkProvider {
    http: reqwest::Client,
    config: LarkConfig,
}

impl LarkProvider {
    /// # Errors
    ///
    /// Returns `AuthError::NotConfigured` when the app id or secret is missing.
    pub fn new(config: LarkConfig) -> Result<Self, AuthError> {
        if !config.is_configured() {
            return Err(AuthError::NotConfigured(
                "set lark.client_id and lark.client_secret (LINKHUB_LARK__CLIENT_ID, LINKHUB_LARK__CLIENT_SECRET)"
                    .into(),
            ));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &LarkConfig {
        &self.config
    }
}

impl IdentityProvider for LarkProvider {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, AuthError> {
        let body = json!({
            "grant_type": "authorization_code",
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "code": code,
            "redirect_uri": self.config.redirect_uri,
        });
        let response = self
            .http
            .post(&self.config.token_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(format!("request failed: {e}")))?;
        let status = response.status();
        let payload: Value = response.json().await.map_err(|e| {
            AuthError::TokenExchangeFailed(format!("unreadable response (HTTP {status}): {e}"))
        })?;
        parse_token_response(&payload)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<AuthIdentity, AuthError> {
        let response = self
            .http
            .get(&self.config.user_info_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::ProfileFetchFailed(format!("request failed: {e}")))?;
        let status = response.status();
        let payload: Value = response.json().await.map_err(|e| {
            AuthError::ProfileFetchFailed(format!("unreadable response (HTTP {status}): {e}"))
        })?;
        parse_profile_response(&payload)
    }
}

/// Lark reports `code` as a number on some endpoints and a string on others.
fn is_success_code(payload: &Value) -> bool {
    match payload.get("code") {
        Some(Value::Number(n)) => n.as_i64() == Some(0),
        Some(Value::String(s)) => s == "0",
        _ => false,
    }
}

fn message_field<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
}

pub(crate) fn parse_token_response(payload: &Value) -> Result<TokenGrant, AuthError> {
    if !is_success_code(payload) {
        let message = message_field(payload, &["error_description", "msg", "error"])
            .unwrap_or("Failed to get access token");
        return Err(AuthError::TokenExchangeFailed(message.to_string()));
    }
    let access_token = payload
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AuthError::TokenExchangeFailed("response has no access_token".into()))?;
    Ok(TokenGrant {
        access_token: access_token.to_string(),
        expires_in: payload.get("expires_in").and_then(Value::as_i64),
        refresh_token: payload
            .get("refresh_token")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from),
    })
}

#[derive(Debug, Deserialize)]
struct LarkUserInfo {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    avatar_url: Option<String>,
    open_id: String,
    user_id: Option<String>,
}

pub(crate) fn parse_profile_response(payload: &Value) -> Result<AuthIdentity, AuthError> {
    if !is_success_code(payload) {
        let message =
            message_field(payload, &["msg", "message"]).unwrap_or("Failed to get user info");
        return Err(AuthError::ProfileFetchFailed(message.to_string()));
    }
    let data = payload
        .get("data")
        .cloned()
        .ok_or_else(|| AuthError::ProfileFetchFailed("response has no data".into()))?;
    let info: LarkUserInfo = serde_json::from_value(data)
        .map_err(|e| AuthError::ProfileFetchFailed(format!("malformed profile: {e}")))?;
    Ok(AuthIdentity {
        open_id: info.open_id,
        name: info.name,
        email: info.email,
        avatar_url: info.avatar_url,
        user_id: info.user_id,
    })
}
