use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User denied authorization")]
    UserDenied,

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("No authorization code received")]
    MissingCode,

    #[error("Invalid or missing state parameter")]
    InvalidState,

    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("failed to get user info: {0}")]
    ProfileFetchFailed(String),

    #[error("not logged in, run `linkhub auth login`")]
    NotAuthenticated,

    #[error("lark app is not configured: {0}")]
    NotConfigured(String),

    #[error("browser login failed: {0}")]
    BrowserFlowFailed(String),

    #[error("token store error: {0}")]
    TokenStoreError(String),
}

impl AuthError {
    /// Stable identifier for scripts and the callback page.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UserDenied => "user_denied",
            Self::AuthorizationFailed(_) => "authorization_failed",
            Self::MissingCode => "missing_code",
            Self::InvalidState => "invalid_state",
            Self::TokenExchangeFailed(_) => "token_exchange_failed",
            Self::ProfileFetchFailed(_) => "profile_fetch_failed",
            Self::NotAuthenticated => "not_authenticated",
            Self::NotConfigured(_) => "not_configured",
            Self::BrowserFlowFailed(_) => "browser_flow_failed",
            Self::TokenStoreError(_) => "token_store_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_callback_copy() {
        assert_eq!(AuthError::UserDenied.to_string(), "User denied authorization");
        assert_eq!(
            AuthError::MissingCode.to_string(),
            "No authorization code received"
        );
        assert_eq!(AuthError::InvalidState.code(), "invalid_state");
    }
}
