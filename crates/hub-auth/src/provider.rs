//! Identity provider seam between the callback sequence and HTTP.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use hub_core::identity::AuthIdentity;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Tokens returned by the code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    /// Lifetime in seconds, when the provider reports one.
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
}

impl TokenGrant {
    #[must_use]
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expires_in.map(|secs| now + Duration::seconds(secs))
    }
}

/// A completed login: who signed in and the tokens that prove it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginSession {
    pub identity: AuthIdentity,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl LoginSession {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// The two provider calls of the authorization-code flow.
pub trait IdentityProvider {
    /// Exchange an authorization code for tokens.
    fn exchange_code(&self, code: &str)
    -> impl Future<Output = Result<TokenGrant, AuthError>> + Send;

    /// Fetch the signed-in user's profile.
    fn fetch_profile(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<AuthIdentity, AuthError>> + Send;
}
