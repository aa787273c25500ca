//! The OAuth callback sequence.
//!
//! ```text
//! take stored state ─► provider error? ─► code present? ─► state matches?
//!     ─► exchange code ─► fetch profile ─► store tokens ─► Success
//! ```
//!
//! Every failure short-circuits to `Denied` or `Failed`. Cancelling the token
//! between steps abandons the sequence without an outcome.

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::error::AuthError;
use crate::provider::{IdentityProvider, LoginSession};
use crate::state::SessionStore;

/// Query parameters the provider appends to the redirect URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Parse a raw query string (without the leading `?`).
    ///
    /// Empty values count as absent. Undecodable values are dropped.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let Ok(decoded) = urlencoding::decode(value) else {
                continue;
            };
            if decoded.is_empty() {
                continue;
            }
            let decoded = Some(decoded.into_owned());
            match key {
                "code" => params.code = decoded,
                "state" => params.state = decoded,
                "error" => params.error = decoded,
                _ => {}
            }
        }
        params
    }
}

/// Terminal result of a callback.
#[derive(Debug)]
pub enum CallbackOutcome {
    Success(LoginSession),
    /// The user declined consent on the provider page.
    Denied(AuthError),
    Failed(AuthError),
}

impl CallbackOutcome {
    fn from_error(error: AuthError) -> Self {
        match error {
            AuthError::UserDenied => Self::Denied(error),
            other => Self::Failed(other),
        }
    }

    /// Line shown to the user on the callback page and in the terminal.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Success(session) => format!("Signed in as {}.", session.identity.name),
            Self::Denied(error) | Self::Failed(error) => error.to_string(),
        }
    }

    /// # Errors
    ///
    /// Returns the denial or failure reason.
    pub fn into_result(self) -> Result<LoginSession, AuthError> {
        match self {
            Self::Success(session) => Ok(session),
            Self::Denied(error) | Self::Failed(error) => Err(error),
        }
    }
}

/// Run the callback sequence for `params`.
///
/// The stored state is consumed before anything else is checked, so it is
/// cleared exactly once no matter how the attempt ends. Returns `None` when
/// `cancel` fires before an outcome is reached; nothing is stored then.
pub async fn complete_login<P: IdentityProvider>(
    params: &CallbackParams,
    sessions: &SessionStore,
    provider: &P,
    cancel: &CancellationToken,
) -> Option<CallbackOutcome> {
    let expected_state = sessions.take_state();

    let code = match validate(params, expected_state.as_deref()) {
        Ok(code) => code,
        Err(error) => {
            tracing::warn!(code = error.code(), "oauth callback rejected");
            return Some(CallbackOutcome::from_error(error));
        }
    };

    if cancel.is_cancelled() {
        return None;
    }

    tracing::info!("getting access token");
    let grant = tokio::select! {
        biased;
        () = cancel.cancelled() => return None,
        result = provider.exchange_code(code) => match result {
            Ok(grant) => grant,
            Err(error) => return Some(CallbackOutcome::from_error(error)),
        },
    };

    tracing::info!("fetching user information");
    let identity = tokio::select! {
        biased;
        () = cancel.cancelled() => return None,
        result = provider.fetch_profile(&grant.access_token) => match result {
            Ok(identity) => identity,
            Err(error) => return Some(CallbackOutcome::from_error(error)),
        },
    };

    if cancel.is_cancelled() {
        return None;
    }

    sessions.store_tokens(grant.access_token.clone(), grant.refresh_token.clone());
    tracing::info!(email = %identity.email, "login successful");
    Some(CallbackOutcome::Success(LoginSession {
        expires_at: grant.expires_at(Utc::now()),
        identity,
        access_token: grant.access_token,
        refresh_token: grant.refresh_token,
    }))
}

fn validate<'a>(
    params: &'a CallbackParams,
    expected_state: Option<&str>,
) -> Result<&'a str, AuthError> {
    if let Some(error) = params.error.as_deref() {
        return Err(if error == "access_denied" {
            AuthError::UserDenied
        } else {
            AuthError::AuthorizationFailed(error.to_string())
        });
    }
    let code = params.code.as_deref().ok_or(AuthError::MissingCode)?;
    match (expected_state, params.state.as_deref()) {
        (Some(expected), Some(received)) if expected == received => Ok(code),
        _ => Err(AuthError::InvalidState),
    }
}
