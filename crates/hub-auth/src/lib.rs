//! # hub-auth
//!
//! Lark OAuth login for the LinkHub CLI.
//!
//! Provides the authorization URL and single-use CSRF state, the
//! cancellable callback sequence (code exchange, then profile fetch), a
//! local `tiny_http` callback listener opened via `open`, and session storage
//! in the OS keychain (`keyring`) with a file fallback.

pub mod authorize;
pub mod browser_flow;
pub mod callback;
pub mod error;
pub mod lark;
pub mod provider;
pub mod state;
pub mod token_store;

pub use callback::{CallbackOutcome, CallbackParams, complete_login};
pub use error::AuthError;
pub use lark::LarkProvider;
pub use provider::{IdentityProvider, LoginSession, TokenGrant};
pub use state::SessionStore;

/// The stored session, if one exists and has not expired.
#[must_use]
pub fn current_session() -> Option<LoginSession> {
    token_store::load().filter(|session| !session.is_expired(chrono::Utc::now()))
}

/// Clear the stored session.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the session file cannot be removed.
pub fn logout() -> Result<(), AuthError> {
    token_store::delete()
}
