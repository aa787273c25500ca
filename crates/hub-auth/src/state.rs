//! CSRF state generation and the per-login session store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::AuthError;

/// Random 16-byte CSRF token, hex-encoded.
///
/// # Errors
///
/// Returns `AuthError::BrowserFlowFailed` if the OS random source fails.
pub fn generate_state() -> Result<String, AuthError> {
    let mut bytes = [0u8; 16];
    getrandom::fill(&mut bytes)
        .map_err(|e| AuthError::BrowserFlowFailed(format!("failed to generate CSRF state: {e}")))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

#[derive(Debug, Default)]
struct SessionData {
    oauth_state: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Session-scoped values of one login attempt.
///
/// The CSRF state is single-use: [`SessionStore::take_state`] hands it out
/// once and leaves nothing behind.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<SessionData>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generate and remember a fresh state, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Propagates [`generate_state`] failures.
    pub fn begin_authorization(&self) -> Result<String, AuthError> {
        let state = generate_state()?;
        self.lock().oauth_state = Some(state.clone());
        Ok(state)
    }

    /// Remove and return the stored state.
    pub fn take_state(&self) -> Option<String> {
        self.lock().oauth_state.take()
    }

    #[must_use]
    pub fn has_pending_state(&self) -> bool {
        self.lock().oauth_state.is_some()
    }

    pub fn store_tokens(&self, access_token: String, refresh_token: Option<String>) {
        let mut data = self.lock();
        data.access_token = Some(access_token);
        data.refresh_token = refresh_token;
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    /// Forget tokens and any pending state.
    pub fn clear(&self) {
        *self.lock() = SessionData::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_is_32_hex_chars_and_unique() {
        let a = generate_state().unwrap();
        let b = generate_state().unwrap();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn state_is_single_use() {
        let store = SessionStore::new();
        let state = store.begin_authorization().unwrap();
        assert!(store.has_pending_state());
        assert_eq!(store.take_state(), Some(state));
        assert_eq!(store.take_state(), None);
    }

    #[test]
    fn clear_drops_tokens() {
        let store = SessionStore::new();
        store.store_tokens("at".into(), Some("rt".into()));
        assert_eq!(store.refresh_token().as_deref(), Some("rt"));
        store.clear();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }
}
