//! The callback sequence against an in-process provider.

use std::sync::atomic::{AtomicUsize, Ordering};

use hub_auth::{
    AuthError, CallbackOutcome, CallbackParams, IdentityProvider, SessionStore, TokenGrant,
    complete_login,
};
use hub_core::identity::AuthIdentity;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct FakeProvider {
    exchanges: AtomicUsize,
    profiles: AtomicUsize,
    reject_code: bool,
    /// Fired from inside the exchange, as if the user closed the login.
    cancel_during_exchange: Option<CancellationToken>,
}

impl IdentityProvider for FakeProvider {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, AuthError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = &self.cancel_during_exchange {
            token.cancel();
            std::future::pending::<()>().await;
        }
        if self.reject_code {
            return Err(AuthError::TokenExchangeFailed("code expired".into()));
        }
        Ok(TokenGrant {
            access_token: format!("at-{code}"),
            expires_in: Some(7200),
            refresh_token: Some("rt".into()),
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<AuthIdentity, AuthError> {
        self.profiles.fetch_add(1, Ordering::SeqCst);
        Ok(AuthIdentity {
            open_id: "ou_42".into(),
            name: "Maria Garcia".into(),
            email: "maria.g@company.com".into(),
            avatar_url: None,
            user_id: Some(access_token.into()),
        })
    }
}

fn params(code: Option<&str>, state: Option<&str>, error: Option<&str>) -> CallbackParams {
    CallbackParams {
        code: code.map(String::from),
        state: state.map(String::from),
        error: error.map(String::from),
    }
}

#[tokio::test]
async fn matching_state_completes_login() {
    let sessions = SessionStore::new();
    let state = sessions.begin_authorization().unwrap();
    let provider = FakeProvider::default();

    let outcome = complete_login(
        &params(Some("c1"), Some(&state), None),
        &sessions,
        &provider,
        &CancellationToken::new(),
    )
    .await
    .expect("an outcome");

    let session = outcome.into_result().expect("success");
    assert_eq!(session.identity.email, "maria.g@company.com");
    assert_eq!(session.access_token, "at-c1");
    assert!(session.expires_at.is_some());
    assert_eq!(sessions.access_token().as_deref(), Some("at-c1"));
    assert_eq!(sessions.refresh_token().as_deref(), Some("rt"));
    assert!(!sessions.has_pending_state());
}

#[tokio::test]
async fn mismatched_state_is_rejected_and_state_is_spent() {
    let sessions = SessionStore::new();
    let state = sessions.begin_authorization().unwrap();
    let provider = FakeProvider::default();
    let cancel = CancellationToken::new();

    let first = complete_login(
        &params(Some("c1"), Some("forged"), None),
        &sessions,
        &provider,
        &cancel,
    )
    .await
    .expect("an outcome");
    assert!(matches!(first, CallbackOutcome::Failed(AuthError::InvalidState)));
    assert!(!sessions.has_pending_state());

    let replay = complete_login(
        &params(Some("c1"), Some(&state), None),
        &sessions,
        &provider,
        &cancel,
    )
    .await
    .expect("an outcome");
    assert!(matches!(replay, CallbackOutcome::Failed(AuthError::InvalidState)));
    assert_eq!(provider.exchanges.load(Ordering::SeqCst), 0);
    assert!(sessions.access_token().is_none());
}

#[tokio::test]
async fn access_denied_is_a_denial() {
    let sessions = SessionStore::new();
    let state = sessions.begin_authorization().unwrap();
    let provider = FakeProvider::default();

    let outcome = complete_login(
        &params(None, Some(&state), Some("access_denied")),
        &sessions,
        &provider,
        &CancellationToken::new(),
    )
    .await
    .expect("an outcome");

    assert!(matches!(outcome, CallbackOutcome::Denied(AuthError::UserDenied)));
    assert_eq!(outcome.message(), "User denied authorization");
    assert!(!sessions.has_pending_state());
}

#[tokio::test]
async fn missing_code_fails_without_calling_provider() {
    let sessions = SessionStore::new();
    let state = sessions.begin_authorization().unwrap();
    let provider = FakeProvider::default();

    let outcome = complete_login(
        &params(None, Some(&state), None),
        &sessions,
        &provider,
        &CancellationToken::new(),
    )
    .await
    .expect("an outcome");

    assert!(matches!(outcome, CallbackOutcome::Failed(AuthError::MissingCode)));
    assert_eq!(provider.exchanges.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn exchange_failure_skips_profile_fetch() {
    let sessions = SessionStore::new();
    let state = sessions.begin_authorization().unwrap();
    let provider = FakeProvider {
        reject_code: true,
        ..FakeProvider::default()
    };

    let outcome = complete_login(
        &params(Some("old"), Some(&state), None),
        &sessions,
        &provider,
        &CancellationToken::new(),
    )
    .await
    .expect("an outcome");

    let error = outcome.into_result().unwrap_err();
    assert_eq!(error.code(), "token_exchange_failed");
    assert_eq!(provider.profiles.load(Ordering::SeqCst), 0);
    assert!(sessions.access_token().is_none());
}

#[tokio::test]
async fn cancellation_mid_flight_yields_no_outcome() {
    let sessions = SessionStore::new();
    let state = sessions.begin_authorization().unwrap();
    let cancel = CancellationToken::new();
    let provider = FakeProvider {
        cancel_during_exchange: Some(cancel.clone()),
        ..FakeProvider::default()
    };

    let outcome = complete_login(
        &params(Some("c1"), Some(&state), None),
        &sessions,
        &provider,
        &cancel,
    )
    .await;

    assert!(outcome.is_none());
    assert_eq!(provider.profiles.load(Ordering::SeqCst), 0);
    assert!(sessions.access_token().is_none());
}

#[tokio::test]
async fn already_cancelled_still_spends_state() {
    let sessions = SessionStore::new();
    let state = sessions.begin_authorization().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = complete_login(
        &params(Some("c1"), Some(&state), None),
        &sessions,
        &FakeProvider::default(),
        &cancel,
    )
    .await;

    assert!(outcome.is_none());
    assert!(!sessions.has_pending_state());
}
