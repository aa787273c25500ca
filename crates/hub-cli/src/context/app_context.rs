use anyhow::Context;
use hub_config::HubConfig;
use hub_core::entities::User;
use hub_core::identity::AuthIdentity;
use hub_db::service::HubService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: HubService,
    pub config: HubConfig,
}

impl AppContext {
    /// Open (and on first use, seed) the directory store.
    pub async fn init(config: HubConfig) -> anyhow::Result<Self> {
        let service = HubService::open(&config.database)
            .await
            .with_context(|| format!("failed to open store at {}", config.database.path))?;
        Ok(Self { service, config })
    }

    /// The user commands act as.
    ///
    /// Precedence: `--as` flag, then the stored login session, then
    /// `general.default_user`.
    pub async fn viewer(&self, flags: &GlobalFlags) -> anyhow::Result<User> {
        let session = if flags.viewer.is_none() {
            hub_auth::current_session().map(|session| session.identity)
        } else {
            None
        };
        resolve_viewer(
            &self.service,
            flags.viewer.as_deref(),
            session.as_ref(),
            &self.config.general.default_user,
        )
        .await
    }
}

pub(crate) async fn resolve_viewer(
    service: &HubService,
    explicit: Option<&str>,
    session: Option<&AuthIdentity>,
    default_user: &str,
) -> anyhow::Result<User> {
    if let Some(id) = explicit {
        return service
            .get_user(id)
            .await
            .with_context(|| format!("--as {id}"));
    }
    if let Some(identity) = session {
        let (user, matched) = service.resolve_identity(identity).await?;
        tracing::debug!(user = %user.id, matched, "viewer from stored session");
        return Ok(user);
    }
    let fallback = default_user.trim();
    if !fallback.is_empty() {
        return service
            .get_user(fallback)
            .await
            .with_context(|| format!("general.default_user {fallback}"));
    }
    anyhow::bail!(
        "no viewer: pass --as <user-id>, run `linkhub auth login`, or set LINKHUB_GENERAL__DEFAULT_USER"
    )
}

#[cfg(test)]
mod tests {
    use hub_config::DatabaseConfig;
    use pretty_assertions::assert_eq;

    use super::*;

    async fn seeded() -> HubService {
        HubService::open(&DatabaseConfig::default()).await.unwrap()
    }

    fn identity(email: &str) -> AuthIdentity {
        AuthIdentity {
            open_id: "ou_123".into(),
            name: "Maria G".into(),
            email: email.into(),
            avatar_url: None,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn explicit_viewer_wins_over_session_and_default() {
        let svc = seeded().await;
        let session = identity("maria.g@company.com");
        let viewer = resolve_viewer(&svc, Some("user-3"), Some(&session), "user-1")
            .await
            .unwrap();
        assert_eq!(viewer.id, "user-3");
    }

    #[tokio::test]
    async fn session_matches_directory_by_email() {
        let svc = seeded().await;
        let session = identity("MARIA.G@company.com");
        let viewer = resolve_viewer(&svc, None, Some(&session), "user-1")
            .await
            .unwrap();
        assert_eq!(viewer.id, "user-2");
    }

    #[tokio::test]
    async fn unknown_session_is_a_plain_user() {
        let svc = seeded().await;
        let session = identity("visitor@elsewhere.com");
        let viewer = resolve_viewer(&svc, None, Some(&session), "")
            .await
            .unwrap();
        assert_eq!(viewer.id, "ou_123");
        assert!(!viewer.is_admin());
    }

    #[tokio::test]
    async fn default_user_is_the_last_resort() {
        let svc = seeded().await;
        let viewer = resolve_viewer(&svc, None, None, " user-1 ").await.unwrap();
        assert_eq!(viewer.id, "user-1");

        let err = resolve_viewer(&svc, None, None, "").await.unwrap_err();
        assert!(err.to_string().contains("--as"), "{err}");
    }

    #[tokio::test]
    async fn unknown_explicit_viewer_is_an_error() {
        let svc = seeded().await;
        let err = resolve_viewer(&svc, Some("user-404"), None, "")
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("user-404"), "{err:#}");
    }
}
