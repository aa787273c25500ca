use chrono::Utc;
use hub_auth::token_store;
use hub_core::responses::AuthStatusResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let stored = token_store::load_with_source()
        .filter(|(session, _)| !session.is_expired(Utc::now()));

    let status = match stored {
        Some((session, source)) => {
            let (user, _) = ctx.service.resolve_identity(&session.identity).await?;
            AuthStatusResponse {
                logged_in: true,
                source: Some(source.to_string()),
                identity: Some(session.identity),
                user: Some(user),
            }
        }
        None => AuthStatusResponse {
            logged_in: false,
            source: None,
            identity: None,
            user: None,
        },
    };

    output(&status, flags.format)
}
