use hub_auth::LarkProvider;
use hub_core::entities::User;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    logged_in: bool,
    user: User,
    expires_at: Option<String>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let provider = LarkProvider::new(ctx.config.lark.clone())?;

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let outcome = hub_auth::browser_flow::login(&ctx.config.lark, &provider, &cancel).await;
    watcher.abort();

    let Some(outcome) = outcome? else {
        anyhow::bail!("auth login: cancelled");
    };
    if !flags.quiet {
        eprintln!("{}", outcome.message());
    }
    let session = outcome.into_result()?;
    let user = ctx.service.record_login(&session.identity, "lark").await?;

    output(
        &AuthLoginResponse {
            logged_in: true,
            user,
            expires_at: session.expires_at.map(|at| at.to_rfc3339()),
        },
        flags.format,
    )
}
