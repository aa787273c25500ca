use hub_core::enums::LinkStatus;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::{effective_limit, truncate};
use crate::context::AppContext;
use crate::output::output;

/// Admin moderation queue, oldest submission first.
pub async fn pending(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let viewer = ctx.viewer(flags).await?;
    let mut links = ctx.service.pending_links(&viewer).await?;
    links.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
    output(&truncate(links, limit), flags.format)
}

/// Approve, reject, archive, or resubmit a link.
pub async fn transition(
    id: &str,
    next: LinkStatus,
    reason: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let viewer = ctx.viewer(flags).await?;
    let response = ctx
        .service
        .update_link_status(&viewer, id, next, reason)
        .await?;
    output(&response, flags.format)
}
