use hub_core::entities::AuditEntry;
use hub_core::enums::{AuditAction, EntityType};
use hub_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `linkhub audit` (admin only). Newest entries first.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let viewer = ctx.viewer(flags).await?;
    if !viewer.is_admin() {
        anyhow::bail!("audit: {} is not an admin", viewer.id);
    }
    let entries = fetch(args, ctx, flags).await?;
    output(&entries, flags.format)
}

async fn fetch(
    args: &AuditArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Vec<AuditEntry>> {
    let filter = AuditFilter {
        entity_type: args
            .entity_type
            .as_deref()
            .map(|value| parse_enum::<EntityType>(value, "entity-type"))
            .transpose()?,
        entity_id: args.entity_id.clone(),
        action: args
            .action
            .as_deref()
            .map(|value| parse_enum::<AuditAction>(value, "action"))
            .transpose()?,
        actor_id: args.actor.clone(),
        limit: Some(flags.limit.unwrap_or(ctx.config.general.default_limit)),
    };

    ctx.service.query_audit(&filter).await.map_err(Into::into)
}
