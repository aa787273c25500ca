use hub_core::enums::EntityType;

use crate::cli::GlobalFlags;
use crate::commands::shared::deleted;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let viewer = ctx.viewer(flags).await?;
    ctx.service.delete_link(&viewer, id).await?;
    output(&deleted(EntityType::Link, id), flags.format)
}
