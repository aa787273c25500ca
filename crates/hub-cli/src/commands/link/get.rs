use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let viewer = ctx.viewer(flags).await?;
    let link = ctx.service.view_link(&viewer, id).await?;
    output(&link, flags.format)
}
