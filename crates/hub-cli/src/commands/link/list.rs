use chrono::Utc;
use hub_db::repos::link::BrowseQuery;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// The viewer's dashboard: visible, live links newest first.
pub async fn browse(
    search: Option<&str>,
    category: Option<&str>,
    page: u32,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let viewer = ctx.viewer(flags).await?;
    let query = BrowseQuery {
        search: search.map(str::to_string),
        category_id: category.map(str::to_string),
        page,
        per_page: ctx.config.general.page_size,
    };
    let links = ctx.service.browse_links(&viewer, &query, Utc::now()).await?;
    output(&links, flags.format)
}

/// Every link the viewer submitted, whatever its status.
pub async fn mine(page: u32, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let viewer = ctx.viewer(flags).await?;
    let links = ctx
        .service
        .my_links(&viewer, page, ctx.config.general.my_links_page_size)
        .await?;
    output(&links, flags.format)
}
