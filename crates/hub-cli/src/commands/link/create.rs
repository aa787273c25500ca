use hub_core::search::parse_tags;
use hub_db::repos::link::NewLink;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::link::LinkCreateArgs;
use crate::commands::shared::audience::audience_from_flags;
use crate::commands::shared::parse::parse_instant;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &LinkCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let viewer = ctx.viewer(flags).await?;
    let fields = &args.fields;
    let new = NewLink {
        title: args.title.clone(),
        url: args.url.clone(),
        description: fields.description.clone().unwrap_or_default(),
        category_id: fields.category.clone(),
        tags: fields.tags.as_deref().map(parse_tags).unwrap_or_default(),
        audience: audience_from_flags(fields)?.unwrap_or_default(),
        expires_at: fields
            .expires_at
            .as_deref()
            .map(|raw| parse_instant(raw, "expires-at"))
            .transpose()?,
        max_clicks: fields.max_clicks,
    };

    let link = ctx.service.create_link(&viewer, new).await?;
    output(&link, flags.format)
}
