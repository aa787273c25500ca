use hub_core::search::parse_tags;
use hub_db::updates::link::{LinkUpdate, LinkUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::link::LinkUpdateArgs;
use crate::commands::shared::audience::audience_from_flags;
use crate::commands::shared::parse::parse_instant;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &LinkUpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let update = build_update(args)?;
    if update.is_empty() {
        anyhow::bail!("link update: nothing to change for {}", args.id);
    }

    let viewer = ctx.viewer(flags).await?;
    let link = ctx.service.update_link(&viewer, &args.id, update).await?;
    output(&link, flags.format)
}

fn build_update(args: &LinkUpdateArgs) -> anyhow::Result<LinkUpdate> {
    let fields = &args.fields;
    let mut builder = LinkUpdateBuilder::new();
    if let Some(title) = &args.title {
        builder = builder.title(title);
    }
    if let Some(url) = &args.url {
        builder = builder.url(url);
    }
    if let Some(description) = &fields.description {
        builder = builder.description(description);
    }
    if let Some(category) = &fields.category {
        builder = builder.category_id(category);
    }
    if let Some(tags) = &fields.tags {
        builder = builder.tags(parse_tags(tags));
    }
    if let Some(audience) = audience_from_flags(fields)? {
        builder = builder.audience(audience);
    }
    if args.no_expiry {
        builder = builder.expires_at(None);
    } else if let Some(raw) = &fields.expires_at {
        builder = builder.expires_at(Some(parse_instant(raw, "expires-at")?));
    }
    if args.no_max_clicks {
        builder = builder.max_clicks(None);
    } else if let Some(max) = fields.max_clicks {
        builder = builder.max_clicks(Some(max));
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use hub_core::access::Audience;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::subcommands::link::LinkFieldArgs;

    fn args(fields: LinkFieldArgs) -> LinkUpdateArgs {
        LinkUpdateArgs {
            id: "link-8".into(),
            title: None,
            url: None,
            fields,
            no_expiry: false,
            no_max_clicks: false,
        }
    }

    #[test]
    fn untouched_flags_produce_an_empty_update() {
        assert!(build_update(&args(LinkFieldArgs::default())).unwrap().is_empty());
    }

    #[test]
    fn tags_and_audience_are_parsed() {
        let update = build_update(&args(LinkFieldArgs {
            tags: Some("api, docs, api".into()),
            visibility: Some("public".into()),
            ..LinkFieldArgs::default()
        }))
        .unwrap();
        assert_eq!(update.tags, Some(vec!["api".to_string(), "docs".to_string()]));
        assert_eq!(update.audience, Some(Audience::Public));
        assert_eq!(update.expires_at, None);
    }

    #[test]
    fn clearing_limits_sets_explicit_none() {
        let mut cleared = args(LinkFieldArgs::default());
        cleared.no_expiry = true;
        cleared.no_max_clicks = true;
        let update = build_update(&cleared).unwrap();
        assert_eq!(update.expires_at, Some(None));
        assert_eq!(update.max_clicks, Some(None));
    }
}
