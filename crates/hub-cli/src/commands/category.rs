use hub_core::enums::EntityType;
use hub_db::updates::category::CategoryUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CategoryCommands;
use crate::commands::shared::deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `linkhub category <subcommand>`.
pub async fn handle(
    action: &CategoryCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CategoryCommands::List => output(&ctx.service.list_categories().await?, flags.format),
        CategoryCommands::Create { name, icon } => {
            let actor = ctx.viewer(flags).await?;
            let category = ctx
                .service
                .create_category(&actor, name, icon.as_deref())
                .await?;
            output(&category, flags.format)
        }
        CategoryCommands::Update { id, name, icon } => {
            let mut builder = CategoryUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(icon) = icon {
                builder = builder.icon(icon);
            }
            let update = builder.build();
            if update.name.is_none() && update.icon.is_none() {
                anyhow::bail!("category update: pass --name or --icon");
            }
            let actor = ctx.viewer(flags).await?;
            output(&ctx.service.update_category(&actor, id, update).await?, flags.format)
        }
        CategoryCommands::Delete { id } => {
            let actor = ctx.viewer(flags).await?;
            ctx.service.delete_category(&actor, id).await?;
            output(&deleted(EntityType::Category, id), flags.format)
        }
    }
}
