use hub_core::enums::EntityType;
use hub_db::updates::project::ProjectUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectCommands;
use crate::commands::shared::deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `linkhub project <subcommand>`.
pub async fn handle(
    action: &ProjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::List => output(&ctx.service.list_projects().await?, flags.format),
        ProjectCommands::Create { name } => {
            let actor = ctx.viewer(flags).await?;
            output(&ctx.service.create_project(&actor, name).await?, flags.format)
        }
        ProjectCommands::Update { id, name } => {
            let Some(name) = name else {
                anyhow::bail!("project update: pass --name");
            };
            let actor = ctx.viewer(flags).await?;
            let update = ProjectUpdateBuilder::new().name(name).build();
            output(&ctx.service.update_project(&actor, id, update).await?, flags.format)
        }
        ProjectCommands::Delete { id } => {
            let actor = ctx.viewer(flags).await?;
            ctx.service.delete_project(&actor, id).await?;
            output(&deleted(EntityType::Project, id), flags.format)
        }
    }
}
