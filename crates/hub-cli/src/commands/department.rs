use hub_core::enums::EntityType;
use hub_db::updates::department::DepartmentUpdateBuilder;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DepartmentCommands;
use crate::commands::shared::deleted;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct LabelResponse {
    id: String,
    label: String,
}

/// Handle `linkhub department <subcommand>`.
pub async fn handle(
    action: &DepartmentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DepartmentCommands::List => {
            output(&ctx.service.department_rows().await?, flags.format)
        }
        DepartmentCommands::Label { id } => {
            let label = ctx.service.department_label(id).await?;
            output(
                &LabelResponse {
                    id: id.clone(),
                    label,
                },
                flags.format,
            )
        }
        DepartmentCommands::Create { name, parent } => {
            let actor = ctx.viewer(flags).await?;
            let department = ctx
                .service
                .create_department(&actor, name, parent.as_deref())
                .await?;
            output(&department, flags.format)
        }
        DepartmentCommands::Update {
            id,
            name,
            parent,
            root,
        } => {
            let mut builder = DepartmentUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if *root {
                builder = builder.parent_id(None);
            } else if let Some(parent) = parent {
                builder = builder.parent_id(Some(parent.clone()));
            }
            let update = builder.build();
            if update.name.is_none() && update.parent_id.is_none() {
                anyhow::bail!("department update: pass --name, --parent, or --root");
            }
            let actor = ctx.viewer(flags).await?;
            let department = ctx.service.update_department(&actor, id, update).await?;
            output(&department, flags.format)
        }
        DepartmentCommands::Delete { id } => {
            let actor = ctx.viewer(flags).await?;
            ctx.service.delete_department(&actor, id).await?;
            output(&deleted(EntityType::Department, id), flags.format)
        }
    }
}
