use hub_core::entities::TeamAffiliation;
use hub_core::enums::EntityType;
use hub_core::org::TeamFilter;
use hub_db::updates::team::TeamUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TeamCommands;
use crate::commands::shared::deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `linkhub team <subcommand>`.
pub async fn handle(
    action: &TeamCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TeamCommands::List {
            department,
            project,
        } => {
            let filter = match (department, project) {
                (Some(id), _) => TeamFilter::Department(id.clone()),
                (None, Some(id)) => TeamFilter::Project(id.clone()),
                (None, None) => TeamFilter::All,
            };
            output(&ctx.service.team_rows(&filter).await?, flags.format)
        }
        TeamCommands::Create {
            name,
            department,
            project,
        } => {
            let actor = ctx.viewer(flags).await?;
            let affiliation = affiliation(department.as_deref(), project.as_deref())
                .unwrap_or(TeamAffiliation::Unassigned);
            let team = ctx.service.create_team(&actor, name, affiliation).await?;
            output(&team, flags.format)
        }
        TeamCommands::Update {
            id,
            name,
            department,
            project,
            unassign,
        } => {
            let mut builder = TeamUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if *unassign {
                builder = builder.affiliation(TeamAffiliation::Unassigned);
            } else if let Some(affiliation) = affiliation(department.as_deref(), project.as_deref()) {
                builder = builder.affiliation(affiliation);
            }
            let update = builder.build();
            if update.name.is_none() && update.affiliation.is_none() {
                anyhow::bail!("team update: pass --name, --department, --project, or --unassign");
            }
            let actor = ctx.viewer(flags).await?;
            let team = ctx.service.update_team(&actor, id, update).await?;
            output(&team, flags.format)
        }
        TeamCommands::Delete { id } => {
            let actor = ctx.viewer(flags).await?;
            ctx.service.delete_team(&actor, id).await?;
            output(&deleted(EntityType::Team, id), flags.format)
        }
    }
}

fn affiliation(department: Option<&str>, project: Option<&str>) -> Option<TeamAffiliation> {
    match (department, project) {
        (Some(id), _) => Some(TeamAffiliation::Department {
            department_id: id.to_string(),
        }),
        (None, Some(id)) => Some(TeamAffiliation::Project {
            project_id: id.to_string(),
        }),
        (None, None) => None,
    }
}
