use hub_core::enums::{EntityType, UserRole};
use hub_db::repos::user::NewUser;
use hub_db::updates::user::{UserUpdate, UserUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::cli::subcommands::user::UserUpdateArgs;
use crate::commands::shared::deleted;
use crate::commands::shared::limit::{effective_limit, truncate};
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `linkhub user <subcommand>`.
pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::List => {
            let users = ctx.service.list_users().await?;
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            output(&truncate(users, limit), flags.format)
        }
        UserCommands::Create(args) => {
            let new = NewUser {
                name: args.name.clone(),
                email: args.email.clone(),
                avatar: args.avatar.clone(),
                role: parse_enum::<UserRole>(&args.role, "role")?,
                department_id: args.department.clone(),
                team_id: args.team.clone(),
            };
            let actor = ctx.viewer(flags).await?;
            output(&ctx.service.create_user(&actor, new).await?, flags.format)
        }
        UserCommands::Update(args) => {
            let update = build_update(args)?;
            if update.name.is_none()
                && update.email.is_none()
                && update.avatar.is_none()
                && update.role.is_none()
                && update.department_id.is_none()
                && update.team_id.is_none()
            {
                anyhow::bail!("user update: nothing to change for {}", args.id);
            }
            let actor = ctx.viewer(flags).await?;
            output(
                &ctx.service.update_user(&actor, &args.id, update).await?,
                flags.format,
            )
        }
        UserCommands::Delete { id } => {
            let actor = ctx.viewer(flags).await?;
            ctx.service.delete_user(&actor, id).await?;
            output(&deleted(EntityType::User, id), flags.format)
        }
    }
}

fn build_update(args: &UserUpdateArgs) -> anyhow::Result<UserUpdate> {
    let mut builder = UserUpdateBuilder::new();
    if let Some(name) = &args.name {
        builder = builder.name(name);
    }
    if let Some(email) = &args.email {
        builder = builder.email(email);
    }
    if let Some(avatar) = &args.avatar {
        builder = builder.avatar(avatar);
    }
    if let Some(role) = &args.role {
        builder = builder.role(parse_enum(role, "role")?);
    }
    if let Some(department) = &args.department {
        builder = builder.department_id(department);
    }
    if let Some(team) = &args.team {
        builder = builder.team_id(team);
    }
    Ok(builder.build())
}
