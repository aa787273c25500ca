mod click;
mod create;
mod delete;
mod get;
mod list;
mod moderate;
mod update;

use hub_core::enums::LinkStatus;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LinkCommands;
use crate::context::AppContext;

/// Handle `linkhub link <subcommand>`.
pub async fn handle(
    action: &LinkCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        LinkCommands::List {
            search,
            category,
            page,
        } => list::browse(search.as_deref(), category.as_deref(), *page, ctx, flags).await,
        LinkCommands::Mine { page } => list::mine(*page, ctx, flags).await,
        LinkCommands::Get { id } => get::run(id, ctx, flags).await,
        LinkCommands::Create(args) => create::run(args, ctx, flags).await,
        LinkCommands::Update(args) => update::run(args, ctx, flags).await,
        LinkCommands::Delete { id } => delete::run(id, ctx, flags).await,
        LinkCommands::Click { id } => click::run(id, ctx, flags).await,
        LinkCommands::Pending => moderate::pending(ctx, flags).await,
        LinkCommands::Approve { id } => {
            moderate::transition(id, LinkStatus::Approved, None, ctx, flags).await
        }
        LinkCommands::Reject { id, reason } => {
            moderate::transition(id, LinkStatus::Rejected, reason.as_deref(), ctx, flags).await
        }
        LinkCommands::Archive { id, reason } => {
            moderate::transition(id, LinkStatus::Archived, reason.as_deref(), ctx, flags).await
        }
        LinkCommands::Resubmit { id } => {
            moderate::transition(id, LinkStatus::Pending, None, ctx, flags).await
        }
    }
}
