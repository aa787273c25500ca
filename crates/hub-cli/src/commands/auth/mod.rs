mod login;
mod logout;
mod status;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::AppContext;

/// Handle `linkhub auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login => login::handle(ctx, flags).await,
        AuthCommands::Logout => logout::handle(flags),
        AuthCommands::Status => status::handle(ctx, flags).await,
    }
}
