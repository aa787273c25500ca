use clap::Subcommand;

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in with Lark in the browser.
    Login,
    /// Clear the stored session.
    Logout,
    /// Show the stored session.
    Status,
}
