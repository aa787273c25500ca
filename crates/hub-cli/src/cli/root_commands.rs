use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    AuthCommands, CategoryCommands, DepartmentCommands, LinkCommands, ProjectCommands,
    TeamCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Browse, submit, and moderate links.
    Link {
        #[command(subcommand)]
        action: LinkCommands,
    },
    /// Department tree.
    Department {
        #[command(subcommand)]
        action: DepartmentCommands,
    },
    /// Teams.
    Team {
        #[command(subcommand)]
        action: TeamCommands,
    },
    /// Projects.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Link categories.
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Directory users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Click analytics over the links you can see.
    Analytics(AnalyticsArgs),
    /// View audit trail.
    Audit(AuditArgs),
    /// Authentication.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Dump JSON schema for an entity type.
    Schema(SchemaArgs),
}

/// Arguments for `linkhub analytics`.
#[derive(Clone, Debug, Args)]
pub struct AnalyticsArgs {
    /// Number of most clicked links.
    #[arg(long, default_value_t = 5)]
    pub top: usize,
    /// Days of daily click counts, ending today (at most 366).
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=366))]
    pub days: u32,
    /// Number of latest click events.
    #[arg(long, default_value_t = 5)]
    pub recent: usize,
}

/// Arguments for `linkhub audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    #[arg(long)]
    pub actor: Option<String>,
}

/// Arguments for `linkhub schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Entity type: link, user, department, team, project, category,
    /// click, audit, analytics.
    pub type_name: String,
}
