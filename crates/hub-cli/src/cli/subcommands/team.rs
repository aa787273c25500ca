use clap::Subcommand;

/// Team commands. Writes are admin-only.
#[derive(Clone, Debug, Subcommand)]
pub enum TeamCommands {
    /// List teams, optionally narrowed to a department or project.
    List {
        #[arg(long, conflicts_with = "project")]
        department: Option<String>,
        #[arg(long)]
        project: Option<String>,
    },
    /// Create a team under a department or a project.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, conflicts_with = "project")]
        department: Option<String>,
        #[arg(long)]
        project: Option<String>,
    },
    /// Rename or move a team.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with_all = ["project", "unassign"])]
        department: Option<String>,
        #[arg(long, conflicts_with = "unassign")]
        project: Option<String>,
        /// Detach the team from its department or project.
        #[arg(long)]
        unassign: bool,
    },
    /// Delete a team.
    Delete { id: String },
}
