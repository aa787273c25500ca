use clap::Subcommand;

/// Project commands. Writes are admin-only.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    List,
    Create {
        #[arg(long)]
        name: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    Delete { id: String },
}
