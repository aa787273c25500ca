use clap::Subcommand;

/// Category commands. Writes are admin-only.
#[derive(Clone, Debug, Subcommand)]
pub enum CategoryCommands {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        icon: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    Delete { id: String },
}
