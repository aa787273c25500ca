use clap::Subcommand;

/// Department commands. Writes are admin-only.
#[derive(Clone, Debug, Subcommand)]
pub enum DepartmentCommands {
    /// List departments with labels and parent names.
    List,
    /// Create a department.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Rename or re-parent a department.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        parent: Option<String>,
        /// Make the department top-level.
        #[arg(long, conflicts_with = "parent")]
        root: bool,
    },
    /// Delete a department.
    Delete { id: String },
    /// Display label of a department.
    Label { id: String },
}
