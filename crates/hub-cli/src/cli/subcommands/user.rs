use clap::{Args, Subcommand};

/// Directory user commands. Writes are admin-only.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    List,
    Create(UserCreateArgs),
    Update(UserUpdateArgs),
    Delete { id: String },
}

#[derive(Clone, Debug, Args)]
pub struct UserCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub avatar: Option<String>,
    /// user or admin.
    #[arg(long, default_value = "user")]
    pub role: String,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub team: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct UserUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub avatar: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub team: Option<String>,
}
