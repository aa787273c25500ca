use clap::{Args, Subcommand};

/// Link commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LinkCommands {
    /// Browse the links you can see.
    List {
        /// Match title, description, url, or tags.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Links you submitted, in every status.
    Mine {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Get a link by ID.
    Get { id: String },
    /// Submit a link.
    Create(LinkCreateArgs),
    /// Edit a link you submitted.
    Update(LinkUpdateArgs),
    /// Delete a link you submitted.
    Delete { id: String },
    /// Follow a link and print its destination.
    Click { id: String },
    /// Moderation queue (admin).
    Pending,
    /// Approve a pending link (admin).
    Approve { id: String },
    /// Reject a pending link (admin).
    Reject {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Archive an approved or rejected link (admin).
    Archive {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Send a rejected link back to the moderation queue.
    Resubmit { id: String },
}

/// Fields shared by `link create` and `link update`.
#[derive(Clone, Debug, Default, Args)]
pub struct LinkFieldArgs {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Comma-separated tags.
    #[arg(long)]
    pub tags: Option<String>,
    /// public, department, team, project, or private.
    #[arg(long)]
    pub visibility: Option<String>,
    /// Department granted access (repeatable).
    #[arg(long = "department", value_name = "ID")]
    pub departments: Vec<String>,
    /// Team granted access (repeatable).
    #[arg(long = "team", value_name = "ID")]
    pub teams: Vec<String>,
    /// Project granted access (repeatable).
    #[arg(long = "project", value_name = "ID")]
    pub projects: Vec<String>,
    /// User granted access (repeatable).
    #[arg(long = "user", value_name = "ID")]
    pub users: Vec<String>,
    /// RFC 3339 instant after which the link stops resolving.
    #[arg(long)]
    pub expires_at: Option<String>,
    /// Click budget.
    #[arg(long)]
    pub max_clicks: Option<u64>,
}

#[derive(Clone, Debug, Args)]
pub struct LinkCreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub url: String,
    #[command(flatten)]
    pub fields: LinkFieldArgs,
}

#[derive(Clone, Debug, Args)]
pub struct LinkUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[command(flatten)]
    pub fields: LinkFieldArgs,
    /// Remove the expiry.
    #[arg(long, conflicts_with = "expires_at")]
    pub no_expiry: bool,
    /// Remove the click budget.
    #[arg(long, conflicts_with = "max_clicks")]
    pub no_max_clicks: bool,
}
