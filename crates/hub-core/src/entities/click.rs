use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One recorded visit of a link by a user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClickLog {
    pub id: String,
    pub link_id: String,
    pub user_id: String,
    pub clicked_at: DateTime<Utc>,
}
