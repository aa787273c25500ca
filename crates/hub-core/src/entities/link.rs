use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::access::Audience;
use crate::enums::LinkStatus;

/// A submitted link with its moderation state and audience.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    pub short_url: String,
    pub description: String,
    pub status: LinkStatus,
    pub clicks: u64,
    pub creator_id: String,
    pub category_id: String,
    pub tags: Vec<String>,
    pub audience: Audience,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    /// Link stops resolving after this instant.
    pub expires_at: Option<DateTime<Utc>>,
    /// Link stops resolving once `clicks` reaches this value.
    pub max_clicks: Option<u64>,
}

impl Link {
    /// True once the expiry instant has passed or the click budget is spent.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
            || self.max_clicks.is_some_and(|max| self.clicks >= max)
    }

    /// Approved and not expired.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == LinkStatus::Approved && !self.is_expired(now)
    }
}
