//! Link update builder.

use chrono::{DateTime, Utc};
use hub_core::access::Audience;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_clicks: Option<Option<u64>>,
}

impl LinkUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        super::field_names(self).is_empty()
    }
}

pub struct LinkUpdateBuilder(LinkUpdate);

impl LinkUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(LinkUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.0.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: impl Into<String>) -> Self {
        self.0.category_id = Some(category_id.into());
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.0.tags = Some(tags);
        self
    }

    #[must_use]
    pub fn audience(mut self, audience: Audience) -> Self {
        self.0.audience = Some(audience);
        self
    }

    /// `None` clears the expiry.
    #[must_use]
    pub fn expires_at(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.0.expires_at = Some(expires_at);
        self
    }

    /// `None` clears the click budget.
    #[must_use]
    pub fn max_clicks(mut self, max_clicks: Option<u64>) -> Self {
        self.0.max_clicks = Some(max_clicks);
        self
    }

    #[must_use]
    pub fn build(self) -> LinkUpdate {
        self.0
    }
}

impl Default for LinkUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::updates::field_names;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_set_fields_are_named() {
        let update = LinkUpdateBuilder::new()
            .title("Runbook")
            .max_clicks(None)
            .build();
        assert_eq!(field_names(&update), vec!["max_clicks", "title"]);
        assert!(!update.is_empty());
        assert!(LinkUpdate::default().is_empty());
    }
}
