//! Click analytics computed over in-memory links and click logs.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{ClickLog, Link};
use crate::enums::LinkStatus;

/// Headline numbers of the analytics view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalyticsSummary {
    pub total_clicks: u64,
    pub total_links: u64,
    pub active_links: u64,
    /// Rounded to one decimal; zero when there are no links.
    pub avg_clicks_per_link: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TopLink {
    pub link_id: String,
    pub title: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DailyClicks {
    pub date: NaiveDate,
    /// Short label such as `May 20`.
    pub label: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecentClick {
    pub click_id: String,
    pub link_id: String,
    /// `None` when the link has since been deleted.
    pub link_title: Option<String>,
    pub user_id: String,
    pub clicked_at: DateTime<Utc>,
}

/// How many rows each analytics section returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsWindow {
    pub top: usize,
    pub days: u32,
    pub recent: usize,
}

impl Default for AnalyticsWindow {
    fn default() -> Self {
        Self {
            top: 5,
            days: 7,
            recent: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalyticsReport {
    pub summary: AnalyticsSummary,
    pub top_links: Vec<TopLink>,
    pub clicks_over_time: Vec<DailyClicks>,
    pub recent_activity: Vec<RecentClick>,
}

/// Total clicks are counted from the click log, not the per-link counters.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(links: &[Link], clicks: &[ClickLog]) -> AnalyticsSummary {
    let total_clicks = clicks.len() as u64;
    let total_links = links.len() as u64;
    let active_links = links
        .iter()
        .filter(|l| l.status == LinkStatus::Approved)
        .count() as u64;
    let avg_clicks_per_link = if total_links == 0 {
        0.0
    } else {
        (total_clicks as f64 / total_links as f64 * 10.0).round() / 10.0
    };
    AnalyticsSummary {
        total_clicks,
        total_links,
        active_links,
        avg_clicks_per_link,
    }
}

/// The `n` most clicked links by their click counter, ties broken by title.
#[must_use]
pub fn top_links(links: &[Link], n: usize) -> Vec<TopLink> {
    let mut ranked: Vec<&Link> = links.iter().collect();
    ranked.sort_by(|a, b| b.clicks.cmp(&a.clicks).then_with(|| a.title.cmp(&b.title)));
    ranked
        .into_iter()
        .take(n)
        .map(|l| TopLink {
            link_id: l.id.clone(),
            title: l.title.clone(),
            clicks: l.clicks,
        })
        .collect()
}

/// Longest click history, in days, that [`clicks_per_day`] reports.
pub const MAX_CLICK_DAYS: u32 = 366;

/// One bucket per calendar day (UTC), oldest first, ending on `today`.
/// `days` is capped at [`MAX_CLICK_DAYS`].
#[must_use]
pub fn clicks_per_day(clicks: &[ClickLog], today: NaiveDate, days: u32) -> Vec<DailyClicks> {
    (0..days.min(MAX_CLICK_DAYS))
        .rev()
        .map(|offset| {
            let date = today - Duration::days(i64::from(offset));
            let count = clicks
                .iter()
                .filter(|c| c.clicked_at.date_naive() == date)
                .count() as u64;
            DailyClicks {
                date,
                label: date.format("%b %-d").to_string(),
                clicks: count,
            }
        })
        .collect()
}

/// The `n` latest click events, newest first.
#[must_use]
pub fn recent_activity(clicks: &[ClickLog], links: &[Link], n: usize) -> Vec<RecentClick> {
    let mut ordered: Vec<&ClickLog> = clicks.iter().collect();
    ordered.sort_by(|a, b| b.clicked_at.cmp(&a.clicked_at).then_with(|| a.id.cmp(&b.id)));
    ordered
        .into_iter()
        .take(n)
        .map(|c| RecentClick {
            click_id: c.id.clone(),
            link_id: c.link_id.clone(),
            link_title: links
                .iter()
                .find(|l| l.id == c.link_id)
                .map(|l| l.title.clone()),
            user_id: c.user_id.clone(),
            clicked_at: c.clicked_at,
        })
        .collect()
}

#[must_use]
pub fn build_report(
    links: &[Link],
    clicks: &[ClickLog],
    today: NaiveDate,
    window: AnalyticsWindow,
) -> AnalyticsReport {
    AnalyticsReport {
        summary: summarize(links, clicks),
        top_links: top_links(links, window.top),
        clicks_over_time: clicks_per_day(clicks, today, window.days),
        recent_activity: recent_activity(clicks, links, window.recent),
    }
}
