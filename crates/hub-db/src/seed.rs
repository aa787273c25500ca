//! Fixture directory loaded into a fresh store.
//!
//! `fixtures/directory.json` is compiled into the binary. Seeding writes rows
//! with their fixture ids as-is and does not append audit entries. A click
//! history over the last 30 days is synthesized for the approved links; the
//! seeded clicks leave each link's `clicks` counter at its fixture value.

use chrono::{DateTime, Duration, Utc};
use hub_core::access::Audience;
use hub_core::entities::{Category, ClickLog, Department, Link, Project, Team, User};
use hub_core::enums::LinkStatus;
use serde::Deserialize;

use crate::error::DatabaseError;
use crate::service::HubService;

const DIRECTORY_JSON: &str = include_str!("../fixtures/directory.json");

/// Number of click events synthesized at seed time.
pub const FIXTURE_CLICKS: usize = 500;

/// Seeded clicks fall within this many days before now.
pub const FIXTURE_CLICK_DAYS: usize = 30;

#[derive(Debug, Deserialize)]
struct FixtureLink {
    id: String,
    title: String,
    url: String,
    short_url: String,
    description: String,
    status: LinkStatus,
    clicks: u64,
    creator_id: String,
    category_id: String,
    created_at: DateTime<Utc>,
    audience: Audience,
    #[serde(default)]
    tags: Vec<String>,
}

impl From<FixtureLink> for Link {
    fn from(f: FixtureLink) -> Self {
        let approved_at = (f.status == LinkStatus::Approved).then_some(f.created_at);
        Self {
            id: f.id,
            title: f.title,
            url: f.url,
            short_url: f.short_url,
            description: f.description,
            status: f.status,
            clicks: f.clicks,
            creator_id: f.creator_id,
            category_id: f.category_id,
            tags: f.tags,
            audience: f.audience,
            created_at: f.created_at,
            approved_at,
            expires_at: None,
            max_clicks: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Directory {
    users: Vec<User>,
    categories: Vec<Category>,
    departments: Vec<Department>,
    projects: Vec<Project>,
    teams: Vec<Team>,
    links: Vec<FixtureLink>,
}

/// Row counts written by [`HubService::seed_directory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub categories: usize,
    pub departments: usize,
    pub projects: usize,
    pub teams: usize,
    pub links: usize,
    pub clicks: usize,
}

/// Deterministic click history spread over the approved links and all users.
fn synthesize_clicks(links: &[Link], users: &[User], now: DateTime<Utc>) -> Vec<ClickLog> {
    let approved: Vec<&Link> = links
        .iter()
        .filter(|l| l.status == LinkStatus::Approved)
        .collect();
    if approved.is_empty() || users.is_empty() {
        return Vec::new();
    }
    (0..FIXTURE_CLICKS)
        .map(|i| {
            let link = approved[(i * 7 + 3) % approved.len()];
            let user = &users[i % users.len()];
            let days_ago = (i * 11) % FIXTURE_CLICK_DAYS;
            let minutes_ago = i % 60;
            ClickLog {
                id: format!("click-{i}"),
                link_id: link.id.clone(),
                user_id: user.id.clone(),
                clicked_at: now
                    - Duration::days(i64::try_from(days_ago).unwrap_or_default())
                    - Duration::minutes(i64::try_from(minutes_ago).unwrap_or_default()),
            }
        })
        .collect()
}

impl HubService {
    /// Write the fixture directory and its click history.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the fixture JSON is malformed or any row
    /// conflicts with existing data.
    pub async fn seed_directory(&self) -> Result<SeedReport, DatabaseError> {
        let directory: Directory = serde_json::from_str(DIRECTORY_JSON)?;
        let links: Vec<Link> = directory.links.into_iter().map(Link::from).collect();

        for user in &directory.users {
            self.insert_user(user).await?;
        }
        for category in &directory.categories {
            self.insert_category(category).await?;
        }
        for department in &directory.departments {
            self.insert_department(department).await?;
        }
        for project in &directory.projects {
            self.insert_project(project).await?;
        }
        for team in &directory.teams {
            self.insert_team(team).await?;
        }
        for link in &links {
            self.insert_link(link).await?;
        }
        let clicks = synthesize_clicks(&links, &directory.users, Utc::now());
        for click in &clicks {
            self.insert_click(click).await?;
        }

        let report = SeedReport {
            users: directory.users.len(),
            categories: directory.categories.len(),
            departments: directory.departments.len(),
            projects: directory.projects.len(),
            teams: directory.teams.len(),
            links: links.len(),
            clicks: clicks.len(),
        };
        tracing::debug!(?report, "seeded fixture directory");
        Ok(report)
    }

    /// Seed only when the store has no users yet. Returns `None` when
    /// seeding was skipped.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the check or the seed fails.
    pub async fn seed_if_empty(&self) -> Result<Option<SeedReport>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM users", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let users: i64 = row.get(0)?;
        drop(rows);
        if users > 0 {
            tracing::debug!(users, "store already populated, skipping fixtures");
            return Ok(None);
        }
        self.seed_directory().await.map(Some)
    }
}
