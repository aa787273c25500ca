//! Link repository: submission, moderation, browsing, and edits.
//!
//! A link row carries its visibility mode; the allow-lists live in
//! `link_grants` and the tags in `link_tags`, both ordered by `position`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hub_core::access::{Audience, AudienceParts};
use hub_core::audit_detail::{StatusChangedDetail, UpdatedDetail};
use hub_core::entities::{Link, User};
use hub_core::enums::{AuditAction, EntityType, GrantKind, LinkStatus, VisibilityMode};
use hub_core::errors::CoreError;
use hub_core::ids::{self, PREFIX_LINK};
use hub_core::org::OrgChart;
use hub_core::responses::ModerationResponse;
use hub_core::search::{Page, matches_query, paginate, sort_newest_first};
use hub_core::validation;
use hub_core::visibility::{browse_set, can_manage, can_view};

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_u64, get_u64, parse_datetime, parse_enum, parse_optional_datetime, to_sql_int,
};
use crate::service::{HubService, require_admin};
use crate::updates::field_names;
use crate::updates::link::LinkUpdate;

const SELECT_COLS: &str = "id, title, url, short_url, description, status, clicks, creator_id, \
     category_id, visibility, created_at, approved_at, expires_at, max_clicks";

/// Input for a new link submission.
#[derive(Debug, Clone, Default)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub description: String,
    /// Falls back to the first category.
    pub category_id: Option<String>,
    pub tags: Vec<String>,
    pub audience: Audience,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_clicks: Option<u64>,
}

/// Dashboard filters.
#[derive(Debug, Clone)]
pub struct BrowseQuery {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for BrowseQuery {
    fn default() -> Self {
        Self {
            search: None,
            category_id: None,
            page: 1,
            per_page: 12,
        }
    }
}

fn row_to_link(row: &libsql::Row) -> Result<(Link, VisibilityMode), DatabaseError> {
    let link = Link {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        short_url: row.get(3)?,
        description: row.get(4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        clicks: get_u64(row, 6)?,
        creator_id: row.get(7)?,
        category_id: row.get(8)?,
        tags: Vec::new(),
        audience: Audience::Public,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        approved_at: parse_optional_datetime(row.get::<Option<String>>(11)?.as_deref())?,
        expires_at: parse_optional_datetime(row.get::<Option<String>>(12)?.as_deref())?,
        max_clicks: get_opt_u64(row, 13)?,
    };
    let mode = parse_enum(&row.get::<String>(9)?)?;
    Ok((link, mode))
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn check_max_clicks(max_clicks: Option<u64>) -> Result<(), DatabaseError> {
    if max_clicks == Some(0) {
        return Err(DatabaseError::validation("max_clicks must be at least 1"));
    }
    Ok(())
}

/// Directly granted teams must belong to one of the granted projects.
fn prune_project_teams(audience: Audience, chart: &OrgChart) -> Audience {
    match audience {
        Audience::Project {
            project_ids,
            team_ids,
        } => {
            let team_ids = chart.prune_team_grants(&team_ids, &project_ids);
            Audience::Project {
                project_ids,
                team_ids,
            }
        }
        other => other,
    }
}

fn rfc3339(at: Option<DateTime<Utc>>) -> Option<String> {
    at.map(|at| at.to_rfc3339())
}

impl HubService {
    /// Insert the link row with its tags and grants, exactly as given.
    pub(crate) async fn insert_link(&self, link: &Link) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO links ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
                ),
                libsql::params![
                    link.id.as_str(),
                    link.title.as_str(),
                    link.url.as_str(),
                    link.short_url.as_str(),
                    link.description.as_str(),
                    link.status.as_str(),
                    to_sql_int(link.clicks),
                    link.creator_id.as_str(),
                    link.category_id.as_str(),
                    link.audience.mode().as_str(),
                    link.created_at.to_rfc3339(),
                    rfc3339(link.approved_at),
                    rfc3339(link.expires_at),
                    link.max_clicks.map(to_sql_int)
                ],
            )
            .await?;
        self.write_tags(&link.id, &link.tags).await?;
        self.write_grants(&link.id, &link.audience).await?;
        Ok(())
    }

    async fn write_tags(&self, link_id: &str, tags: &[String]) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM link_tags WHERE link_id = ?1", [link_id])
            .await?;
        for (position, tag) in (0_i64..).zip(tags) {
            self.db()
                .conn()
                .execute(
                    "INSERT INTO link_tags (link_id, position, tag) VALUES (?1, ?2, ?3)",
                    libsql::params![link_id, position, tag.as_str()],
                )
                .await?;
        }
        Ok(())
    }

    async fn write_grants(&self, link_id: &str, audience: &Audience) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM link_grants WHERE link_id = ?1", [link_id])
            .await?;
        for (position, (kind, grant_id)) in (0_i64..).zip(audience.grants()) {
            self.db()
                .conn()
                .execute(
                    "INSERT INTO link_grants (link_id, position, kind, grant_id)
                     VALUES (?1, ?2, ?3, ?4)",
                    libsql::params![link_id, position, kind.as_str(), grant_id],
                )
                .await?;
        }
        Ok(())
    }

    async fn load_tags(
        &self,
        link_id: Option<&str>,
    ) -> Result<HashMap<String, Vec<String>>, DatabaseError> {
        let mut rows = match link_id {
            Some(id) => {
                self.db()
                    .conn()
                    .query(
                        "SELECT link_id, tag FROM link_tags WHERE link_id = ?1 ORDER BY position",
                        [id],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        "SELECT link_id, tag FROM link_tags ORDER BY link_id, position",
                        (),
                    )
                    .await?
            }
        };
        let mut tags: HashMap<String, Vec<String>> = HashMap::new();
        while let Some(row) = rows.next().await? {
            tags.entry(row.get::<String>(0)?)
                .or_default()
                .push(row.get::<String>(1)?);
        }
        Ok(tags)
    }

    async fn load_grants(
        &self,
        link_id: Option<&str>,
    ) -> Result<HashMap<String, AudienceParts>, DatabaseError> {
        let mut rows = match link_id {
            Some(id) => {
                self.db()
                    .conn()
                    .query(
                        "SELECT link_id, kind, grant_id FROM link_grants
                         WHERE link_id = ?1 ORDER BY position",
                        [id],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        "SELECT link_id, kind, grant_id FROM link_grants
                         ORDER BY link_id, position",
                        (),
                    )
                    .await?
            }
        };
        let mut grants: HashMap<String, AudienceParts> = HashMap::new();
        while let Some(row) = rows.next().await? {
            let kind: GrantKind = parse_enum(&row.get::<String>(1)?)?;
            grants
                .entry(row.get::<String>(0)?)
                .or_default()
                .push(kind, row.get::<String>(2)?);
        }
        Ok(grants)
    }

    /// Load link rows matching `filter` and attach their tags and audiences.
    async fn load_links(
        &self,
        filter: &str,
        params: Vec<libsql::Value>,
        single: Option<&str>,
    ) -> Result<Vec<Link>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM links {filter}"),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut stored = Vec::new();
        while let Some(row) = rows.next().await? {
            stored.push(row_to_link(&row)?);
        }
        if stored.is_empty() {
            return Ok(Vec::new());
        }

        let mut tags = self.load_tags(single).await?;
        let mut grants = self.load_grants(single).await?;
        let mut links: Vec<Link> = stored
            .into_iter()
            .map(|(mut link, mode)| {
                link.tags = tags.remove(&link.id).unwrap_or_default();
                link.audience =
                    Audience::from_parts(mode, grants.remove(&link.id).unwrap_or_default());
                link
            })
            .collect();
        sort_newest_first(&mut links);
        Ok(links)
    }

    /// Submit a link. Admin submissions are approved immediately; everyone
    /// else's wait in the moderation queue.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a missing title, a bad url, or a zero click
    /// budget, and `NotFound` for an unknown category.
    pub async fn create_link(&self, actor: &User, new: NewLink) -> Result<Link, DatabaseError> {
        let title = validation::require("title", &new.title)?;
        let url = validation::link_url(&new.url)?;
        check_max_clicks(new.max_clicks)?;
        let category_id = match new.category_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => self.get_category(id).await?.id,
            _ => self
                .list_categories()
                .await?
                .into_iter()
                .next()
                .map(|c| c.id)
                .ok_or_else(|| DatabaseError::validation("no categories exist yet"))?,
        };
        let audience = prune_project_teams(new.audience, &self.org_chart().await?);

        let now = Utc::now();
        let status = LinkStatus::initial_for(actor.role);
        let link = Link {
            id: self.db().generate_id(PREFIX_LINK).await?,
            title,
            url,
            short_url: ids::short_url(&self.db().generate_code().await?),
            description: new.description.trim().to_string(),
            status,
            clicks: 0,
            creator_id: actor.id.clone(),
            category_id,
            tags: normalize_tags(&new.tags),
            audience,
            created_at: now,
            approved_at: (status == LinkStatus::Approved).then_some(now),
            expires_at: new.expires_at,
            max_clicks: new.max_clicks,
        };
        self.insert_link(&link).await?;
        self.audit(Some(actor), EntityType::Link, &link.id, AuditAction::Created, None)
            .await?;
        tracing::info!(link = %link.id, status = %link.status, "link submitted");
        Ok(link)
    }

    /// Fetch a link regardless of who is asking.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no link has this id.
    pub async fn get_link(&self, id: &str) -> Result<Link, DatabaseError> {
        self.load_links("WHERE id = ?1", vec![id.into()], Some(id))
            .await?
            .pop()
            .ok_or_else(|| DatabaseError::not_found(EntityType::Link, id))
    }

    /// Fetch a link the viewer is allowed to see. Its creator and admins can
    /// always fetch it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn view_link(&self, viewer: &User, id: &str) -> Result<Link, DatabaseError> {
        let link = self.get_link(id).await?;
        if can_manage(&link, viewer) || can_view(&link, viewer, &self.org_chart().await?) {
            Ok(link)
        } else {
            Err(DatabaseError::forbidden(format!(
                "link {id} is not visible to {}",
                viewer.id
            )))
        }
    }

    /// Every link, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_links(&self) -> Result<Vec<Link>, DatabaseError> {
        self.load_links("", Vec::new(), None).await
    }

    /// The viewer's dashboard: the browse set narrowed by search text and
    /// category, newest first, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the links or org chart cannot be loaded.
    pub async fn browse_links(
        &self,
        viewer: &User,
        query: &BrowseQuery,
        now: DateTime<Utc>,
    ) -> Result<Page<Link>, DatabaseError> {
        let links = self.list_links().await?;
        let chart = self.org_chart().await?;
        let search = query.search.as_deref().unwrap_or_default();
        let category = query.category_id.as_deref().filter(|c| !c.is_empty());
        let matching: Vec<Link> = browse_set(&links, viewer, &chart, now)
            .into_iter()
            .filter(|link| category.is_none_or(|c| link.category_id == c))
            .filter(|link| matches_query(link, search))
            .cloned()
            .collect();
        Ok(paginate(matching, query.page, query.per_page))
    }

    /// Links the viewer created, in every status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn my_links(
        &self,
        viewer: &User,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Link>, DatabaseError> {
        let links = self
            .load_links("WHERE creator_id = ?1", vec![viewer.id.as_str().into()], None)
            .await?;
        Ok(paginate(links, page, per_page))
    }

    /// The moderation queue, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins.
    pub async fn pending_links(&self, actor: &User) -> Result<Vec<Link>, DatabaseError> {
        require_admin(actor, "viewing the moderation queue")?;
        self.load_links(
            "WHERE status = ?1",
            vec![LinkStatus::Pending.as_str().into()],
            None,
        )
        .await
    }

    /// Edit a link's content, audience, or limits. Status is untouched.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the actor created the link or is an admin,
    /// plus the validation errors of [`Self::create_link`].
    pub async fn update_link(
        &self,
        actor: &User,
        id: &str,
        update: LinkUpdate,
    ) -> Result<Link, DatabaseError> {
        let mut link = self.get_link(id).await?;
        if !can_manage(&link, actor) {
            return Err(DatabaseError::forbidden(format!(
                "only the creator or an admin can edit link {id}"
            )));
        }

        if let Some(title) = update.title.as_deref() {
            link.title = validation::require("title", title)?;
        }
        if let Some(url) = update.url.as_deref() {
            link.url = validation::link_url(url)?;
        }
        if let Some(description) = update.description.as_deref() {
            link.description = description.trim().to_string();
        }
        if let Some(category_id) = update.category_id.as_deref() {
            link.category_id = self.get_category(category_id.trim()).await?.id;
        }
        if let Some(tags) = update.tags.as_deref() {
            link.tags = normalize_tags(tags);
        }
        if let Some(audience) = update.audience.clone() {
            link.audience = prune_project_teams(audience, &self.org_chart().await?);
        }
        if let Some(expires_at) = update.expires_at {
            link.expires_at = expires_at;
        }
        if let Some(max_clicks) = update.max_clicks {
            check_max_clicks(max_clicks)?;
            link.max_clicks = max_clicks;
        }

        let fields = field_names(&update);
        if fields.is_empty() {
            return Ok(link);
        }

        self.db()
            .conn()
            .execute(
                "UPDATE links SET title = ?1, url = ?2, description = ?3, category_id = ?4,
                 visibility = ?5, expires_at = ?6, max_clicks = ?7 WHERE id = ?8",
                libsql::params![
                    link.title.as_str(),
                    link.url.as_str(),
                    link.description.as_str(),
                    link.category_id.as_str(),
                    link.audience.mode().as_str(),
                    rfc3339(link.expires_at),
                    link.max_clicks.map(to_sql_int),
                    id
                ],
            )
            .await?;
        if update.tags.is_some() {
            self.write_tags(id, &link.tags).await?;
        }
        if update.audience.is_some() {
            self.write_grants(id, &link.audience).await?;
        }

        self.audit(
            Some(actor),
            EntityType::Link,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&UpdatedDetail { fields })?),
        )
        .await?;
        Ok(link)
    }

    /// Move a link through the moderation lifecycle.
    ///
    /// Resubmission (back to `pending`) is open to the creator; every other
    /// transition needs an admin.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, or `InvalidTransition` when the
    /// status table does not allow the move.
    pub async fn update_link_status(
        &self,
        actor: &User,
        id: &str,
        next: LinkStatus,
        reason: Option<&str>,
    ) -> Result<ModerationResponse, DatabaseError> {
        let current = self.get_link(id).await?;
        if next == LinkStatus::Pending {
            if !can_manage(&current, actor) {
                return Err(DatabaseError::forbidden(format!(
                    "only the creator or an admin can resubmit link {id}"
                )));
            }
        } else {
            require_admin(actor, "moderating links")?;
        }
        if !current.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                entity_type: EntityType::Link.to_string(),
                id: id.to_string(),
                from: current.status.to_string(),
                to: next.to_string(),
            }
            .into());
        }

        let now = Utc::now();
        let approved_at = if next == LinkStatus::Approved {
            Some(now)
        } else {
            current.approved_at
        };
        self.db()
            .conn()
            .execute(
                "UPDATE links SET status = ?1, approved_at = ?2 WHERE id = ?3",
                libsql::params![next.as_str(), rfc3339(approved_at), id],
            )
            .await?;

        let detail = StatusChangedDetail {
            from: current.status.as_str().to_string(),
            to: next.as_str().to_string(),
            reason: reason.map(str::trim).filter(|r| !r.is_empty()).map(String::from),
        };
        self.audit(
            Some(actor),
            EntityType::Link,
            id,
            AuditAction::StatusChanged,
            Some(serde_json::to_value(&detail)?),
        )
        .await?;
        tracing::info!(link = %id, from = %current.status, to = %next, actor = %actor.id, "link moderated");

        let previous_status = current.status;
        Ok(ModerationResponse {
            link: Link {
                status: next,
                approved_at,
                ..current
            },
            previous_status,
        })
    }

    /// # Errors
    ///
    /// See [`Self::update_link_status`].
    pub async fn approve_link(
        &self,
        actor: &User,
        id: &str,
    ) -> Result<ModerationResponse, DatabaseError> {
        self.update_link_status(actor, id, LinkStatus::Approved, None)
            .await
    }

    /// # Errors
    ///
    /// See [`Self::update_link_status`].
    pub async fn reject_link(
        &self,
        actor: &User,
        id: &str,
        reason: Option<&str>,
    ) -> Result<ModerationResponse, DatabaseError> {
        self.update_link_status(actor, id, LinkStatus::Rejected, reason)
            .await
    }

    /// Remove a link with its tags, grants, and click history.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`.
    pub async fn delete_link(&self, actor: &User, id: &str) -> Result<(), DatabaseError> {
        let link = self.get_link(id).await?;
        if !can_manage(&link, actor) {
            return Err(DatabaseError::forbidden(format!(
                "only the creator or an admin can delete link {id}"
            )));
        }
        self.db()
            .conn()
            .execute("DELETE FROM links WHERE id = ?1", [id])
            .await?;
        self.audit(Some(actor), EntityType::Link, id, AuditAction::Deleted, None)
            .await?;
        Ok(())
    }
}
