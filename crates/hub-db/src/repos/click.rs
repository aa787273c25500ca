//! Click log repository.

use chrono::{DateTime, Utc};
use hub_core::audit_detail::ClickedDetail;
use hub_core::entities::{ClickLog, User};
use hub_core::enums::{AuditAction, EntityType};
use hub_core::ids::PREFIX_CLICK;
use hub_core::responses::ClickResponse;
use hub_core::visibility::can_view;

use crate::error::DatabaseError;
use crate::helpers::{get_u64, parse_datetime};
use crate::service::HubService;

const SELECT_COLS: &str = "id, link_id, user_id, clicked_at";

fn row_to_click(row: &libsql::Row) -> Result<ClickLog, DatabaseError> {
    Ok(ClickLog {
        id: row.get(0)?,
        link_id: row.get(1)?,
        user_id: row.get(2)?,
        clicked_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl HubService {
    /// Insert a click row without touching the link's counter.
    pub(crate) async fn insert_click(&self, click: &ClickLog) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO click_logs ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![
                    click.id.as_str(),
                    click.link_id.as_str(),
                    click.user_id.as_str(),
                    click.clicked_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Clicks oldest first, optionally for a single link.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_clicks(&self, link_id: Option<&str>) -> Result<Vec<ClickLog>, DatabaseError> {
        let mut rows = match link_id {
            Some(id) => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM click_logs WHERE link_id = ?1 ORDER BY clicked_at, rowid"
                        ),
                        [id],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        &format!("SELECT {SELECT_COLS} FROM click_logs ORDER BY clicked_at, rowid"),
                        (),
                    )
                    .await?
            }
        };
        let mut clicks = Vec::new();
        while let Some(row) = rows.next().await? {
            clicks.push(row_to_click(&row)?);
        }
        Ok(clicks)
    }

    /// Follow a link: bump the counter and log the click in one
    /// transaction, then hand back the destination.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden` when the viewer cannot see the link,
    /// and `Validation` when the link is not approved or has expired.
    pub async fn record_click(
        &self,
        viewer: &User,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<ClickResponse, DatabaseError> {
        let link = self.get_link(id).await?;
        if !can_view(&link, viewer, &self.org_chart().await?) {
            return Err(DatabaseError::forbidden(format!(
                "link {id} is not visible to {}",
                viewer.id
            )));
        }
        if !link.is_live(now) {
            let reason = if link.is_expired(now) {
                "has expired".to_string()
            } else {
                format!("is {}", link.status)
            };
            return Err(DatabaseError::validation(format!("link {id} {reason}")));
        }

        let click = ClickLog {
            id: self.db().generate_id(PREFIX_CLICK).await?,
            link_id: link.id.clone(),
            user_id: viewer.id.clone(),
            clicked_at: now,
        };
        let conn = self.db().conn();
        conn.execute("BEGIN", ()).await?;
        let counted = async {
            let mut rows = conn
                .query(
                    "UPDATE links SET clicks = clicks + 1 WHERE id = ?1 RETURNING clicks",
                    [id],
                )
                .await?;
            let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
            let clicks = get_u64(&row, 0)?;
            drop(rows);
            self.insert_click(&click).await?;
            Ok::<_, DatabaseError>(clicks)
        }
        .await;
        let clicks = match counted {
            Ok(clicks) => {
                conn.execute("COMMIT", ()).await?;
                clicks
            }
            Err(error) => {
                conn.execute("ROLLBACK", ()).await?;
                return Err(error);
            }
        };

        self.audit(
            Some(viewer),
            EntityType::Link,
            id,
            AuditAction::Clicked,
            Some(serde_json::to_value(&ClickedDetail {
                click_id: click.id.clone(),
                total_clicks: clicks,
            })?),
        )
        .await?;
        tracing::debug!(link = %id, user = %viewer.id, clicks, "click recorded");

        Ok(ClickResponse {
            link_id: link.id,
            url: link.url,
            short_url: link.short_url,
            clicks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{admin, chen, maria, seeded_service};
    use crate::updates::link::LinkUpdateBuilder;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn click_bumps_counter_and_logs() {
        let svc = seeded_service().await;
        let before = svc.list_clicks(Some("link-4")).await.unwrap().len();

        let response = svc.record_click(&chen(), "link-4", Utc::now()).await.unwrap();
        assert_eq!(response.clicks, 2311);
        assert_eq!(response.url, "https://notion.so/handbook");
        assert_eq!(response.short_url, "lh.co/handbook");
        assert_eq!(svc.get_link("link-4").await.unwrap().clicks, 2311);

        let clicks = svc.list_clicks(Some("link-4")).await.unwrap();
        assert_eq!(clicks.len(), before + 1);
        assert!(clicks.iter().any(|c| c.user_id == "user-3"));
    }

    #[tokio::test]
    async fn failed_click_log_leaves_the_counter_alone() {
        let svc = seeded_service().await;
        svc.db()
            .conn()
            .execute(
                "CREATE TRIGGER block_clicks BEFORE INSERT ON click_logs \
                 BEGIN SELECT RAISE(ABORT, 'click log unavailable'); END",
                (),
            )
            .await
            .unwrap();
        let before = svc.list_clicks(Some("link-4")).await.unwrap().len();

        assert!(svc.record_click(&chen(), "link-4", Utc::now()).await.is_err());
        assert_eq!(svc.get_link("link-4").await.unwrap().clicks, 2310);
        assert_eq!(svc.list_clicks(Some("link-4")).await.unwrap().len(), before);

        svc.db()
            .conn()
            .execute("DROP TRIGGER block_clicks", ())
            .await
            .unwrap();
        assert_eq!(svc.record_click(&chen(), "link-4", Utc::now()).await.unwrap().clicks, 2311);
    }

    #[tokio::test]
    async fn hidden_or_unapproved_links_cannot_be_followed() {
        let svc = seeded_service().await;
        let now = Utc::now();
        assert!(svc.record_click(&chen(), "link-8", now).await.unwrap_err().is_forbidden());

        let pending = svc.record_click(&admin(), "link-5", now).await.unwrap_err();
        assert!(pending.to_string().contains("pending"), "{pending}");
        assert!(svc.record_click(&maria(), "link-404", now).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn click_budget_closes_the_link() {
        let svc = seeded_service().await;
        svc.update_link(
            &admin(),
            "link-17",
            LinkUpdateBuilder::new().max_clicks(Some(40)).build(),
        )
        .await
        .unwrap();

        let now = Utc::now();
        assert_eq!(svc.record_click(&admin(), "link-17", now).await.unwrap().clicks, 40);
        let spent = svc.record_click(&admin(), "link-17", now).await.unwrap_err();
        assert!(spent.to_string().contains("expired"), "{spent}");

        let later = now + Duration::days(1);
        assert!(svc.record_click(&maria(), "link-1", later).await.is_ok());
    }
}
