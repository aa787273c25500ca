//! Analytics over the links a viewer can see.

use std::collections::HashSet;

use chrono::NaiveDate;
use hub_core::analytics::{AnalyticsReport, AnalyticsWindow, build_report};
use hub_core::entities::{Link, User};
use hub_core::visibility::visible_links;

use crate::error::DatabaseError;
use crate::service::HubService;

impl HubService {
    /// Click report scoped to the viewer. Admins see every link; everyone
    /// else sees the links `can_view` admits and the clicks on them.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if links, clicks, or the org chart cannot be
    /// loaded.
    pub async fn analytics_report(
        &self,
        viewer: &User,
        window: AnalyticsWindow,
        today: NaiveDate,
    ) -> Result<AnalyticsReport, DatabaseError> {
        let links = self.list_links().await?;
        let links: Vec<Link> = if viewer.is_admin() {
            links
        } else {
            let chart = self.org_chart().await?;
            visible_links(&links, viewer, &chart)
                .into_iter()
                .cloned()
                .collect()
        };
        let ids: HashSet<&str> = links.iter().map(|l| l.id.as_str()).collect();
        let clicks: Vec<_> = self
            .list_clicks(None)
            .await?
            .into_iter()
            .filter(|c| ids.contains(c.link_id.as_str()))
            .collect();
        Ok(build_report(&links, &clicks, today, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{admin, chen, seeded_service};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn admin_report_covers_the_whole_directory() {
        let svc = seeded_service().await;
        let today = Utc::now().date_naive();
        let report = svc
            .analytics_report(&admin(), AnalyticsWindow::default(), today)
            .await
            .unwrap();

        assert_eq!(report.summary.total_links, 17);
        assert_eq!(report.summary.active_links, 14);
        assert_eq!(report.summary.total_clicks, 500);
        assert_eq!(report.top_links[0].title, "Employee Handbook");
        assert_eq!(report.top_links.len(), 5);
        assert_eq!(report.clicks_over_time.len(), 7);
        assert_eq!(report.clicks_over_time.last().unwrap().date, today);
        assert_eq!(report.recent_activity.len(), 5);
    }

    #[tokio::test]
    async fn member_report_only_counts_visible_links() {
        let svc = seeded_service().await;
        let today = Utc::now().date_naive();
        let report = svc
            .analytics_report(&chen(), AnalyticsWindow::default(), today)
            .await
            .unwrap();

        // Public links, the Business department plan, and Chen's own rejected link.
        assert_eq!(report.summary.total_links, 6);
        assert_eq!(report.summary.active_links, 5);
        let top: Vec<_> = report.top_links.iter().map(|t| t.link_id.as_str()).collect();
        assert_eq!(top, vec!["link-4", "link-1", "link-2", "link-3", "link-12"]);

        let visible = ["link-1", "link-2", "link-3", "link-4", "link-6", "link-12"];
        assert!(
            report
                .recent_activity
                .iter()
                .all(|c| visible.contains(&c.link_id.as_str()))
        );
    }
}
