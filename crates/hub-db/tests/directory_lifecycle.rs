//! End-to-end repository flows over the public `HubService` API:
//! - Opening from config seeds once, including across reopen of a file store
//! - Submission, moderation, and clicks as seen by different viewers
//! - Org-chart edits changing who can see department links

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use hub_config::DatabaseConfig;
use hub_core::access::Audience;
use hub_core::analytics::AnalyticsWindow;
use hub_core::entities::User;
use hub_core::enums::{AuditAction, EntityType, LinkStatus};
use hub_db::repos::audit::AuditFilter;
use hub_db::repos::link::{BrowseQuery, NewLink};
use hub_db::service::HubService;
use hub_db::updates::user::UserUpdateBuilder;

async fn seeded() -> HubService {
    HubService::open(&DatabaseConfig::default()).await.unwrap()
}

async fn fixture_user(svc: &HubService, id: &str) -> User {
    svc.get_user(id).await.unwrap()
}

fn all_pages() -> BrowseQuery {
    BrowseQuery {
        per_page: 100,
        ..BrowseQuery::default()
    }
}

#[tokio::test]
async fn file_store_is_seeded_once_across_reopen() {
    let dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        path: dir.path().join("linkhub.db").to_string_lossy().into_owned(),
        seed_fixtures: true,
    };

    let svc = HubService::open(&config).await.unwrap();
    let alex = fixture_user(&svc, "user-1").await;
    let created = svc
        .create_link(
            &alex,
            NewLink {
                title: "Status page".into(),
                url: "https://status.example.com".into(),
                ..NewLink::default()
            },
        )
        .await
        .unwrap();
    drop(svc);

    let reopened = HubService::open(&config).await.unwrap();
    assert_eq!(reopened.list_users().await.unwrap().len(), 3);
    assert_eq!(reopened.list_links().await.unwrap().len(), 18);
    assert_eq!(reopened.get_link(&created.id).await.unwrap(), created);
}

#[tokio::test]
async fn unseeded_config_opens_empty() {
    let svc = HubService::open(&DatabaseConfig {
        seed_fixtures: false,
        ..DatabaseConfig::default()
    })
    .await
    .unwrap();
    assert!(svc.list_users().await.unwrap().is_empty());
    assert!(svc.list_links().await.unwrap().is_empty());
}

#[tokio::test]
async fn submission_moderation_and_click_flow() {
    let svc = seeded().await;
    let alex = fixture_user(&svc, "user-1").await;
    let maria = fixture_user(&svc, "user-2").await;
    let chen = fixture_user(&svc, "user-3").await;

    let link = svc
        .create_link(
            &maria,
            NewLink {
                title: "Backend on-call rota".into(),
                url: "https://pagerduty.example.com/rota".into(),
                category_id: Some("cat-1".into()),
                tags: vec!["oncall".into()],
                audience: Audience::Team {
                    team_ids: vec!["team-2".into()],
                },
                ..NewLink::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(link.status, LinkStatus::Pending);
    assert!(svc.record_click(&maria, &link.id, Utc::now()).await.is_err());

    svc.approve_link(&alex, &link.id).await.unwrap();

    let dashboard = |viewer: User| {
        let svc = &svc;
        async move {
            svc.browse_links(&viewer, &all_pages(), Utc::now())
                .await
                .unwrap()
                .items
                .into_iter()
                .map(|l| l.id)
                .collect::<Vec<_>>()
        }
    };
    assert!(dashboard(maria.clone()).await.contains(&link.id));
    assert!(!dashboard(chen.clone()).await.contains(&link.id));

    let clicked = svc.record_click(&maria, &link.id, Utc::now()).await.unwrap();
    assert_eq!(clicked.clicks, 1);
    assert!(svc.record_click(&chen, &link.id, Utc::now()).await.unwrap_err().is_forbidden());

    svc.update_link_status(&alex, &link.id, LinkStatus::Archived, None)
        .await
        .unwrap();
    assert!(!dashboard(maria.clone()).await.contains(&link.id));
    let mine = svc.my_links(&maria, 1, 50).await.unwrap();
    assert!(mine.items.iter().any(|l| l.id == link.id && l.status == LinkStatus::Archived));

    let trail = svc
        .query_audit(&AuditFilter {
            entity_type: Some(EntityType::Link),
            entity_id: Some(link.id.clone()),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    let actions: Vec<AuditAction> = trail.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::StatusChanged,
            AuditAction::Clicked,
            AuditAction::StatusChanged,
            AuditAction::Created,
        ]
    );
}

#[tokio::test]
async fn moving_a_user_changes_department_visibility() {
    let svc = seeded().await;
    let alex = fixture_user(&svc, "user-1").await;
    let chen = fixture_user(&svc, "user-3").await;
    let now = Utc::now();

    // link-13 is granted to Platform Engineering only.
    assert!(svc.view_link(&chen, "link-13").await.is_err());

    let moved = svc
        .update_user(
            &alex,
            "user-3",
            UserUpdateBuilder::new()
                .department_id("dept-1-1")
                .team_id("team-2")
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(svc.view_link(&moved, "link-13").await.unwrap().id, "link-13");

    // The Technology grant on link-9 reaches the sub-department too.
    let visible = svc.browse_links(&moved, &all_pages(), now).await.unwrap();
    assert!(visible.items.iter().any(|l| l.id == "link-9"));
    assert!(visible.items.iter().all(|l| l.id != "link-3"));
}

#[tokio::test]
async fn expired_links_stay_in_analytics_but_leave_the_dashboard() {
    let svc = seeded().await;
    let alex = fixture_user(&svc, "user-1").await;
    let now = Utc::now();

    let link = svc
        .create_link(
            &alex,
            NewLink {
                title: "Hackathon signup".into(),
                url: "https://forms.example.com/hack".into(),
                expires_at: Some(now + Duration::minutes(5)),
                ..NewLink::default()
            },
        )
        .await
        .unwrap();
    svc.record_click(&alex, &link.id, now).await.unwrap();

    let later = now + Duration::minutes(10);
    assert!(svc.record_click(&alex, &link.id, later).await.is_err());
    let shown = svc.browse_links(&alex, &all_pages(), later).await.unwrap();
    assert!(shown.items.iter().all(|l| l.id != link.id));

    let report = svc
        .analytics_report(&alex, AnalyticsWindow::default(), now.date_naive())
        .await
        .unwrap();
    assert_eq!(report.summary.total_links, 18);
    assert_eq!(report.summary.total_clicks, 501);
    assert_eq!(report.recent_activity[0].link_id, link.id);
}
