//! Shared test utilities for hub-db.

#[cfg(test)]
pub(crate) mod helpers {
    use hub_core::entities::User;
    use hub_core::enums::UserRole;

    use crate::HubDb;
    use crate::service::HubService;

    /// Empty in-memory store.
    pub async fn test_service() -> HubService {
        let db = HubDb::open_local(":memory:").await.unwrap();
        HubService::from_db(db)
    }

    /// In-memory store loaded with the fixture directory.
    pub async fn seeded_service() -> HubService {
        let svc = test_service().await;
        svc.seed_directory().await.unwrap();
        svc
    }

    pub fn user(id: &str, role: UserRole, department_id: &str, team_id: &str) -> User {
        User {
            id: id.into(),
            name: id.into(),
            email: format!("{id}@company.com"),
            avatar: String::new(),
            role,
            department_id: department_id.into(),
            team_id: team_id.into(),
        }
    }

    /// Alex Johnson in the fixtures: admin, Technology / Frontend.
    pub fn admin() -> User {
        user("user-1", UserRole::Admin, "dept-1", "team-1")
    }

    /// Maria Garcia in the fixtures: Technology / Backend.
    pub fn maria() -> User {
        user("user-2", UserRole::User, "dept-1", "team-2")
    }

    /// Chen Wei in the fixtures: Business / Sales.
    pub fn chen() -> User {
        user("user-3", UserRole::User, "dept-2", "team-3")
    }
}
