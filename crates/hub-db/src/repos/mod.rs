//! Repository modules. Each adds methods to `HubService` via `impl HubService`.

pub mod analytics;
pub mod audit;
pub mod category;
pub mod click;
pub mod department;
pub mod link;
pub mod project;
pub mod team;
pub mod user;
