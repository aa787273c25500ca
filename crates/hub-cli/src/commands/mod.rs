pub mod analytics;
pub mod audit;
pub mod auth;
pub mod category;
pub mod department;
pub mod dispatch;
pub mod link;
pub mod project;
pub mod schema;
pub mod shared;
pub mod team;
pub mod user;
