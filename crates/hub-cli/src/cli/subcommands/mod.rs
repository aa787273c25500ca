pub mod auth;
pub mod category;
pub mod department;
pub mod link;
pub mod project;
pub mod team;
pub mod user;

pub use auth::AuthCommands;
pub use category::CategoryCommands;
pub use department::DepartmentCommands;
pub use link::LinkCommands;
pub use project::ProjectCommands;
pub use team::TeamCommands;
pub use user::UserCommands;
