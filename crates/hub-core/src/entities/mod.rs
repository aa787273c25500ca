//! Entity structs for the LinkHub directory.
//!
//! Each entity maps to a table in the libSQL store (see `hub-db/migrations`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! output and schema validation.

mod audit;
mod click;
mod link;
mod org;
mod user;

pub use audit::AuditEntry;
pub use click::ClickLog;
pub use link::Link;
pub use org::{Category, Department, Project, Team, TeamAffiliation};
pub use user::{UNKNOWN_ORG_ID, User};
