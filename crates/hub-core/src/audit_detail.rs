//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! give the common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Detail for `AuditAction::Updated`: names of the fields that changed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UpdatedDetail {
    pub fields: Vec<String>,
}

/// Detail for `AuditAction::Clicked`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClickedDetail {
    pub click_id: String,
    pub total_clicks: u64,
}

/// Detail for `AuditAction::LoggedIn`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LoggedInDetail {
    pub provider: String,
    pub email: String,
    /// False when the identity did not match a directory user.
    pub matched_directory: bool,
}
