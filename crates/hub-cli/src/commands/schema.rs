use hub_core::analytics::AnalyticsReport;
use hub_core::entities::{AuditEntry, Category, ClickLog, Department, Link, Project, Team, User};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Entity names accepted by `linkhub schema`.
pub const SCHEMA_TYPES: &[&str] = &[
    "link",
    "user",
    "department",
    "team",
    "project",
    "category",
    "click",
    "audit",
    "analytics",
];

/// JSON Schema of the named entity type.
pub fn schema_of(type_name: &str) -> anyhow::Result<serde_json::Value> {
    let schema = match type_name.trim().to_ascii_lowercase().as_str() {
        "link" => schema_for!(Link),
        "user" => schema_for!(User),
        "department" => schema_for!(Department),
        "team" => schema_for!(Team),
        "project" => schema_for!(Project),
        "category" => schema_for!(Category),
        "click" => schema_for!(ClickLog),
        "audit" => schema_for!(AuditEntry),
        "analytics" => schema_for!(AnalyticsReport),
        other => anyhow::bail!(
            "unknown schema type '{other}' (expected one of: {})",
            SCHEMA_TYPES.join(", ")
        ),
    };
    Ok(serde_json::to_value(schema)?)
}

/// Handle `linkhub schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_of(&args.type_name)?, flags.format)
}

#[cfg(test)]
mod tests {
    use hub_core::access::Audience;
    use hub_core::enums::LinkStatus;

    use super::*;

    #[test]
    fn every_listed_type_has_a_schema() {
        for name in SCHEMA_TYPES {
            let schema = schema_of(name).unwrap();
            assert!(schema.get("title").is_some(), "{name}");
        }
        assert!(schema_of("widget").is_err());
    }

    #[test]
    fn link_schema_accepts_a_serialized_link() {
        let link = Link {
            id: "link-99".into(),
            title: "Runbook".into(),
            url: "https://wiki.example.com/runbook".into(),
            short_url: "lh.co/runbook".into(),
            description: String::new(),
            status: LinkStatus::Pending,
            clicks: 0,
            creator_id: "user-2".into(),
            category_id: "cat-1".into(),
            tags: vec!["ops".into()],
            audience: Audience::Team {
                team_ids: vec!["team-2".into()],
            },
            created_at: chrono::Utc::now(),
            approved_at: None,
            expires_at: None,
            max_clicks: Some(10),
        };
        let schema = schema_of("Link").unwrap();
        let instance = serde_json::to_value(&link).unwrap();
        let validator = jsonschema::validator_for(&schema).unwrap();
        assert!(validator.is_valid(&instance));

        let mut broken = instance;
        broken["status"] = serde_json::json!("deleted");
        assert!(!validator.is_valid(&broken));
    }
}
