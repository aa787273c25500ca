use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse an RFC 3339 instant such as `2026-01-31T18:00:00Z`.
pub fn parse_instant(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use hub_core::enums::{AuditAction, UserRole, VisibilityMode};

    use super::*;

    #[test]
    fn parses_snake_case_enum() {
        let mode: VisibilityMode = parse_enum("department", "visibility").unwrap();
        assert_eq!(mode, VisibilityMode::Department);
        let role: UserRole = parse_enum("Admin", "role").unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let action: AuditAction = parse_enum("status-changed", "action").unwrap();
        assert_eq!(action, AuditAction::StatusChanged);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<VisibilityMode>("secret", "visibility").unwrap_err();
        assert!(err.to_string().contains("invalid visibility 'secret'"));
    }

    #[test]
    fn instants_keep_their_offset() {
        let at = parse_instant("2026-01-31T20:00:00+02:00", "expires-at").unwrap();
        assert_eq!(at.to_rfc3339(), "2026-01-31T18:00:00+00:00");
        assert!(parse_instant("tomorrow", "expires-at").is_err());
    }
}
