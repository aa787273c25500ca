//! Row-to-entity parsing helpers.
//!
//! Datetimes are written with `to_rfc3339()` but columns defaulted by
//! `datetime('now')` use SQLite's `"YYYY-MM-DD HH:MM:SS"`; both are accepted.

use chrono::{DateTime, Utc};
use hub_core::entities::UNKNOWN_ORG_ID;
use hub_core::enums::EntityType;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string matches neither format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a `snake_case` serde enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and `""`.
///
/// `row.get::<String>(idx)` on a NULL column is an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Read a non-negative INTEGER column as `u64`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for negative values.
pub fn get_u64(row: &libsql::Row, idx: i32) -> Result<u64, DatabaseError> {
    let value = row.get::<i64>(idx)?;
    u64::try_from(value)
        .map_err(|_| DatabaseError::Query(format!("column {idx} is negative: {value}")))
}

/// # Errors
///
/// Returns `DatabaseError::Query` for negative values.
pub fn get_opt_u64(row: &libsql::Row, idx: i32) -> Result<Option<u64>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|value| {
            u64::try_from(value)
                .map_err(|_| DatabaseError::Query(format!("column {idx} is negative: {value}")))
        })
        .transpose()
}

/// Convert a counter for binding. Values past `i64::MAX` saturate.
#[must_use]
pub fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Blank org ids are stored as [`UNKNOWN_ORG_ID`].
#[must_use]
pub fn org_id_or_unknown(id: Option<&str>) -> String {
    id.map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(UNKNOWN_ORG_ID)
        .to_string()
}

/// Map `EntityType` to its SQL table. Exhaustive so new variants must be added.
#[must_use]
pub const fn entity_type_to_table(entity: EntityType) -> &'static str {
    match entity {
        EntityType::Link => "links",
        EntityType::User => "users",
        EntityType::Department => "departments",
        EntityType::Team => "teams",
        EntityType::Project => "projects",
        EntityType::Category => "categories",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_core::enums::LinkStatus;

    #[test]
    fn parses_both_datetime_formats() {
        let a = parse_datetime("2024-05-20T10:00:00Z").unwrap();
        let b = parse_datetime("2024-05-20 10:00:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("20 May 2024").is_err());
    }

    #[test]
    fn optional_datetime_treats_empty_as_none() {
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
        assert_eq!(parse_optional_datetime(None).unwrap(), None);
    }

    #[test]
    fn parses_snake_case_enums() {
        let status: LinkStatus = parse_enum("archived").unwrap();
        assert_eq!(status, LinkStatus::Archived);
        assert!(parse_enum::<LinkStatus>("Archived").is_err());
    }

    #[test]
    fn blank_org_ids_become_unknown() {
        assert_eq!(org_id_or_unknown(None), UNKNOWN_ORG_ID);
        assert_eq!(org_id_or_unknown(Some("  ")), UNKNOWN_ORG_ID);
        assert_eq!(org_id_or_unknown(Some("dept-2")), "dept-2");
    }

    #[test]
    fn counters_saturate_when_bound() {
        assert_eq!(to_sql_int(7), 7);
        assert_eq!(to_sql_int(u64::MAX), i64::MAX);
    }
}
