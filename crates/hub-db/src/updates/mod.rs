//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields generate SET clauses in the dynamic UPDATE SQL, and their names are
//! recorded in the audit detail.

pub mod category;
pub mod department;
pub mod link;
pub mod project;
pub mod team;
pub mod user;

use serde::Serialize;

/// Names of the fields an update sets, sorted.
pub(crate) fn field_names<T: Serialize>(update: &T) -> Vec<String> {
    match serde_json::to_value(update) {
        Ok(serde_json::Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}
