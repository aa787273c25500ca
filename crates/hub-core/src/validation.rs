//! Input checks shared by every write path.

use crate::errors::CoreError;

/// Placeholder url used by links whose target is not public yet.
pub const PLACEHOLDER_URL: &str = "#";

/// Trim `value` and reject it when blank.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming `field` when the value is blank.
pub fn require(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Link targets are absolute http(s) urls or the `#` placeholder.
///
/// # Errors
///
/// Returns `CoreError::Validation` for blank or non-http urls.
pub fn link_url(value: &str) -> Result<String, CoreError> {
    let url = require("url", value)?;
    let lower = url.to_ascii_lowercase();
    let has_host = |scheme: &str| lower.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty());
    if url == PLACEHOLDER_URL || has_host("http://") || has_host("https://") {
        Ok(url)
    } else {
        Err(CoreError::Validation(format!(
            "url must start with http:// or https:// (or be '{PLACEHOLDER_URL}'): {url}"
        )))
    }
}

/// A minimal shape check: one `@` with text on both sides.
///
/// # Errors
///
/// Returns `CoreError::Validation` for blank or malformed addresses.
pub fn email(value: &str) -> Result<String, CoreError> {
    let email = require("email", value)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(CoreError::Validation(format!("invalid email address: {email}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://react.dev/")]
    #[case("http://intranet.local/wiki")]
    #[case("HTTPS://EXAMPLE.COM")]
    #[case("#")]
    #[case("  https://padded.example  ")]
    fn accepted_urls(#[case] url: &str) {
        assert!(link_url(url).is_ok(), "{url} should be accepted");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("ftp://files.example")]
    #[case("react.dev")]
    #[case("https://")]
    #[case("javascript:alert(1)")]
    fn rejected_urls(#[case] url: &str) {
        assert!(link_url(url).is_err(), "{url} should be rejected");
    }

    #[test]
    fn require_trims() {
        assert_eq!(require("name", "  Sales ").unwrap(), "Sales");
        let err = require("name", " ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: name is required");
    }

    #[test]
    fn email_shape() {
        assert!(email("chen.w@company.com").is_ok());
        assert!(email("chen.w").is_err());
        assert!(email("@company.com").is_err());
        assert!(email("a@b@c").is_err());
    }
}
