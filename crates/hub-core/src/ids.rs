//! ID prefix constants and short-link formatting.
//!
//! Ids are `{prefix}-{8 hex chars}`; the random part is generated by the
//! database (`HubDb::generate_id`). Fixture records keep their historical ids.

pub const PREFIX_LINK: &str = "link";
pub const PREFIX_USER: &str = "user";
pub const PREFIX_DEPARTMENT: &str = "dept";
pub const PREFIX_TEAM: &str = "team";
pub const PREFIX_PROJECT: &str = "proj";
pub const PREFIX_CATEGORY: &str = "cat";
pub const PREFIX_CLICK: &str = "click";
pub const PREFIX_AUDIT: &str = "aud";

/// Host used for generated short links.
pub const SHORT_LINK_HOST: &str = "lh.co";

/// Format a short link from its random code.
#[must_use]
pub fn short_url(code: &str) -> String {
    format!("{SHORT_LINK_HOST}/{code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_url_uses_host() {
        assert_eq!(short_url("a1b2c3d4"), "lh.co/a1b2c3d4");
    }
}
