//! Free-text link search, tag parsing, and page slicing.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Link;

/// Case-insensitive substring match over title, description, url, and tags.
/// A blank query matches everything.
#[must_use]
pub fn matches_query(link: &Link, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [&link.title, &link.description, &link.url]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
        || link
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Split a comma-separated tag string, trimming and dropping empties.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Newest first, ties broken by id for a stable order.
pub fn sort_newest_first(links: &mut [Link]) {
    links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

/// One page of a larger result set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually returned.
    pub page: u32,
    pub per_page: u32,
    pub total_items: u32,
    pub total_pages: u32,
}

/// Slice `items` into page `page` (1-based). Out-of-range pages clamp to the
/// last page; a zero page size is treated as one.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = u32::try_from(items.len()).unwrap_or(u32::MAX);
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = ((page - 1) * per_page) as usize;
    let items = items
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();
    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Audience;
    use crate::enums::LinkStatus;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn link(id: &str, day: u32) -> Link {
        Link {
            id: id.into(),
            title: "React Documentation".into(),
            url: "https://react.dev/".into(),
            short_url: "lh.co/react".into(),
            description: "The official documentation for the React library.".into(),
            status: LinkStatus::Approved,
            clicks: 0,
            creator_id: "user-1".into(),
            category_id: "cat-1".into(),
            tags: vec!["frontend".into(), "Docs".into()],
            audience: Audience::Public,
            created_at: Utc.with_ymd_and_hms(2024, 5, day, 10, 0, 0).unwrap(),
            approved_at: None,
            expires_at: None,
            max_clicks: None,
        }
    }

    #[test]
    fn query_matches_any_field_ignoring_case() {
        let l = link("link-1", 20);
        assert!(matches_query(&l, "REACT"));
        assert!(matches_query(&l, "official"));
        assert!(matches_query(&l, "react.dev"));
        assert!(matches_query(&l, "docs"));
        assert!(matches_query(&l, "  "));
        assert!(!matches_query(&l, "figma"));
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        assert_eq!(parse_tags(" urgent, frontend,,docs ,urgent"), vec!["urgent", "frontend", "docs"]);
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn newest_first() {
        let mut links = vec![link("link-a", 10), link("link-b", 20), link("link-c", 15)];
        sort_newest_first(&mut links);
        let order: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, vec!["link-b", "link-c", "link-a"]);
    }

    #[test]
    fn pages_slice_and_clamp() {
        let items: Vec<u32> = (1..=25).collect();
        let second = paginate(items.clone(), 2, 12);
        assert_eq!(second.items, (13..=24).collect::<Vec<_>>());
        assert_eq!(second.total_pages, 3);

        let beyond = paginate(items, 9, 12);
        assert_eq!(beyond.page, 3);
        assert_eq!(beyond.items, vec![25]);
    }

    #[test]
    fn empty_result_is_page_one() {
        let page = paginate(Vec::<u32>::new(), 4, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }
}
