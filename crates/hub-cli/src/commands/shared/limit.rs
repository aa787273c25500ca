/// Cap a listing at `--limit` (or the configured default), never below one.
#[must_use]
pub fn effective_limit(global: Option<u32>, fallback: u32) -> usize {
    usize::try_from(global.unwrap_or(fallback).max(1)).unwrap_or(usize::MAX)
}

/// Keep the first `limit` items.
pub fn truncate<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_takes_precedence() {
        assert_eq!(effective_limit(Some(5), 20), 5);
    }

    #[test]
    fn fallback_used_when_flag_missing() {
        assert_eq!(effective_limit(None, 20), 20);
    }

    #[test]
    fn zero_is_raised_to_one() {
        assert_eq!(effective_limit(Some(0), 20), 1);
        assert_eq!(truncate(vec![1, 2, 3], 1), vec![1]);
    }
}
