use chrono::Utc;

use crate::model::{Snapshot, SourceResult};

/// Merge per-source slots into a snapshot.
///
/// `slots` is indexed by source position, so the output follows the
/// configured source order no matter when each worker finished. Empty slots
/// are sources that failed and are counted in `Snapshot::failed`.
pub fn merge(slots: Vec<Option<SourceResult>>) -> Snapshot {
    let attempted = slots.len();
    let feeds: Vec<SourceResult> = slots.into_iter().flatten().collect();

    Snapshot {
        failed: attempted - feeds.len(),
        feeds,
        captured_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(host: &str) -> SourceResult {
        SourceResult {
            host: host.to_string(),
            favicon: String::new(),
            items: Vec::new(),
        }
    }

    fn hosts(snapshot: &Snapshot) -> Vec<&str> {
        snapshot.feeds.iter().map(|f| f.host.as_str()).collect()
    }

    #[test]
    fn test_merge_keeps_slot_order() {
        let snapshot = merge(vec![Some(result("a")), Some(result("b")), Some(result("c"))]);

        assert_eq!(hosts(&snapshot), vec!["a", "b", "c"]);
        assert_eq!(snapshot.failed, 0);
    }

    #[test]
    fn test_merge_skips_failed_slots() {
        let snapshot = merge(vec![Some(result("a")), None, Some(result("c")), None]);

        assert_eq!(hosts(&snapshot), vec!["a", "c"]);
        assert_eq!(snapshot.failed, 2);
    }

    #[test]
    fn test_merge_all_failed() {
        let snapshot = merge(vec![None, None]);

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.failed, 2);
    }

    #[test]
    fn test_merge_no_sources() {
        let snapshot = merge(Vec::new());

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.failed, 0);
    }
}
