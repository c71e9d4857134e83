use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One article as served to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub description: String,
}

/// Everything one source contributed to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceResult {
    pub host: String,
    /// Base64 text of the bytes served at `https://<host>/favicon.ico`
    pub favicon: String,
    pub items: Vec<FeedEntry>,
}

/// The merged result of one refresh cycle.
///
/// Snapshots are never mutated after creation; the cache swaps in a new one.
/// On the wire a snapshot is just its array of source results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    /// Source results in configuration order
    pub feeds: Vec<SourceResult>,
    #[serde(skip)]
    pub captured_at: DateTime<Utc>,
    /// Number of configured sources that were dropped during the refresh
    #[serde(skip)]
    pub failed: usize,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            feeds: Vec::new(),
            captured_at: DateTime::<Utc>::UNIX_EPOCH,
            failed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}
