use thiserror::Error;

/// Reasons a single source is left out of a snapshot.
///
/// None of these reach the caller of the cache; they are logged and the
/// source is skipped.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to fetch feed {url}: {reason}")]
    FeedRetrieval { url: String, reason: String },

    #[error("failed to extract host from {url}: {reason}")]
    UrlParse { url: String, reason: String },

    #[error("failed to fetch favicon {url}: {reason}")]
    IconRetrieval { url: String, reason: String },
}

impl SourceError {
    pub fn url(&self) -> &str {
        match self {
            SourceError::FeedRetrieval { url, .. }
            | SourceError::UrlParse { url, .. }
            | SourceError::IconRetrieval { url, .. } => url,
        }
    }
}
