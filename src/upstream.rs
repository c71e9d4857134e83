use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use tracing::debug;

use crate::model::FeedEntry;

/// Network capabilities the fetcher depends on.
///
/// The production implementation is [`HttpUpstream`]; tests substitute
/// in-memory versions.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Retrieve the feed at `url` and return its entries in feed order.
    async fn fetch_feed(&self, url: &str) -> anyhow::Result<Vec<FeedEntry>>;

    /// Plain GET returning the raw response body.
    async fn fetch_bytes(&self, url: &str) -> anyhow::Result<Vec<u8>>;
}

pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("NewsFanout/1.0 (Feed Aggregator)")
            .build()?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn get(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Parse a feed document into entries, keeping document order.
    pub fn parse_entries(body: &[u8]) -> anyhow::Result<Vec<FeedEntry>> {
        let parsed = parser::parse(body)?;
        Ok(parsed.entries.iter().map(Self::project_entry).collect())
    }

    pub fn project_entry(entry: &feed_rs::model::Entry) -> FeedEntry {
        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default();

        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        // Atom feeds often carry the body in <content> with no <summary>
        let description = entry
            .summary
            .as_ref()
            .map(|s| s.content.clone())
            .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
            .unwrap_or_default();

        FeedEntry {
            title,
            link,
            description,
        }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch_feed(&self, url: &str) -> anyhow::Result<Vec<FeedEntry>> {
        let body = self.get(url).await?;
        let entries = Self::parse_entries(&body)?;
        debug!(url, count = entries.len(), "parsed feed");
        Ok(entries)
    }

    async fn fetch_bytes(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        self.get(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_entries_tests {
        use super::*;

        #[test]
        fn test_rss_items_in_document_order() {
            let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <item>
      <title>First</title>
      <link>https://example.com/1</link>
      <description>First description</description>
    </item>
    <item>
      <title>Second</title>
      <link>https://example.com/2</link>
      <description>Second description</description>
    </item>
    <item>
      <title>Third</title>
      <link>https://example.com/3</link>
    </item>
  </channel>
</rss>"#;

            let entries = HttpUpstream::parse_entries(xml.as_bytes()).unwrap();

            assert_eq!(entries.len(), 3);
            assert_eq!(entries[0].title, "First");
            assert_eq!(entries[0].link, "https://example.com/1");
            assert_eq!(entries[0].description, "First description");
            assert_eq!(entries[1].title, "Second");
            assert_eq!(entries[2].title, "Third");
            assert_eq!(entries[2].description, "");
        }

        #[test]
        fn test_atom_content_used_when_summary_missing() {
            let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <id>urn:feed</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <title>Atom Entry</title>
    <id>urn:entry:1</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <link href="https://example.org/entry/1"/>
    <content type="text">Full body</content>
  </entry>
</feed>"#;

            let entries = HttpUpstream::parse_entries(xml.as_bytes()).unwrap();

            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].title, "Atom Entry");
            assert_eq!(entries[0].link, "https://example.org/entry/1");
            assert_eq!(entries[0].description, "Full body");
        }

        #[test]
        fn test_missing_fields_become_empty() {
            let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Sparse</title>
    <item>
      <guid>only-guid</guid>
    </item>
  </channel>
</rss>"#;

            let entries = HttpUpstream::parse_entries(xml.as_bytes()).unwrap();

            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].title, "");
            assert_eq!(entries[0].link, "");
            assert_eq!(entries[0].description, "");
        }

        #[test]
        fn test_garbage_is_an_error() {
            let result = HttpUpstream::parse_entries(b"this is not a feed");
            assert!(result.is_err());
        }
    }
}
