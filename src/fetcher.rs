use std::net::Ipv6Addr;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{error, info, warn};
use url::{Host, Url};

use crate::aggregator;
use crate::error::SourceError;
use crate::model::{Snapshot, SourceResult};
use crate::upstream::Upstream;

/// What to do with a source whose feed loaded but whose favicon did not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconPolicy {
    /// Drop the whole source.
    #[default]
    Required,
    /// Keep the feed and serve an empty favicon.
    Optional,
}

impl IconPolicy {
    fn resolve(self, icon: Result<Vec<u8>, SourceError>) -> Result<String, SourceError> {
        match (icon, self) {
            (Ok(bytes), _) => Ok(STANDARD.encode(bytes)),
            (Err(e), IconPolicy::Required) => Err(e),
            (Err(e), IconPolicy::Optional) => {
                warn!(url = e.url(), error = %e, "Serving feed without favicon");
                Ok(String::new())
            }
        }
    }
}

/// Builds the favicon location for a host.
pub fn favicon_url(host: &str) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("https://[{}]/favicon.ico", host)
    } else {
        format!("https://{}/favicon.ico", host)
    }
}

/// Hostname component of a source URL. IPv6 literals come back without
/// their brackets.
pub fn extract_host(source: &str) -> Result<String, SourceError> {
    let parsed = Url::parse(source).map_err(|e| SourceError::UrlParse {
        url: source.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.host() {
        Some(Host::Ipv6(addr)) => Ok(addr.to_string()),
        Some(host) => Ok(host.to_string()),
        None => Err(SourceError::UrlParse {
            url: source.to_string(),
            reason: "no host component".to_string(),
        }),
    }
}

#[derive(Clone)]
pub struct Fetcher {
    upstream: Arc<dyn Upstream>,
    icon_policy: IconPolicy,
}

impl Fetcher {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self::with_icon_policy(upstream, IconPolicy::default())
    }

    pub fn with_icon_policy(upstream: Arc<dyn Upstream>, icon_policy: IconPolicy) -> Self {
        Self {
            upstream,
            icon_policy,
        }
    }

    /// Fetch every source concurrently and merge the results.
    ///
    /// One task per source, no concurrency cap. Returns only after every task
    /// has finished. Failed sources are logged and left out.
    pub async fn fetch_all(&self, sources: &[String]) -> Snapshot {
        info!("Fetching {} sources", sources.len());

        let handles: Vec<_> = sources
            .iter()
            .map(|source| {
                let worker = self.clone();
                let source = source.clone();
                tokio::spawn(async move { worker.fetch_source(&source).await })
            })
            .collect();

        // join_all keeps handle order, so slot i belongs to sources[i]
        let joined = futures::future::join_all(handles).await;

        let slots = joined
            .into_iter()
            .zip(sources)
            .map(|(outcome, source)| match outcome {
                Ok(Ok(result)) => Some(result),
                Ok(Err(e)) => {
                    warn!(source = %source, error = %e, "Dropping source");
                    None
                }
                Err(e) => {
                    error!(source = %source, error = %e, "Source task aborted");
                    None
                }
            })
            .collect();

        let snapshot = aggregator::merge(slots);
        info!(
            "Fetched {} of {} sources ({} failed)",
            snapshot.len(),
            sources.len(),
            snapshot.failed
        );
        snapshot
    }

    /// Produce the result for a single source. No retries.
    pub async fn fetch_source(&self, source: &str) -> Result<SourceResult, SourceError> {
        let items = self
            .upstream
            .fetch_feed(source)
            .await
            .map_err(|e| SourceError::FeedRetrieval {
                url: source.to_string(),
                reason: e.to_string(),
            })?;

        let host = extract_host(source)?;

        let icon_url = favicon_url(&host);
        let icon = self
            .upstream
            .fetch_bytes(&icon_url)
            .await
            .map_err(|e| SourceError::IconRetrieval {
                url: icon_url.clone(),
                reason: e.to_string(),
            });
        let favicon = self.icon_policy.resolve(icon)?;

        Ok(SourceResult {
            host,
            favicon,
            items,
        })
    }
}
