//! Page fetcher backed by a JSON fixture document
//!
//! ```json
//! {
//!   "latency_ms": 50,
//!   "first": { "items": [...], "next_cursor": "c2", "is_last": false },
//!   "pages": {
//!     "c2": { "items": [...], "next_cursor": null, "is_last": true },
//!     "c3": { "error": { "kind": "network", "reason": "timed out" } }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr};
use serde::{de::DeserializeOwned, Deserialize};
use tokio::time;

use crate::{
    core::fetcher::PageFetcher,
    domain::{
        error::FetchError,
        page::{Page, PageRequest},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FailureKind {
    Network,
    Auth,
    Server,
}

#[derive(Debug, Clone, Deserialize)]
struct Failure {
    kind: FailureKind,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    status: Option<u16>,
}

impl From<Failure> for FetchError {
    fn from(failure: Failure) -> Self {
        match failure.kind {
            FailureKind::Network => FetchError::network(failure.reason),
            FailureKind::Auth => FetchError::auth(failure.reason),
            FailureKind::Server => FetchError::server(failure.status, failure.reason),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Entry<T> {
    Failure { error: Failure },
    Page(Page<T>),
}

#[derive(Debug, Clone, Deserialize)]
struct Document<T> {
    #[serde(default)]
    latency_ms: u64,
    first: Entry<T>,
    #[serde(default = "HashMap::new")]
    pages: HashMap<String, Entry<T>>,
}

/// Serves pages from a fixture, keyed by the verbatim cursor string
#[derive(Debug, Clone)]
pub struct FixtureFetcher<T> {
    document: Document<T>,
}

impl<T: DeserializeOwned> FixtureFetcher<T> {
    pub fn from_json(json: &str) -> Result<Self> {
        let document = serde_json::from_str(json).wrap_err("invalid fixture document")?;
        Ok(Self { document })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read fixture {}", path.display()))?;
        Self::from_json(&json).wrap_err_with(|| format!("in fixture {}", path.display()))
    }
}

impl<T> FixtureFetcher<T> {
    /// Delay every response, overriding `latency_ms` from the document
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.document.latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

#[async_trait]
impl<T> PageFetcher<T> for FixtureFetcher<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn fetch(&self, request: PageRequest) -> Result<Page<T>, FetchError> {
        if self.document.latency_ms > 0 {
            time::sleep(Duration::from_millis(self.document.latency_ms)).await;
        }

        let entry = match &request.cursor {
            None => &self.document.first,
            Some(cursor) => self.document.pages.get(cursor.as_str()).ok_or_else(|| {
                FetchError::server(Some(404), format!("unknown cursor {cursor}"))
            })?,
        };

        match entry {
            Entry::Failure { error } => Err(error.clone().into()),
            Entry::Page(page) => {
                let mut page = page.clone();
                if page.items.len() > request.page_size.get() {
                    log::warn!(
                        "fixture page has {} items, more than the requested {}",
                        page.items.len(),
                        request.page_size
                    );
                    page.items.truncate(request.page_size.get());
                }
                Ok(page)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::{
        page::{Cursor, PageSize},
        reading::Room,
    };

    const ROOMS: &str = r#"{
        "first": {
            "items": [{"id": "r1", "title": "Dune"}, {"id": "r2", "title": "Emma"}],
            "next_cursor": "p2"
        },
        "pages": {
            "p2": {"items": [{"id": "r3", "title": "Ulysses", "status": "finished"}], "is_last": true},
            "boom": {"error": {"kind": "server", "status": 503, "reason": "maintenance"}}
        }
    }"#;

    fn fetcher() -> FixtureFetcher<Room> {
        FixtureFetcher::from_json(ROOMS).expect("valid fixture")
    }

    #[tokio::test]
    async fn test_first_page() {
        let page = fetcher()
            .fetch(PageRequest::first(PageSize::DEFAULT))
            .await
            .expect("first page");

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_cursor, Some(Cursor::from("p2")));
        assert!(!page.is_last);
    }

    #[tokio::test]
    async fn test_cursor_lookup_is_verbatim() {
        let page = fetcher()
            .fetch(PageRequest::after(Cursor::from("p2"), PageSize::DEFAULT))
            .await
            .expect("second page");
        assert!(page.is_last);
        assert_eq!(page.items[0].title, "Ulysses");

        let err = fetcher()
            .fetch(PageRequest::after(Cursor::from("P2"), PageSize::DEFAULT))
            .await
            .expect_err("cursor is case sensitive");
        assert_eq!(err, FetchError::server(Some(404), "unknown cursor P2"));
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let err = fetcher()
            .fetch(PageRequest::after(Cursor::from("boom"), PageSize::DEFAULT))
            .await
            .expect_err("scripted failure");
        assert_eq!(err, FetchError::server(Some(503), "maintenance"));
    }

    #[tokio::test]
    async fn test_page_is_capped_at_page_size() {
        let page = fetcher()
            .fetch(PageRequest::first(PageSize::new(1).expect("non-zero")))
            .await
            .expect("first page");
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_invalid_document() {
        assert!(FixtureFetcher::<Room>::from_json(r#"{"pages": {}}"#).is_err());
    }
}
