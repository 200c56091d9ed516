//! Page and cursor types shared by fetchers and the list engine

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Opaque continuation token handed out by the server.
///
/// The engine never inspects the contents; it is stored and passed back
/// verbatim on the next request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Number of items requested per page. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub const DEFAULT: PageSize = PageSize(match NonZeroUsize::new(20) {
        Some(n) => n,
        None => unreachable!(),
    });

    /// Returns `None` for zero.
    pub fn new(size: usize) -> Option<Self> {
        NonZeroUsize::new(size).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size).ok_or_else(|| "page size must be greater than zero".to_string())
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input to a single page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// `None` asks for the first page
    pub cursor: Option<Cursor>,
    pub page_size: PageSize,
}

impl PageRequest {
    pub fn first(page_size: PageSize) -> Self {
        Self {
            cursor: None,
            page_size,
        }
    }

    pub fn after(cursor: Cursor, page_size: PageSize) -> Self {
        Self {
            cursor: Some(cursor),
            page_size,
        }
    }

    pub fn is_first(&self) -> bool {
        self.cursor.is_none()
    }
}

/// One fetched batch of items plus pagination metadata.
///
/// Produced by a fetcher and consumed exactly once by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<Cursor>,
    #[serde(default)]
    pub is_last: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<Cursor>, is_last: bool) -> Self {
        Self {
            items,
            next_cursor,
            is_last,
        }
    }

    /// A page that ends the result set
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None, true)
    }

    /// Whether more data may follow this page.
    ///
    /// An empty page counts as the end even if the server did not say so.
    pub fn claims_more(&self) -> bool {
        !self.is_last && !self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_page_size_rejects_zero() {
        assert_eq!(PageSize::new(0), None);
        assert_eq!(PageSize::new(3).map(PageSize::get), Some(3));
        assert_eq!(PageSize::default().get(), 20);
    }

    #[test]
    fn test_page_size_deserialize() {
        let size: PageSize = serde_json::from_str("15").expect("valid page size");
        assert_eq!(size.get(), 15);
        assert!(serde_json::from_str::<PageSize>("0").is_err());
    }

    #[rstest]
    #[case(vec![1, 2], false, true)]
    #[case(vec![1, 2], true, false)]
    #[case(vec![], false, false)]
    #[case(vec![], true, false)]
    fn test_claims_more(#[case] items: Vec<u32>, #[case] is_last: bool, #[case] expected: bool) {
        let page = Page::new(items, Some(Cursor::from("next")), is_last);
        assert_eq!(page.claims_more(), expected);
    }

    #[test]
    fn test_page_deserialize_defaults() {
        let page: Page<u32> = serde_json::from_str(r#"{"items":[1,2,3]}"#).expect("valid page");
        assert_eq!(page, Page::new(vec![1, 2, 3], None, false));

        let page: Page<u32> =
            serde_json::from_str(r#"{"items":[],"next_cursor":"abc","is_last":true}"#)
                .expect("valid page");
        assert_eq!(page.next_cursor, Some(Cursor::from("abc")));
        assert!(page.is_last);
    }

    #[test]
    fn test_cursor_is_round_tripped_verbatim() {
        let raw = "eyJvZmZzZXQiOjQwfQ==";
        let request = PageRequest::after(Cursor::from(raw), PageSize::DEFAULT);
        assert!(!request.is_first());
        assert_eq!(request.cursor.as_ref().map(Cursor::as_str), Some(raw));
    }
}
