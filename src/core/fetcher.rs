use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    error::FetchError,
    page::{Page, PageRequest},
};

/// Source of pages for one list.
///
/// Implementations must pass `request.cursor` to the server verbatim and
/// report transport timeouts as [`FetchError::Network`].
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch(&self, request: PageRequest) -> Result<Page<T>, FetchError>;
}

#[async_trait]
impl<T, F> PageFetcher<T> for Arc<F>
where
    F: PageFetcher<T> + ?Sized,
    T: Send + 'static,
{
    async fn fetch(&self, request: PageRequest) -> Result<Page<T>, FetchError> {
        (**self).fetch(request).await
    }
}
