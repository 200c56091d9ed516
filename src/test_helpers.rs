//! Shared fixtures for unit and integration tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::{watch, Semaphore};

use crate::{
    core::fetcher::PageFetcher,
    domain::{
        collections::Identified,
        error::FetchError,
        page::{Cursor, Page, PageRequest},
    },
};

/// Minimal list item keyed by its id string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestItem {
    pub id: String,
}

impl TestItem {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }

    pub fn page(ids: &[&str], next: Option<&str>, is_last: bool) -> Page<TestItem> {
        Page::new(
            ids.iter().map(|id| Self::new(id)).collect(),
            next.map(Cursor::from),
            is_last,
        )
    }

    pub fn ids(items: &[TestItem]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }
}

impl Identified for TestItem {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// A fetcher that answers from a queue of scripted responses.
///
/// Every call is recorded before it is answered. A gated fetcher holds each
/// call open until [`ScriptedFetcher::release`] lets it through, which makes
/// "fetch in flight" states reproducible.
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<Page<TestItem>, FetchError>>>,
    requests: Mutex<Vec<PageRequest>>,
    calls: watch::Sender<usize>,
    gate: Option<Semaphore>,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(None))
    }

    /// Calls block until released
    pub fn gated() -> Arc<Self> {
        Arc::new(Self::build(Some(Semaphore::new(0))))
    }

    fn build(gate: Option<Semaphore>) -> Self {
        let (calls, _) = watch::channel(0);
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls,
            gate,
        }
    }

    pub fn push_page(&self, page: Page<TestItem>) {
        self.lock_responses().push_back(Ok(page));
    }

    pub fn push_error(&self, error: FetchError) {
        self.lock_responses().push_back(Err(error));
    }

    /// Let `n` held calls complete
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.borrow()
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolves once at least `n` calls have been made
    pub async fn wait_for_calls(&self, n: usize) {
        let mut rx = self.calls.subscribe();
        let _ = rx.wait_for(|calls| *calls >= n).await;
    }

    fn lock_responses(&self) -> MutexGuard<'_, VecDeque<Result<Page<TestItem>, FetchError>>> {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PageFetcher<TestItem> for ScriptedFetcher {
    async fn fetch(&self, request: PageRequest) -> Result<Page<TestItem>, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.calls.send_modify(|calls| *calls += 1);

        if let Some(gate) = &self.gate {
            match gate.acquire().await {
                Ok(permit) => permit.forget(),
                Err(_) => return Err(FetchError::network("gate closed")),
            }
        }

        self.lock_responses()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::server(Some(404), "no scripted response left")))
    }
}
