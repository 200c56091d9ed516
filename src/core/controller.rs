//! Fetch orchestration for one paginated list
//!
//! The controller is the only writer of its [`ListStore`]. It keeps at most
//! one fetch outstanding per list, folds refresh requests that arrive during
//! a fetch into a single follow-up refresh, and turns every fetch failure
//! into list state instead of returning it.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::domain::{
    collections::Identified,
    page::{Cursor, PageRequest, PageSize},
};

use super::{
    fetcher::PageFetcher,
    state::{ListState, LoadKind, MergeOutcome, Message},
    store::ListStore,
};

/// Held for the duration of one fetch.
///
/// Dropping it releases the in-flight flag. If the fetch started but never
/// settled (the future was dropped mid-await), the list is put back to idle
/// so it cannot stay stuck in a loading phase, and a refresh requested
/// meanwhile is handed to a new task.
struct InFlightGuard<'a, T, F>
where
    T: Identified + Clone + Send + Sync + 'static,
    F: PageFetcher<T> + 'static,
{
    inner: &'a Arc<Inner<T, F>>,
    started: Option<LoadKind>,
}

impl<'a, T, F> InFlightGuard<'a, T, F>
where
    T: Identified + Clone + Send + Sync + 'static,
    F: PageFetcher<T> + 'static,
{
    fn acquire(inner: &'a Arc<Inner<T, F>>) -> Option<Self> {
        inner
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self {
                inner,
                started: None,
            })
    }

    fn start(&mut self, kind: LoadKind) -> bool {
        let applied = self
            .inner
            .store
            .apply(|s| s.update(Message::Started(kind)))
            .is_some();
        if applied {
            self.started = Some(kind);
        }
        applied
    }

    fn settle(&mut self, message: Message<T>) -> Option<MergeOutcome> {
        self.started = None;
        self.inner.store.apply(|s| s.update(message))
    }
}

impl<T, F> Drop for InFlightGuard<'_, T, F>
where
    T: Identified + Clone + Send + Sync + 'static,
    F: PageFetcher<T> + 'static,
{
    fn drop(&mut self) {
        let interrupted = self.started.take();
        if let Some(kind) = interrupted {
            log::debug!("{kind:?} interrupted before settling");
            self.inner.store.apply(|s| s.update(Message::Interrupted(kind)));
        }
        self.inner.in_flight.store(false, Ordering::SeqCst);

        // The dropped operation will never drain the pending slot itself
        if interrupted.is_some()
            && self.inner.refresh_pending.load(Ordering::SeqCst)
            && !self.inner.cancel.is_cancelled()
        {
            match Handle::try_current() {
                Ok(handle) => {
                    log::debug!("handing deferred refresh to a new task");
                    let controller = PaginationController {
                        inner: Arc::clone(self.inner),
                    };
                    handle.spawn(async move { controller.drain_pending_refresh().await });
                }
                Err(_) => log::warn!("deferred refresh left pending: no tokio runtime"),
            }
        }
    }
}

struct Inner<T: Identified, F> {
    store: ListStore<T>,
    fetcher: F,
    page_size: PageSize,
    in_flight: AtomicBool,
    refresh_pending: AtomicBool,
    cancel: CancellationToken,
}

/// Drives fetches for one list and owns its store.
///
/// Cloning yields another handle to the same list.
pub struct PaginationController<T: Identified, F> {
    inner: Arc<Inner<T, F>>,
}

impl<T: Identified, F> Clone for PaginationController<T, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, F> PaginationController<T, F>
where
    T: Identified + Clone + Send + Sync + 'static,
    F: PageFetcher<T> + 'static,
{
    pub fn new(fetcher: F, page_size: PageSize) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: ListStore::new(),
                fetcher,
                page_size,
                in_flight: AtomicBool::new(false),
                refresh_pending: AtomicBool::new(false),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// The store this controller writes to
    pub fn store(&self) -> &ListStore<T> {
        &self.inner.store
    }

    /// Current snapshot
    pub fn state(&self) -> Arc<ListState<T>> {
        self.inner.store.read()
    }

    pub fn page_size(&self) -> PageSize {
        self.inner.page_size
    }

    pub fn is_fetching(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Reload the first page, replacing the list on success.
    ///
    /// If a fetch is already running this only records the request; the
    /// running operation performs one refresh after it settles, however many
    /// requests were recorded meanwhile.
    #[tracing::instrument(name = "refresh", skip_all)]
    pub async fn refresh(&self) {
        if self.is_disposed() {
            return;
        }
        self.inner.refresh_pending.store(true, Ordering::SeqCst);
        if self.is_fetching() {
            log::debug!("refresh deferred until the running fetch settles");
        }
        self.drain_pending_refresh().await;
    }

    /// Fetch the next page and append it.
    ///
    /// A silent no-op when the list is exhausted or a fetch is running.
    #[tracing::instrument(name = "load_more", skip_all)]
    pub async fn load_more(&self) {
        let Some(guard) = InFlightGuard::acquire(&self.inner) else {
            log::trace!("load_more ignored: fetch in flight");
            return;
        };

        let snapshot = self.inner.store.read();
        if snapshot.has_more() && !self.is_disposed() {
            let cursor = snapshot.cursor().cloned();
            self.execute(guard, LoadKind::LoadMore, cursor).await;
        } else {
            log::trace!("load_more ignored: list exhausted");
            drop(guard);
        }

        self.drain_pending_refresh().await;
    }

    /// Re-issue whichever operation last failed.
    ///
    /// A load-more retry reuses the stored cursor, which a failure never
    /// changes. When the list was force-exhausted by a contract violation
    /// there is nothing to retry and the error is only dismissed.
    #[tracing::instrument(name = "retry", skip_all)]
    pub async fn retry(&self) {
        let snapshot = self.inner.store.read();
        let Some(error) = snapshot.error() else {
            return;
        };

        match error.kind {
            LoadKind::Refresh => self.refresh().await,
            LoadKind::LoadMore if snapshot.has_more() => self.load_more().await,
            LoadKind::LoadMore => {
                log::debug!("retry dismissed error on exhausted list: {}", error.cause);
                self.inner.store.apply(|s| s.update(Message::ErrorDismissed));
            }
        }
    }

    /// End the list's session.
    ///
    /// A running fetch is abandoned and its result is never applied; the
    /// store stops accepting transitions and drops its observers.
    pub fn dispose(&self) {
        log::debug!("disposing list");
        self.inner.cancel.cancel();
        self.inner.store.close();
    }

    async fn drain_pending_refresh(&self) {
        loop {
            if !self.inner.refresh_pending.load(Ordering::SeqCst) || self.is_disposed() {
                return;
            }
            // Whoever holds the flag checks the slot again after releasing it
            let Some(guard) = InFlightGuard::acquire(&self.inner)
            else {
                return;
            };
            if self.inner.refresh_pending.swap(false, Ordering::SeqCst) {
                self.execute(guard, LoadKind::Refresh, None).await;
            } else {
                drop(guard);
            }
        }
    }

    async fn execute(
        &self,
        mut guard: InFlightGuard<'_, T, F>,
        kind: LoadKind,
        cursor: Option<Cursor>,
    ) {
        let span = tracing::info_span!("list_fetch", ?kind, cursor = ?cursor);
        async move {
            if !guard.start(kind) {
                return;
            }

            let request = PageRequest {
                cursor,
                page_size: self.inner.page_size,
            };
            log::debug!("fetching {request:?}");

            let result = tokio::select! {
                biased;
                _ = self.inner.cancel.cancelled() => {
                    log::debug!("{kind:?} abandoned: list disposed");
                    return;
                }
                result = self.inner.fetcher.fetch(request) => result,
            };

            let message = match result {
                Ok(page) => {
                    log::debug!(
                        "{kind:?} returned {} items, is_last={}, next_cursor={:?}",
                        page.items.len(),
                        page.is_last,
                        page.next_cursor
                    );
                    Message::PageArrived { kind, page }
                }
                Err(err) => {
                    log::warn!("{kind:?} failed: {err}");
                    Message::Failed {
                        kind,
                        cause: err.into(),
                    }
                }
            };

            match guard.settle(message) {
                Some(outcome) if outcome.contract_violation => {
                    log::error!("{kind:?} page claimed more data without a cursor; list marked exhausted");
                }
                Some(outcome) if outcome.skipped_duplicates > 0 => {
                    log::info!(
                        "{kind:?} appended {} items, skipped {} already present",
                        outcome.appended,
                        outcome.skipped_duplicates
                    );
                }
                Some(_) => {}
                None => log::debug!("{kind:?} result discarded: list disposed"),
            }
        }
        .instrument(span)
        .await;
    }
}
