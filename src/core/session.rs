//! Presentation-facing handles over a list controller

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::domain::{collections::Identified, page::PageSize};

use super::{
    controller::PaginationController,
    fetcher::PageFetcher,
    state::ListState,
    store::Subscription,
};

/// Fire-and-forget access to one paginated list.
///
/// Intents spawn onto the current tokio runtime and return immediately; the
/// returned handles are only useful to tests and shutdown code that want to
/// wait for an operation to settle.
pub struct PaginatedList<T: Identified, F> {
    controller: PaginationController<T, F>,
}

impl<T: Identified, F> Clone for PaginatedList<T, F> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
        }
    }
}

impl<T, F> PaginatedList<T, F>
where
    T: Identified + Clone + Send + Sync + 'static,
    F: PageFetcher<T> + 'static,
{
    pub fn new(fetcher: F, page_size: PageSize) -> Self {
        Self {
            controller: PaginationController::new(fetcher, page_size),
        }
    }

    pub fn controller(&self) -> &PaginationController<T, F> {
        &self.controller
    }

    pub fn state(&self) -> Arc<ListState<T>> {
        self.controller.state()
    }

    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Fn(&Arc<ListState<T>>) + Send + Sync + 'static,
    {
        self.controller.store().subscribe(observer)
    }

    /// Snapshot stream for async render loops
    pub fn updates(&self) -> (Subscription, mpsc::UnboundedReceiver<Arc<ListState<T>>>) {
        self.controller.store().subscribe_channel()
    }

    pub fn refresh(&self) -> JoinHandle<()> {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.refresh().await })
    }

    pub fn load_more(&self) -> JoinHandle<()> {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.load_more().await })
    }

    pub fn retry(&self) -> JoinHandle<()> {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.retry().await })
    }

    /// Issue `load_more` when the last visible row is within `threshold`
    /// rows of the end of the loaded items.
    pub fn load_more_if_near_end(
        &self,
        last_visible_index: usize,
        threshold: usize,
    ) -> Option<JoinHandle<()>> {
        let state = self.state();
        if state.has_more()
            && !state.is_loading()
            && is_near_end(last_visible_index, state.len(), threshold)
        {
            Some(self.load_more())
        } else {
            None
        }
    }

    pub fn dispose(&self) {
        self.controller.dispose();
    }
}

/// Whether a scroll position is close enough to the end to prefetch
pub fn is_near_end(last_visible_index: usize, len: usize, threshold: usize) -> bool {
    len == 0 || last_visible_index.saturating_add(threshold).saturating_add(1) >= len
}

/// Builds a fetcher for one filter value
pub type FetcherFactory<K, F> = Box<dyn Fn(&K) -> F + Send + Sync>;

/// A list whose contents depend on a filter (notification type, room
/// status, ...).
///
/// Switching filters never reuses the old cursor or items: the current
/// store/controller pair is disposed and a fresh pair is built.
pub struct FilteredList<T: Identified, K, F> {
    factory: FetcherFactory<K, F>,
    page_size: PageSize,
    current: Mutex<(K, PaginatedList<T, F>)>,
}

impl<T, K, F> FilteredList<T, K, F>
where
    T: Identified + Clone + Send + Sync + 'static,
    K: Clone + PartialEq + Debug,
    F: PageFetcher<T> + 'static,
{
    /// Build the list for `initial` without fetching anything yet
    pub fn new(initial: K, page_size: PageSize, factory: FetcherFactory<K, F>) -> Self {
        let list = PaginatedList::new(factory(&initial), page_size);
        Self {
            factory,
            page_size,
            current: Mutex::new((initial, list)),
        }
    }

    pub fn filter(&self) -> K {
        self.lock().0.clone()
    }

    /// Handle to the list for the active filter.
    ///
    /// Observers attach here and must re-attach after [`Self::select`]
    /// returns a new list.
    pub fn current(&self) -> PaginatedList<T, F> {
        self.lock().1.clone()
    }

    /// Switch to `filter`.
    ///
    /// Returns the new list (already refreshing) or `None` if `filter` is
    /// the active one.
    pub fn select(&self, filter: K) -> Option<PaginatedList<T, F>> {
        let mut current = self.lock();
        if current.0 == filter {
            return None;
        }

        log::info!("switching list filter {:?} -> {filter:?}", current.0);
        current.1.dispose();
        let list = PaginatedList::new((self.factory)(&filter), self.page_size);
        let _ = list.refresh();
        *current = (filter, list.clone());
        Some(list)
    }

    pub fn dispose(&self) {
        self.lock().1.dispose();
    }

    fn lock(&self) -> MutexGuard<'_, (K, PaginatedList<T, F>)> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
