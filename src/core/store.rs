//! Observable container for one list's state

use std::fmt;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError, Weak,
};

use tokio::sync::mpsc;

use crate::domain::collections::Identified;

use super::state::ListState;

type Observer<T> = Box<dyn Fn(&Arc<ListState<T>>) + Send + Sync>;

struct Observers<T: Identified> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Observer<T>)>>,
}

impl<T: Identified> Observers<T> {
    fn lock(&self) -> MutexGuard<'_, Vec<(u64, Observer<T>)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: u64) {
        self.lock().retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Single source of truth for one paginated list.
///
/// Snapshots are shared `Arc`s; readers never see a half-applied transition
/// and never get mutable access. Observers are called synchronously, in
/// subscription order, after every transition.
///
/// Observers must not subscribe or drop a [`Subscription`] of the same
/// store from inside their callback.
pub struct ListStore<T: Identified> {
    state: Mutex<Arc<ListState<T>>>,
    observers: Arc<Observers<T>>,
    closed: AtomicBool,
}

impl<T: Identified> Default for ListStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identified> ListStore<T> {
    pub fn new() -> Self {
        Self::with_state(ListState::new())
    }

    pub fn with_state(state: ListState<T>) -> Self {
        Self {
            state: Mutex::new(Arc::new(state)),
            observers: Arc::new(Observers {
                next_id: AtomicU64::new(0),
                entries: Mutex::new(Vec::new()),
            }),
            closed: AtomicBool::new(false),
        }
    }

    /// Current snapshot
    pub fn read(&self) -> Arc<ListState<T>> {
        Arc::clone(&self.lock_state())
    }

    /// Register an observer for every future snapshot.
    ///
    /// Delivery stops when the returned handle is dropped or unsubscribed.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Arc<ListState<T>>) + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        let id = self.observers.next_id.fetch_add(1, Ordering::Relaxed);
        if !self.is_closed() {
            self.observers.lock().push((id, Box::new(observer)));
        }
        let weak: Weak<Observers<T>> = Arc::downgrade(&self.observers);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(observers) = weak.upgrade() {
                    observers.remove(id);
                }
            })),
        }
    }

    /// Forward every future snapshot into a channel.
    ///
    /// The receiver sees the same order as synchronous observers.
    pub fn subscribe_channel(&self) -> (Subscription, mpsc::UnboundedReceiver<Arc<ListState<T>>>)
    where
        T: Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |snapshot| {
            let _ = tx.send(Arc::clone(snapshot));
        });
        (subscription, rx)
    }

    /// Apply one transition atomically and notify observers.
    ///
    /// Returns whatever the transition returns, or `None` once the store is
    /// closed.
    pub fn apply<R>(&self, transition: impl FnOnce(&mut ListState<T>) -> R) -> Option<R>
    where
        T: Clone,
    {
        // Holding the observer lock for the whole transition keeps delivery
        // order equal to transition order.
        let observers = self.observers.lock();
        if self.is_closed() {
            return None;
        }

        let (result, snapshot) = {
            let mut current = self.lock_state();
            let mut next = ListState::clone(&current);
            let result = transition(&mut next);
            let snapshot = Arc::new(next);
            *current = Arc::clone(&snapshot);
            (result, snapshot)
        };

        for (_, observer) in observers.iter() {
            observer(&snapshot);
        }
        Some(result)
    }

    /// Detach every observer; later transitions are ignored.
    pub fn close(&self) {
        let mut observers = self.observers.lock();
        self.closed.store(true, Ordering::SeqCst);
        observers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    fn lock_state(&self) -> MutexGuard<'_, Arc<ListState<T>>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle for one observer registration
#[must_use = "dropping a Subscription stops delivery immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}
