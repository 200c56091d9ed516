//! Paginated list state
//!
//! This module follows the Elm Architecture pattern:
//! - State changes only through [`ListState::update`]
//! - Every transition is an explicit [`Message`] variant
//! - No I/O happens here; the controller decides when to send messages

use crate::domain::{
    collections::{Identified, KeyedList},
    error::ListError,
    page::{Cursor, Page},
};

/// Which operation a load belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadKind {
    Refresh,
    LoadMore,
}

/// Loading status of a list. Holding both flags in one enum keeps them
/// mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    LoadingInitial,
    LoadingMore,
}

impl From<LoadKind> for LoadPhase {
    fn from(kind: LoadKind) -> Self {
        match kind {
            LoadKind::Refresh => Self::LoadingInitial,
            LoadKind::LoadMore => Self::LoadingMore,
        }
    }
}

/// The last failure and the operation it interrupted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub kind: LoadKind,
    pub cause: ListError,
}

/// Messages that move a list from one state to the next
///
/// Following Elm conventions, messages are named in past tense
/// to indicate "what happened" rather than "what to do"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<T> {
    /// A fetch for `kind` began
    Started(LoadKind),
    /// A fetch for `kind` returned a page
    PageArrived { kind: LoadKind, page: Page<T> },
    /// A fetch for `kind` failed
    Failed { kind: LoadKind, cause: ListError },
    /// A fetch for `kind` was dropped before it produced a result
    Interrupted(LoadKind),
    /// The recorded error was acknowledged without a new fetch
    ErrorDismissed,
}

/// What applying a page did to the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub appended: usize,
    pub skipped_duplicates: usize,
    /// The page claimed more data without a cursor to continue from
    pub contract_violation: bool,
}

/// Snapshot of one paginated list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState<T: Identified> {
    items: KeyedList<T>,
    cursor: Option<Cursor>,
    phase: LoadPhase,
    has_more: bool,
    error: Option<LoadError>,
}

impl<T: Identified> Default for ListState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identified> ListState<T> {
    /// An empty list that has not loaded anything yet
    pub fn new() -> Self {
        Self {
            items: KeyedList::new(),
            cursor: None,
            phase: LoadPhase::Idle,
            has_more: true,
            error: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading_initial(&self) -> bool {
        self.phase == LoadPhase::LoadingInitial
    }

    pub fn is_loading_more(&self) -> bool {
        self.phase == LoadPhase::LoadingMore
    }

    pub fn is_loading(&self) -> bool {
        self.phase != LoadPhase::Idle
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// No further pages will be requested until the next refresh
    pub fn is_exhausted(&self) -> bool {
        !self.has_more
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    /// Update the list state based on a message
    ///
    /// This is the only way to modify the state. Returns what a page merge
    /// did; other messages return an empty outcome.
    pub fn update(&mut self, message: Message<T>) -> MergeOutcome {
        match message {
            Message::Started(kind) => {
                self.phase = kind.into();
                self.error = None;
                MergeOutcome::default()
            }
            Message::PageArrived { kind, page } => {
                let claims_more = page.claims_more();
                let next_cursor = page.next_cursor;

                let mut outcome = MergeOutcome::default();
                let before = match kind {
                    LoadKind::Refresh => {
                        self.items.clear();
                        0
                    }
                    LoadKind::LoadMore => self.items.len(),
                };
                outcome.skipped_duplicates = self.items.append_new(page.items);
                outcome.appended = self.items.len() - before;

                if claims_more && next_cursor.is_none() {
                    // Continuing without a cursor would refetch the first page forever
                    outcome.contract_violation = true;
                    self.has_more = false;
                    self.error = Some(LoadError {
                        kind,
                        cause: ListError::contract_violation(
                            "page reported more data but carried no next cursor",
                        ),
                    });
                } else {
                    self.has_more = claims_more;
                    self.error = None;
                }
                self.cursor = next_cursor;
                self.phase = LoadPhase::Idle;
                outcome
            }
            Message::Failed { kind, cause } => {
                self.phase = LoadPhase::Idle;
                self.error = Some(LoadError { kind, cause });
                MergeOutcome::default()
            }
            Message::Interrupted(kind) => {
                if self.phase == LoadPhase::from(kind) {
                    self.phase = LoadPhase::Idle;
                }
                MergeOutcome::default()
            }
            Message::ErrorDismissed => {
                self.error = None;
                MergeOutcome::default()
            }
        }
    }
}
