//! Plain-text list view
//!
//! Renders list snapshots as lines for the terminal. This is a pure,
//! stateless component: it reads a [`ListState`] and never mutates it.

use crate::{
    core::state::{ListState, LoadKind},
    domain::{
        collections::Identified,
        reading::{Group, Notification, Room},
    },
};

/// One-line summary of a list item
pub trait ListRow {
    fn row(&self) -> String;
}

impl ListRow for Notification {
    fn row(&self) -> String {
        if self.kind.is_empty() {
            self.message.clone()
        } else {
            format!("[{}] {}", self.kind, self.message)
        }
    }
}

impl ListRow for Room {
    fn row(&self) -> String {
        format!("{} ({})", self.title, self.status)
    }
}

impl ListRow for Group {
    fn row(&self) -> String {
        match self.member_count {
            1 => format!("{} (1 member)", self.name),
            n => format!("{} ({n} members)", self.name),
        }
    }
}

/// Stateless text view of a paginated list
#[derive(Debug, Clone, Copy, Default)]
pub struct ListView {
    /// Prefix rows with their index
    pub numbered: bool,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    /// Render the whole list.
    ///
    /// A failed refresh with nothing loaded replaces the list with an error
    /// screen; any other failure shows a trailing retry row under the items.
    pub fn view<T: Identified + ListRow>(&self, state: &ListState<T>) -> Vec<String> {
        if state.is_empty() {
            if state.is_loading_initial() {
                return vec!["Loading...".to_string()];
            }
            if let Some(error) = state.error() {
                if error.kind == LoadKind::Refresh {
                    return vec![
                        format!("Couldn't load: {}", error.cause),
                        "[retry]".to_string(),
                    ];
                }
            }
        }

        let mut lines: Vec<String> = state
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if self.numbered {
                    format!("{:>4}. {}", i + 1, item.row())
                } else {
                    item.row()
                }
            })
            .collect();

        if let Some(footer) = self.footer(state) {
            lines.push(footer);
        }
        lines
    }

    fn footer<T: Identified>(&self, state: &ListState<T>) -> Option<String> {
        if state.is_loading_initial() {
            Some("Refreshing...".to_string())
        } else if state.is_loading_more() {
            Some("Loading more...".to_string())
        } else if let Some(error) = state.error() {
            Some(format!("{} [retry]", error.cause))
        } else if state.is_exhausted() && state.is_empty() {
            Some("Nothing here yet".to_string())
        } else if state.is_exhausted() {
            Some("End of list".to_string())
        } else {
            None
        }
    }

    /// Single status line describing a snapshot, for transition logs
    pub fn status_line<T: Identified>(&self, state: &ListState<T>) -> String {
        let status = if state.is_loading_initial() {
            "refreshing".to_string()
        } else if state.is_loading_more() {
            "loading more".to_string()
        } else if let Some(error) = state.error() {
            format!("error: {}", error.cause)
        } else if state.is_exhausted() {
            "exhausted".to_string()
        } else {
            "idle".to_string()
        };
        format!("{} items, {status}", state.len())
    }
}
