use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::ops::{Deref, Index};
use std::slice::Iter;
use std::vec::IntoIter;

/// Something with a stable identity key.
///
/// Two values with the same id are the same logical item, even when their
/// other fields differ (e.g. an edited room title).
pub trait Identified {
    type Id: Eq + Hash + Clone + fmt::Debug + Send + Sync;

    fn id(&self) -> Self::Id;
}

/// An insertion-ordered list that ignores items whose id is already present.
/// Duplicate checks are O(1) via an id index kept alongside the items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedList<T: Identified> {
    items: Vec<T>,
    ids: HashSet<T::Id>,
}

impl<T: Identified> KeyedList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            ids: HashSet::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
        }
    }

    /// Appends an item unless its id is already present.
    /// Returns: true if the item was appended, false if it was a duplicate
    pub fn push(&mut self, item: T) -> bool {
        if self.ids.insert(item.id()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    /// Appends every new item in order and returns how many were skipped
    pub fn append_new<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let incoming = incoming.into_iter();
        self.reserve(incoming.size_hint().0);
        let mut skipped = 0;
        for item in incoming {
            if !self.push(item) {
                skipped += 1;
            }
        }
        skipped
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.ids.contains(id)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
        self.ids.reserve(additional);
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.ids.clear();
    }
}

impl<T: Identified> Default for KeyedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identified> Deref for KeyedList<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T: Identified> Index<usize> for KeyedList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T: Identified> AsRef<[T]> for KeyedList<T> {
    fn as_ref(&self) -> &[T] {
        &self.items
    }
}

impl<T: Identified> IntoIterator for KeyedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T: Identified> IntoIterator for &'a KeyedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Identified> FromIterator<T> for KeyedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.append_new(iter);
        list
    }
}

impl<T: Identified> Extend<T> for KeyedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_new(iter);
    }
}

impl<T: Identified> fmt::Display for KeyedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyedList[{} items]", self.len())
    }
}
