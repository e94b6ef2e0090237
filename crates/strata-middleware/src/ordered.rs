//! Ordered registry of uniquely identified entries.
//!
//! [`OrderedIds`] is the storage behind every step of a stack. It keeps
//! entries in execution order (index 0 runs first) and guarantees that no two
//! entries share an identifier. Every mutation either succeeds completely or
//! fails without touching the registry.
//!
//! # Positioning rules
//!
//! - [`RelativePosition::Before`] places a new entry as close to the front
//!   (for [`OrderedIds::add`]) or to the anchor (for [`OrderedIds::insert`])
//!   as possible.
//! - [`RelativePosition::After`] places it as close to the back or to the
//!   anchor as possible.
//!
//! Repeated inserts against the same anchor therefore stack up in call order
//! next to the anchor:
//!
//! ```text
//! insert(b, "a", After)   [a, b]
//! insert(c, "a", After)   [a, c, b]
//! ```

use crate::error::{Error, StrataResult};
use indexmap::IndexMap;
use std::mem;

/// Where to place an entry relative to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativePosition {
    /// In front of the anchor.
    Before,
    /// Behind the anchor.
    After,
}

/// Exposes the identifier an entry is registered under.
pub trait Identify {
    /// Returns the unique identifier of the entry.
    fn id(&self) -> &str;
}

/// An ordered collection of uniquely identified entries.
///
/// Backed by an [`IndexMap`], which keeps the ordered entry vector and the
/// identifier index in lockstep.
///
/// # Example
///
/// ```
/// use strata_middleware::ordered::{Identify, OrderedIds, RelativePosition};
///
/// #[derive(Clone)]
/// struct Named(&'static str);
///
/// impl Identify for Named {
///     fn id(&self) -> &str {
///         self.0
///     }
/// }
///
/// let mut ids = OrderedIds::new();
/// ids.add(Named("a"), RelativePosition::After).unwrap();
/// ids.add(Named("b"), RelativePosition::Before).unwrap();
/// ids.insert(Named("c"), "a", RelativePosition::Before).unwrap();
///
/// assert_eq!(ids.ids().collect::<Vec<_>>(), ["b", "c", "a"]);
/// ```
#[derive(Debug, Clone)]
pub struct OrderedIds<T> {
    entries: IndexMap<String, T>,
}

impl<T> OrderedIds<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if an entry with the identifier exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Returns the entry registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    /// Iterates over the identifiers in execution order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        tracing::trace!("ordered ids cleared");
    }

    /// Removes the entry registered under `id`, returning it.
    pub fn remove(&mut self, id: &str) -> StrataResult<T> {
        let removed = self
            .entries
            .shift_remove(id)
            .ok_or_else(|| Error::not_found(id))?;
        tracing::trace!(middleware_id = id, "middleware removed");
        Ok(removed)
    }
}

impl<T: Identify> OrderedIds<T> {
    /// Adds an entry at the front or the back of the registry.
    pub fn add(&mut self, entry: T, position: RelativePosition) -> StrataResult<()> {
        let id = self.checked_new_id(&entry)?;
        let index = match position {
            RelativePosition::Before => 0,
            RelativePosition::After => self.entries.len(),
        };

        tracing::trace!(middleware_id = %id, ?position, "middleware added");
        self.entries.shift_insert(index, id, entry);
        Ok(())
    }

    /// Inserts an entry immediately before or after the entry `relative_to`.
    ///
    /// The new identifier is checked for uniqueness before the anchor is
    /// looked up, so a call that is both a duplicate and anchorless reports
    /// [`Error::DuplicateId`].
    pub fn insert(
        &mut self,
        entry: T,
        relative_to: &str,
        position: RelativePosition,
    ) -> StrataResult<()> {
        let id = self.checked_new_id(&entry)?;
        let anchor = self
            .entries
            .get_index_of(relative_to)
            .ok_or_else(|| Error::anchor_not_found(relative_to))?;
        let index = match position {
            RelativePosition::Before => anchor,
            RelativePosition::After => anchor + 1,
        };

        tracing::trace!(middleware_id = %id, relative_to, ?position, "middleware inserted");
        self.entries.shift_insert(index, id, entry);
        Ok(())
    }

    /// Replaces the entry registered under `id` with `entry`, keeping its
    /// position. Returns the replaced entry.
    ///
    /// `entry` may carry a different identifier, as long as that identifier
    /// is not used by any other entry.
    pub fn swap(&mut self, id: &str, entry: T) -> StrataResult<T> {
        let index = self
            .entries
            .get_index_of(id)
            .ok_or_else(|| Error::not_found(id))?;

        let new_id = entry.id();
        if new_id.is_empty() {
            return Err(Error::EmptyId);
        }

        if new_id == id {
            let slot = &mut self.entries[index];
            tracing::trace!(middleware_id = id, "middleware swapped");
            return Ok(mem::replace(slot, entry));
        }

        if self.entries.contains_key(new_id) {
            return Err(Error::duplicate_id(new_id));
        }

        let new_id = new_id.to_owned();
        let Some((_, removed)) = self.entries.shift_remove_index(index) else {
            return Err(Error::not_found(id));
        };
        tracing::trace!(middleware_id = id, replacement = %new_id, "middleware swapped");
        self.entries.shift_insert(index, new_id, entry);
        Ok(removed)
    }

    fn checked_new_id(&self, entry: &T) -> StrataResult<String> {
        let id = entry.id();
        if id.is_empty() {
            return Err(Error::EmptyId);
        }
        if self.entries.contains_key(id) {
            return Err(Error::duplicate_id(id));
        }
        Ok(id.to_owned())
    }
}

impl<T: Clone> OrderedIds<T> {
    /// Returns a snapshot of the entries in execution order.
    ///
    /// The snapshot is independent of the registry; later mutations do not
    /// affect it.
    #[must_use]
    pub fn get_order(&self) -> Vec<T> {
        self.entries.values().cloned().collect()
    }
}

impl<T> Default for OrderedIds<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RelativePosition::{After, Before};

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: &'static str,
        tag: u32,
    }

    impl Identify for Entry {
        fn id(&self) -> &str {
            self.id
        }
    }

    fn entry(id: &'static str) -> Entry {
        Entry { id, tag: 0 }
    }

    fn order(ids: &OrderedIds<Entry>) -> Vec<&'static str> {
        ids.get_order().iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_add_after_appends() {
        let mut ids = OrderedIds::new();
        ids.add(entry("a"), After).unwrap();
        ids.add(entry("b"), After).unwrap();
        assert_eq!(order(&ids), ["a", "b"]);
    }

    #[test]
    fn test_add_before_puts_latest_first() {
        let mut ids = OrderedIds::new();
        ids.add(entry("m"), Before).unwrap();
        ids.add(entry("m2"), Before).unwrap();
        assert_eq!(order(&ids), ["m2", "m"]);
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut ids = OrderedIds::new();
        ids.add(entry("a"), After).unwrap();
        let err = ids.add(entry("a"), Before).unwrap_err();
        assert_eq!(err, Error::duplicate_id("a"));
        assert_eq!(order(&ids), ["a"]);
    }

    #[test]
    fn test_add_empty_id_fails() {
        let mut ids = OrderedIds::new();
        assert_eq!(ids.add(entry(""), After), Err(Error::EmptyId));
        assert!(ids.is_empty());
    }

    #[test]
    fn test_insert_after_same_anchor_applies_in_call_order() {
        let mut ids = OrderedIds::new();
        ids.add(entry("first"), After).unwrap();
        ids.add(entry("m"), After).unwrap();
        ids.add(entry("last"), After).unwrap();

        ids.insert(entry("m2"), "m", After).unwrap();
        ids.insert(entry("m3"), "m", After).unwrap();
        assert_eq!(order(&ids), ["first", "m", "m3", "m2", "last"]);
    }

    #[test]
    fn test_insert_before_anchor() {
        let mut ids = OrderedIds::new();
        ids.add(entry("first"), After).unwrap();
        ids.add(entry("m"), After).unwrap();

        ids.insert(entry("m2"), "m", Before).unwrap();
        ids.insert(entry("m3"), "m", Before).unwrap();
        assert_eq!(order(&ids), ["first", "m2", "m3", "m"]);
    }

    #[test]
    fn test_insert_missing_anchor_fails() {
        let mut ids = OrderedIds::new();
        ids.add(entry("a"), After).unwrap();
        let err = ids.insert(entry("b"), "nope", After).unwrap_err();
        assert_eq!(err, Error::anchor_not_found("nope"));
        assert_eq!(order(&ids), ["a"]);
    }

    #[test]
    fn test_insert_duplicate_reported_before_missing_anchor() {
        let mut ids = OrderedIds::new();
        ids.add(entry("a"), After).unwrap();
        let err = ids.insert(entry("a"), "nope", After).unwrap_err();
        assert_eq!(err, Error::duplicate_id("a"));
    }

    #[test]
    fn test_swap_keeps_position_and_returns_old_entry() {
        let mut ids = OrderedIds::new();
        ids.add(entry("a"), After).unwrap();
        ids.add(entry("m"), After).unwrap();
        ids.add(entry("z"), After).unwrap();

        let removed = ids.swap("m", entry("m2")).unwrap();
        assert_eq!(removed.id, "m");
        assert_eq!(order(&ids), ["a", "m2", "z"]);
        assert!(!ids.contains("m"));
    }

    #[test]
    fn test_swap_same_id_replaces_entry() {
        let mut ids = OrderedIds::new();
        ids.add(entry("a"), After).unwrap();
        ids.add(entry("b"), After).unwrap();

        let removed = ids.swap("a", Entry { id: "a", tag: 7 }).unwrap();
        assert_eq!(removed.tag, 0);
        assert_eq!(ids.get("a").unwrap().tag, 7);
        assert_eq!(order(&ids), ["a", "b"]);
    }

    #[test]
    fn test_swap_missing_fails() {
        let mut ids: OrderedIds<Entry> = OrderedIds::new();
        assert_eq!(ids.swap("m", entry("m2")), Err(Error::not_found("m")));
    }

    #[test]
    fn test_swap_into_existing_id_fails() {
        let mut ids = OrderedIds::new();
        ids.add(entry("a"), After).unwrap();
        ids.add(entry("b"), After).unwrap();

        assert_eq!(ids.swap("a", entry("b")), Err(Error::duplicate_id("b")));
        assert_eq!(order(&ids), ["a", "b"]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut ids = OrderedIds::new();
        for id in ["a", "b", "c"] {
            ids.add(entry(id), After).unwrap();
        }
        let removed = ids.remove("b").unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(order(&ids), ["a", "c"]);
    }

    #[test]
    fn test_remove_missing_leaves_registry_unchanged() {
        let mut ids = OrderedIds::new();
        ids.add(entry("a"), After).unwrap();
        let before = ids.get_order();

        assert_eq!(ids.remove("m"), Err(Error::not_found("m")));
        assert_eq!(ids.get_order(), before);
    }

    #[test]
    fn test_clear_twice() {
        let mut ids = OrderedIds::new();
        ids.add(entry("a"), After).unwrap();
        ids.clear();
        assert!(ids.is_empty());
        ids.clear();
        assert!(ids.get_order().is_empty());
    }

    #[test]
    fn test_get_order_is_a_snapshot() {
        let mut ids = OrderedIds::new();
        ids.add(entry("a"), After).unwrap();
        let snapshot = ids.get_order();

        ids.add(entry("b"), Before).unwrap();
        ids.remove("a").unwrap();

        assert_eq!(snapshot, vec![entry("a")]);
        assert_eq!(order(&ids), ["b"]);
    }
}
