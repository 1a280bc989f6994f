//! Per-section display order.
//!
//! The item collection is stored in creation order. How a section is shown
//! is a separate sequence of item keys persisted under `todoOrder-<section>`.
//! That sequence is never trusted on its own: every load reconciles it with
//! the live keys, so a key that was deleted or changed section disappears and
//! a key that was added or moved in shows up at the end.
//!
//! The algorithms are the free functions [`reconcile`], [`reorder`] and
//! [`lookup_index`]. [`OrderingStore`] binds them to a store and a section.

use std::collections::HashSet;

use crate::error::StoreError;
use crate::model::{Item, ItemKey, Section};
use crate::storage::{KeyValueStore, order_key};

/// Merge a stored ordering with the live key set.
///
/// Survivors of `stored` keep their relative order; keys of `live` missing
/// from `stored` are appended in `live` order. Each key appears once, so
/// duplicates from malformed data collapse to their first position.
#[must_use]
pub fn reconcile(stored: &[ItemKey], live: &[ItemKey]) -> Vec<ItemKey> {
    let live_set: HashSet<ItemKey> = live.iter().copied().collect();
    let mut seen = HashSet::with_capacity(live.len());
    let mut result = Vec::with_capacity(live.len());

    for &key in stored {
        if live_set.contains(&key) && seen.insert(key) {
            result.push(key);
        }
    }
    for &key in live {
        if seen.insert(key) {
            result.push(key);
        }
    }
    result
}

/// Zero-based position of `key`, `None` when absent.
#[must_use]
pub fn lookup_index(ordering: &[ItemKey], key: ItemKey) -> Option<usize> {
    ordering.iter().position(|&k| k == key)
}

/// Move `moved` into the slot currently held by `target`, shifting the items
/// in between by one. Returns `false` (and leaves `ordering` alone) when
/// either key is absent or both are at the same index.
pub fn reorder(ordering: &mut Vec<ItemKey>, moved: ItemKey, target: ItemKey) -> bool {
    let (Some(from), Some(to)) = (lookup_index(ordering, moved), lookup_index(ordering, target))
    else {
        return false;
    };
    if from == to {
        return false;
    }
    let key = ordering.remove(from);
    ordering.insert(to, key);
    true
}

/// Persisted ordering of one section.
#[derive(Debug)]
pub struct OrderingStore<S> {
    store: S,
    section: Section,
    ordering: Vec<ItemKey>,
}

impl<S: KeyValueStore> OrderingStore<S> {
    /// Load the section's ordering and reconcile it against `live`.
    ///
    /// A persisted ordering is taken verbatim as the starting sequence. When
    /// none exists (or it is malformed) the live keys' own order is used.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the reconciled ordering fails.
    pub fn load(store: S, section: Section, live: &[ItemKey]) -> Result<Self, StoreError> {
        let initial = store
            .get_as::<Vec<ItemKey>>(&order_key(section))
            .unwrap_or_else(|| live.to_vec());
        let mut this = Self {
            store,
            section,
            ordering: initial,
        };
        this.reconcile(live)?;
        Ok(this)
    }

    /// Reconcile with the current live keys of the section and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn reconcile(&mut self, live: &[ItemKey]) -> Result<(), StoreError> {
        let next = reconcile(&self.ordering, live);
        if next != self.ordering {
            tracing::debug!(
                section = %self.section,
                before = ?self.ordering,
                after = ?next,
                "reconciled section ordering"
            );
        }
        self.ordering = next;
        self.persist()
    }

    /// Move `moved` to `target`'s position and persist. Unknown keys are a
    /// silent no-op; the return value reports whether anything moved.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn reorder(&mut self, moved: ItemKey, target: ItemKey) -> Result<bool, StoreError> {
        if !reorder(&mut self.ordering, moved, target) {
            tracing::debug!(section = %self.section, moved, target, "reorder ignored");
            return Ok(false);
        }
        tracing::debug!(section = %self.section, moved, target, ordering = ?self.ordering, "reordered");
        self.persist()?;
        Ok(true)
    }

    #[must_use]
    pub fn lookup_index(&self, key: ItemKey) -> Option<usize> {
        lookup_index(&self.ordering, key)
    }

    #[must_use]
    pub fn ordering(&self) -> &[ItemKey] {
        &self.ordering
    }

    #[must_use]
    pub const fn section(&self) -> Section {
        self.section
    }

    /// The section's items in display order. Keys without a matching item
    /// are skipped.
    #[must_use]
    pub fn arrange<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        self.ordering
            .iter()
            .filter_map(|&key| items.iter().find(|item| item.key == key))
            .collect()
    }

    /// Give the underlying store back.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.store.set_as(&order_key(self.section), &self.ordering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn reconcile_drops_dead_and_appends_new() {
        assert_eq!(reconcile(&[2, 1, 3], &[1, 3]), vec![1, 3]);
        assert_eq!(reconcile(&[1, 3], &[1, 3, 4]), vec![1, 3, 4]);
        assert_eq!(reconcile(&[5, 4], &[1, 4, 2, 5]), vec![5, 4, 1, 2]);
    }

    #[test]
    fn reconcile_collapses_duplicates() {
        assert_eq!(reconcile(&[2, 1, 2, 1], &[1, 2]), vec![2, 1]);
        assert_eq!(reconcile(&[], &[3, 3, 1]), vec![3, 1]);
    }

    #[test]
    fn reconcile_with_empty_live_is_empty() {
        assert!(reconcile(&[1, 2, 3], &[]).is_empty());
    }

    #[test]
    fn reorder_moves_up_with_splice_semantics() {
        let mut ordering = vec![1, 2, 3, 4];
        assert!(reorder(&mut ordering, 4, 2));
        assert_eq!(ordering, vec![1, 4, 2, 3]);
    }

    #[test]
    fn reorder_moves_down_with_splice_semantics() {
        let mut ordering = vec![1, 2, 3, 4];
        assert!(reorder(&mut ordering, 1, 3));
        assert_eq!(ordering, vec![2, 3, 1, 4]);
    }

    #[test]
    fn reorder_is_noop_for_same_or_unknown_keys() {
        let mut ordering = vec![1, 2, 3];
        assert!(!reorder(&mut ordering, 2, 2));
        assert!(!reorder(&mut ordering, 9, 1));
        assert!(!reorder(&mut ordering, 1, 9));
        assert_eq!(ordering, vec![1, 2, 3]);
    }

    #[test]
    fn lookup_index_reports_position() {
        assert_eq!(lookup_index(&[7, 8, 9], 9), Some(2));
        assert_eq!(lookup_index(&[7, 8, 9], 1), None);
    }

    #[test]
    fn load_without_persisted_uses_live_order_and_persists() {
        let mut store = MemoryStore::new();
        let section = OrderingStore::load(&mut store, Section::InProgress, &[3, 1, 2]).unwrap();
        assert_eq!(section.ordering(), &[3, 1, 2]);
        assert_eq!(store.get("todoOrder-in-progress"), Some(json!([3, 1, 2])));
    }

    #[test]
    fn load_takes_persisted_then_reconciles() {
        let mut store = MemoryStore::new().with("todoOrder-completed", json!([2, 9, 1]));
        let section = OrderingStore::load(&mut store, Section::Completed, &[1, 2, 4]).unwrap();
        assert_eq!(section.ordering(), &[2, 1, 4]);
        assert_eq!(section.lookup_index(4), Some(2));
        assert_eq!(store.get("todoOrder-completed"), Some(json!([2, 1, 4])));
    }

    #[test]
    fn malformed_persisted_ordering_falls_back_to_live() {
        let mut store = MemoryStore::new().with("todoOrder-completed", json!({"oops": 1}));
        let section = OrderingStore::load(&mut store, Section::Completed, &[5, 6]).unwrap();
        assert_eq!(section.ordering(), &[5, 6]);
    }

    #[test]
    fn reorder_persists_immediately() {
        let mut store = MemoryStore::new();
        let mut section =
            OrderingStore::load(&mut store, Section::InProgress, &[1, 2, 3, 4]).unwrap();
        assert!(section.reorder(4, 2).unwrap());
        assert!(!section.reorder(4, 40).unwrap());
        drop(section);
        assert_eq!(store.get("todoOrder-in-progress"), Some(json!([1, 4, 2, 3])));
    }

    #[test]
    fn sections_are_persisted_independently() {
        let mut store = MemoryStore::new();
        OrderingStore::load(&mut store, Section::InProgress, &[1, 2]).unwrap();
        OrderingStore::load(&mut store, Section::Completed, &[3]).unwrap();
        assert_eq!(store.get("todoOrder-in-progress"), Some(json!([1, 2])));
        assert_eq!(store.get("todoOrder-completed"), Some(json!([3])));
    }

    #[test]
    fn arrange_maps_keys_to_items() {
        let items = vec![
            Item::new(1, "one", vec![]),
            Item::new(2, "two", vec![]),
            Item::new(3, "three", vec![]),
        ];
        let mut store = MemoryStore::new().with("todoOrder-in-progress", json!([3, 1, 2]));
        let section = OrderingStore::load(&mut store, Section::InProgress, &[1, 2, 3]).unwrap();
        let arranged: Vec<_> = section.arrange(&items).iter().map(|i| i.key).collect();
        assert_eq!(arranged, vec![3, 1, 2]);
        assert_eq!(section.arrange(&items[..1]).len(), 1);
    }
}
