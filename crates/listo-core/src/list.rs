//! The to-do item collection and its create/update/delete operations.

use serde_json::Value;

use crate::error::ListError;
use crate::model::{Item, ItemKey, Label, Section};
use crate::ordering::OrderingStore;
use crate::storage::{KeyValueStore, TODO_KEY};

/// The flat item collection persisted under `todoList`.
///
/// Every mutation is written back before it returns, and both section
/// orderings are reconciled against the new item set. Keys are assigned as
/// one past the highest key seen this session, so a deleted key is never
/// handed out again while the list is open.
#[derive(Debug)]
pub struct TodoList<S> {
    store: S,
    items: Vec<Item>,
    high_water: ItemKey,
}

impl<S: KeyValueStore> TodoList<S> {
    /// Load the collection. A missing or non-array value yields an empty
    /// list; entries that do not decode as items are skipped one by one.
    pub fn load(store: S) -> Self {
        let items = decode_items(store.get(TODO_KEY));
        let high_water = items.iter().map(|item| item.key).max().unwrap_or(0);
        Self {
            store,
            items,
            high_water,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, key: ItemKey) -> Option<&Item> {
        self.items.iter().find(|item| item.key == key)
    }

    /// Keys of a section's items, in collection order.
    #[must_use]
    pub fn keys_in(&self, section: Section) -> Vec<ItemKey> {
        self.items
            .iter()
            .filter(|item| item.section() == section)
            .map(|item| item.key)
            .collect()
    }

    /// Append a new in-progress item and return its key.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::EmptyDescription`] for blank text, or a store
    /// error if persisting fails.
    pub fn add(&mut self, description: &str, labels: Vec<Label>) -> Result<ItemKey, ListError> {
        if description.trim().is_empty() {
            return Err(ListError::EmptyDescription);
        }
        let key = self.next_key();
        self.items.push(Item::new(key, description, labels));
        self.high_water = key;
        self.persist()?;
        tracing::debug!(key, "added item");
        Ok(key)
    }

    /// Remove an item and return it.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::NotFound`] for an unknown key, or a store error.
    pub fn delete(&mut self, key: ItemKey) -> Result<Item, ListError> {
        let pos = self.position(key)?;
        let removed = self.items.remove(pos);
        self.persist()?;
        tracing::debug!(key, "deleted item");
        Ok(removed)
    }

    /// Mark an item completed (`true`) or in progress (`false`).
    ///
    /// # Errors
    ///
    /// Returns [`ListError::NotFound`] for an unknown key, or a store error.
    pub fn set_status(&mut self, key: ItemKey, status: bool) -> Result<&Item, ListError> {
        let pos = self.position(key)?;
        if self.items[pos].status != status {
            self.items[pos].status = status;
            self.persist()?;
            tracing::debug!(key, status, "changed item status");
        }
        Ok(&self.items[pos])
    }

    /// Toggle a label on an item.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::NotFound`] for an unknown key, or a store error.
    pub fn toggle_label(&mut self, key: ItemKey, label: Label) -> Result<&Item, ListError> {
        let pos = self.position(key)?;
        let set = self.items[pos].toggle_label(label);
        self.persist()?;
        tracing::debug!(key, set, "toggled label");
        Ok(&self.items[pos])
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn next_key(&self) -> ItemKey {
        let max_live = self.items.iter().map(|item| item.key).max().unwrap_or(0);
        max_live.max(self.high_water) + 1
    }

    fn position(&self, key: ItemKey) -> Result<usize, ListError> {
        self.items
            .iter()
            .position(|item| item.key == key)
            .ok_or(ListError::NotFound(key))
    }

    fn persist(&mut self) -> Result<(), ListError> {
        self.store.set_as(TODO_KEY, &self.items)?;
        for section in Section::ALL {
            let live = self.keys_in(section);
            OrderingStore::load(&mut self.store, section, &live)?;
        }
        Ok(())
    }
}

fn decode_items(value: Option<Value>) -> Vec<Item> {
    let entries = match value {
        None => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            tracing::warn!(value = %other, "stored item list is not an array; starting empty");
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Item>(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping malformed stored item");
                None
            }
        })
        .collect()
}
