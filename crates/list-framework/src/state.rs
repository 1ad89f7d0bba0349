//! Observable state of one resource store.

use crate::entity::ResourceItem;
use std::collections::HashSet;

/// Snapshot of a store, published to subscribers after every change.
#[derive(Debug, Clone)]
pub struct StoreState<T> {
    /// Items in server-provided order.
    pub items: Vec<T>,
    /// True only while the latest fetch is in flight.
    pub loading: bool,
    /// Last operation's failure message. Cleared when the next fetch starts.
    pub error: Option<String>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: ResourceItem> StoreState<T> {
    pub fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Replaces the whole list with a fetch result, keeping the first item per id.
    /// Returns how many repeated items were dropped.
    pub(crate) fn replace_all(&mut self, items: Vec<T>) -> usize {
        let received = items.len();
        let mut seen = HashSet::with_capacity(received);
        self.items = items
            .into_iter()
            .filter(|item| seen.insert(item.id().clone()))
            .collect();
        received - self.items.len()
    }

    /// Puts `item` at the front, dropping any older copy with the same id.
    pub(crate) fn prepend(&mut self, item: T) {
        self.items.retain(|existing| existing.id() != item.id());
        self.items.insert(0, item);
    }

    /// Replaces the item with the same id in place. Returns false if it is not listed.
    pub(crate) fn replace(&mut self, item: T) -> bool {
        match self.position(item.id()) {
            Some(index) => {
                self.items[index] = item;
                true
            }
            None => false,
        }
    }

    /// Removes the item with `id`. Returns false if it is not listed.
    pub(crate) fn remove(&mut self, id: &T::Id) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: u32,
        name: &'static str,
    }

    impl ResourceItem for Row {
        type Id = u32;
        type Create = ();
        type Update = ();
        type Query = ();

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    fn state(rows: &[(u32, &'static str)]) -> StoreState<Row> {
        StoreState {
            items: rows.iter().map(|&(id, name)| Row { id, name }).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepend_keeps_one_item_per_id() {
        let mut s = state(&[(1, "A"), (2, "B")]);
        s.prepend(Row { id: 2, name: "B2" });
        assert_eq!(s.items, vec![Row { id: 2, name: "B2" }, Row { id: 1, name: "A" }]);
    }

    #[test]
    fn test_replace_preserves_order() {
        let mut s = state(&[(1, "A"), (2, "B"), (3, "C")]);
        assert!(s.replace(Row { id: 2, name: "B2" }));
        let names: Vec<_> = s.items.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["A", "B2", "C"]);
    }

    #[test]
    fn test_replace_all_keeps_first_of_repeated_ids() {
        let mut s = state(&[(9, "old")]);
        let dropped = s.replace_all(vec![
            Row { id: 1, name: "A" },
            Row { id: 2, name: "B" },
            Row { id: 1, name: "A again" },
        ]);
        assert_eq!(dropped, 1);
        assert_eq!(s.items, vec![Row { id: 1, name: "A" }, Row { id: 2, name: "B" }]);
    }

    #[test]
    fn test_replace_and_remove_missing_are_no_ops() {
        let mut s = state(&[(1, "A")]);
        assert!(!s.replace(Row { id: 9, name: "Z" }));
        assert!(!s.remove(&9));
        assert_eq!(s.items, vec![Row { id: 1, name: "A" }]);
    }
}
