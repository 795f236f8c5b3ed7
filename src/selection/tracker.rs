//! Ordered id set with a consumer-cleared change flag.

use std::collections::HashSet;

use crate::tree::DataId;

/// Tracks selected ids in selection order.
///
/// Every effective mutation raises a dirty flag that stays raised until the
/// consumer calls [`reset_selection_changed`](Self::reset_selection_changed),
/// so a batch of changes produces a single notification.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    order: Vec<DataId>,
    members: HashSet<DataId>,
    changed: bool,
}

impl SelectionTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id. Returns `false` if it was already present.
    pub fn add(&mut self, id: DataId) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.order.push(id);
        self.changed = true;
        true
    }

    /// Remove an id. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &DataId) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.order.retain(|i| i != id);
        self.changed = true;
        true
    }

    /// Remove every id.
    pub fn reset(&mut self) {
        if self.order.is_empty() {
            return;
        }
        self.order.clear();
        self.members.clear();
        self.changed = true;
    }

    /// Make the tracked set equal to `ids`, touching only the difference.
    pub fn replace(&mut self, ids: &[DataId]) {
        let wanted: HashSet<&DataId> = ids.iter().collect();
        let stale: Vec<DataId> = self
            .order
            .iter()
            .filter(|id| !wanted.contains(id))
            .cloned()
            .collect();
        for id in &stale {
            self.remove(id);
        }
        for id in ids {
            self.add(id.clone());
        }
    }

    /// Whether `id` is tracked.
    pub fn contains(&self, id: &DataId) -> bool {
        self.members.contains(id)
    }

    /// Tracked ids in insertion order.
    pub fn ids(&self) -> &[DataId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether anything changed since the last reset of the flag.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Clear the change flag.
    pub fn reset_selection_changed(&mut self) {
        self.changed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DataId {
        DataId::from(s)
    }

    #[test]
    fn new_is_clean() {
        let t = SelectionTracker::new();
        assert!(t.is_empty());
        assert!(!t.is_changed());
    }

    #[test]
    fn add_twice_keeps_size() {
        let mut t = SelectionTracker::new();
        assert!(t.add(id("a")));
        assert!(!t.add(id("a")));
        assert_eq!(t.len(), 1);
        assert!(t.is_changed());
    }

    #[test]
    fn flag_cleared_only_explicitly() {
        let mut t = SelectionTracker::new();
        t.add(id("a"));
        t.add(id("a"));
        assert!(t.is_changed());
        t.reset_selection_changed();
        assert!(!t.is_changed());
        t.add(id("a"));
        assert!(!t.is_changed());
    }

    #[test]
    fn remove_and_order() {
        let mut t = SelectionTracker::new();
        t.add(id("c"));
        t.add(id("a"));
        t.add(id("b"));
        t.reset_selection_changed();
        assert!(t.remove(&id("a")));
        assert!(!t.remove(&id("a")));
        assert_eq!(t.ids(), &[id("c"), id("b")]);
        assert!(t.is_changed());
    }

    #[test]
    fn reset_empty_is_not_a_change() {
        let mut t = SelectionTracker::new();
        t.reset();
        assert!(!t.is_changed());
        t.add(id("a"));
        t.reset_selection_changed();
        t.reset();
        assert!(t.is_empty());
        assert!(t.is_changed());
    }

    #[test]
    fn replace_touches_difference_only() {
        let mut t = SelectionTracker::new();
        t.add(id("a"));
        t.add(id("b"));
        t.reset_selection_changed();
        t.replace(&[id("a"), id("b")]);
        assert!(!t.is_changed());
        t.replace(&[id("b"), id("c")]);
        assert_eq!(t.ids(), &[id("b"), id("c")]);
        assert!(t.is_changed());
    }
}
