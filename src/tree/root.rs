//! Default/filtered tree pair with selection kept alive across filter toggles.

use std::collections::HashSet;

use super::arena::Tree;
use super::node::DataId;

/// How a proposed selection differs from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionChangeType {
    /// Only new ids.
    Added,
    /// Only dropped ids.
    Removed,
    /// Both new and dropped ids.
    Mixed,
    /// Same id set.
    #[default]
    None,
}

impl SelectionChangeType {
    /// Whether listeners should hear about this change.
    pub fn is_change(self) -> bool {
        self != SelectionChangeType::None
    }

    /// Whether ids were dropped, so the stash may need pruning.
    pub fn has_removals(self) -> bool {
        matches!(self, SelectionChangeType::Removed | SelectionChangeType::Mixed)
    }
}

/// A selected item, held by data id so it survives structural rebuilds.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedItem<D> {
    pub data_id: DataId,
    pub data: Option<D>,
}

impl<D> SelectedItem<D> {
    pub fn new(data_id: DataId, data: Option<D>) -> Self {
        Self { data_id, data }
    }
}

/// Owns the default and filtered trees and the cross-filter selection.
///
/// Invariant: no data id is in both the current and the stashed selection.
#[derive(Debug, Clone)]
pub struct TreeRoot<D> {
    default_tree: Tree<D>,
    filtered_tree: Tree<D>,
    filtered: bool,
    current_selection: Vec<SelectedItem<D>>,
    stashed_selection: Vec<SelectedItem<D>>,
    selection_change_type: SelectionChangeType,
}

impl<D> TreeRoot<D> {
    /// Create a root with two empty trees, showing the default one.
    pub fn new() -> Self {
        Self {
            default_tree: Tree::new(),
            filtered_tree: Tree::new(),
            filtered: false,
            current_selection: Vec::new(),
            stashed_selection: Vec::new(),
            selection_change_type: SelectionChangeType::None,
        }
    }

    /// Whether the filtered tree is the current one.
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    /// Switch between the default and filtered trees.
    ///
    /// Turning filtering on discards the previous filtered tree. Either way the
    /// current selection moves to the stash; [`restore_stashed`](Self::restore_stashed)
    /// brings back whatever the newly current tree contains.
    pub fn set_filtered(&mut self, filtered: bool) {
        self.stash_current();
        if filtered {
            self.filtered_tree = Tree::new();
        }
        self.filtered = filtered;
    }

    /// The tree currently shown.
    pub fn current(&self) -> &Tree<D> {
        if self.filtered {
            &self.filtered_tree
        } else {
            &self.default_tree
        }
    }

    /// Mutable access to the tree currently shown.
    pub fn current_mut(&mut self) -> &mut Tree<D> {
        if self.filtered {
            &mut self.filtered_tree
        } else {
            &mut self.default_tree
        }
    }

    /// The unfiltered tree.
    pub fn default_tree(&self) -> &Tree<D> {
        &self.default_tree
    }

    /// The filtered tree (empty while not filtering).
    pub fn filtered_tree(&self) -> &Tree<D> {
        &self.filtered_tree
    }

    /// Replace the current tree wholesale (reload), keeping the selection
    /// and re-marking nodes that carry selected ids.
    pub fn replace_current(&mut self, tree: Tree<D>) {
        *self.current_mut() = tree;
        self.sync_selected_flags();
    }

    // ── Selection ────────────────────────────────────────────────────

    /// The current selection, in selection order (last is the anchor).
    pub fn current_selection(&self) -> &[SelectedItem<D>] {
        &self.current_selection
    }

    /// Selection entries parked while their nodes are not in the current tree.
    pub fn stashed_selection(&self) -> &[SelectedItem<D>] {
        &self.stashed_selection
    }

    /// Ids of the current selection, in order.
    pub fn current_ids(&self) -> Vec<DataId> {
        self.current_selection
            .iter()
            .map(|s| s.data_id.clone())
            .collect()
    }

    /// Whether `data_id` is in the current selection.
    pub fn is_selected(&self, data_id: &DataId) -> bool {
        self.current_selection.iter().any(|s| &s.data_id == data_id)
    }

    /// The classification computed by the last [`update_selection`](Self::update_selection).
    pub fn selection_change_type(&self) -> SelectionChangeType {
        self.selection_change_type
    }

    /// Classify `new_ids` against the current selection.
    pub fn calc_selection_change_type(&self, new_ids: &[DataId]) -> SelectionChangeType {
        let old: HashSet<&DataId> = self.current_selection.iter().map(|s| &s.data_id).collect();
        let new: HashSet<&DataId> = new_ids.iter().collect();
        let added = new.difference(&old).next().is_some();
        let removed = old.difference(&new).next().is_some();
        match (added, removed) {
            (true, true) => SelectionChangeType::Mixed,
            (true, false) => SelectionChangeType::Added,
            (false, true) => SelectionChangeType::Removed,
            (false, false) => SelectionChangeType::None,
        }
    }

    /// Make `selection` the current selection.
    ///
    /// Ids dropped from the current selection are also pruned from the stash,
    /// and the stash loses any id now current.
    pub fn update_selection(&mut self, selection: Vec<SelectedItem<D>>) -> SelectionChangeType {
        let new_ids: Vec<DataId> = selection.iter().map(|s| s.data_id.clone()).collect();
        let change = self.calc_selection_change_type(&new_ids);
        if change.has_removals() {
            let keep: HashSet<&DataId> = new_ids.iter().collect();
            let dropped: HashSet<DataId> = self
                .current_selection
                .iter()
                .filter(|s| !keep.contains(&s.data_id))
                .map(|s| s.data_id.clone())
                .collect();
            self.stashed_selection
                .retain(|s| !dropped.contains(&s.data_id));
        }
        self.current_selection = dedup_by_id(selection);
        self.enforce_disjoint();
        self.sync_selected_flags();
        self.selection_change_type = change;
        change
    }

    /// Move stashed entries whose ids exist in the current tree back into
    /// the current selection. Returns the restored ids.
    pub fn restore_stashed(&mut self) -> Vec<DataId> {
        let (present, absent): (Vec<_>, Vec<_>) = std::mem::take(&mut self.stashed_selection)
            .into_iter()
            .partition(|s| self.current().find_node(&s.data_id).is_some());
        self.stashed_selection = absent;
        let restored: Vec<DataId> = present.iter().map(|s| s.data_id.clone()).collect();
        self.current_selection.extend(present);
        self.current_selection = dedup_by_id(std::mem::take(&mut self.current_selection));
        self.enforce_disjoint();
        self.sync_selected_flags();
        restored
    }

    /// Forget `ids` entirely (current and stash). Returns how many entries went.
    pub fn remove_from_selection(&mut self, ids: &[DataId]) -> usize {
        let before = self.current_selection.len() + self.stashed_selection.len();
        self.current_selection.retain(|s| !ids.contains(&s.data_id));
        self.stashed_selection.retain(|s| !ids.contains(&s.data_id));
        self.sync_selected_flags();
        before - self.current_selection.len() - self.stashed_selection.len()
    }

    /// Ids of the current and stashed selection, current first.
    ///
    /// Empty ids never appear. With `unique_only`, repeated ids are dropped.
    pub fn get_full_selection(&self, unique_only: bool) -> Vec<DataId> {
        let all = self
            .current_selection
            .iter()
            .chain(self.stashed_selection.iter())
            .map(|s| &s.data_id)
            .filter(|id| !id.is_empty());
        if !unique_only {
            return all.cloned().collect();
        }
        let mut seen = HashSet::new();
        all.filter(|id| seen.insert(*id)).cloned().collect()
    }

    fn stash_current(&mut self) {
        let current = std::mem::take(&mut self.current_selection);
        for item in current {
            self.stashed_selection.retain(|s| s.data_id != item.data_id);
            self.stashed_selection.push(item);
        }
        self.sync_selected_flags();
    }

    fn enforce_disjoint(&mut self) {
        let current: HashSet<DataId> = self
            .current_selection
            .iter()
            .map(|s| s.data_id.clone())
            .collect();
        self.stashed_selection
            .retain(|s| !current.contains(&s.data_id));
    }

    /// Set `selected` on exactly the current tree's nodes carrying a current id.
    fn sync_selected_flags(&mut self) {
        let ids: HashSet<DataId> = self
            .current_selection
            .iter()
            .map(|s| s.data_id.clone())
            .collect();
        let tree = if self.filtered {
            &mut self.filtered_tree
        } else {
            &mut self.default_tree
        };
        let root = tree.root();
        for key in tree.walk_depth_first(root).into_iter().skip(1) {
            if let Some(node) = tree.get_mut(key) {
                node.selected = ids.contains(&node.data_id);
            }
        }
    }
}

impl<D> Default for TreeRoot<D> {
    fn default() -> Self {
        Self::new()
    }
}

fn dedup_by_id<D>(items: Vec<SelectedItem<D>>) -> Vec<SelectedItem<D>> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|s| seen.insert(s.data_id.clone()))
        .collect()
}
