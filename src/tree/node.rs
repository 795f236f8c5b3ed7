//! Node types: NodeKey, DataId, TreeNode, ChildrenState.

use std::fmt;

use slotmap::{new_key_type, Key};

new_key_type! {
    /// Ephemeral identifier for a tree node. Copy, lightweight (u64).
    ///
    /// Keys are only meaningful within the arena that issued them and are
    /// regenerated whenever a tree is rebuilt. Anything that must survive a
    /// reload is keyed on [`DataId`] instead.
    pub struct NodeKey;
}

impl NodeKey {
    /// Stable string form used as the row id handed to the row view.
    pub fn row_id(self) -> String {
        format!("node-{}", self.data().as_ffi())
    }
}

/// Stable external identity of a data item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DataId(String);

impl DataId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (an unresolved item).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DataId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for DataId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// How much of a node's child list has been fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildrenState {
    /// Nothing fetched yet; expanding requires a fetch.
    #[default]
    Unloaded,
    /// Every child is present.
    Loaded,
    /// Some pages are present; the next page starts at `next_offset`.
    Partial { next_offset: usize },
}

impl ChildrenState {
    /// Whether a fetch has completed for this node at least once.
    pub fn is_loaded(self) -> bool {
        !matches!(self, ChildrenState::Unloaded)
    }

    /// Whether more pages remain to be fetched.
    pub fn has_more(self) -> bool {
        matches!(self, ChildrenState::Partial { .. })
    }

    /// State after a page ending at `fetched` out of `total` known children.
    pub fn after_page(fetched: usize, total: Option<usize>) -> Self {
        match total {
            Some(total) if fetched < total => ChildrenState::Partial {
                next_offset: fetched,
            },
            _ => ChildrenState::Loaded,
        }
    }
}

/// A tree element wrapping one data item plus structural and selection flags.
///
/// Parent/child links live in the owning [`Tree`](super::Tree), not here.
#[derive(Debug, Clone)]
pub struct TreeNode<D> {
    /// Stable identity of the wrapped item.
    pub data_id: DataId,
    /// The item itself; `None` until it has been fetched.
    pub data: Option<D>,
    /// Whether the children are shown.
    pub expanded: bool,
    /// Whether the item reports children (drives the expander).
    pub expandable: bool,
    /// Whether the row may take part in a selection.
    pub selectable: bool,
    /// Whether the row is currently selected.
    pub selected: bool,
    /// Whether the node has been promoted to a root child.
    pub pinned: bool,
    /// Known total child count, used for paging.
    pub max_children: Option<usize>,
    /// Fetch progress of the child list.
    pub children_state: ChildrenState,
}

impl<D> TreeNode<D> {
    /// Create a node wrapping fetched data.
    pub fn new(data_id: impl Into<DataId>, data: D) -> Self {
        Self {
            data_id: data_id.into(),
            data: Some(data),
            expanded: false,
            expandable: false,
            selectable: true,
            selected: false,
            pinned: false,
            max_children: None,
            children_state: ChildrenState::Unloaded,
        }
    }

    /// Create a node known only by its id, data still to be fetched.
    pub fn unresolved(data_id: impl Into<DataId>) -> Self {
        Self {
            data_id: data_id.into(),
            data: None,
            expanded: false,
            expandable: false,
            selectable: true,
            selected: false,
            pinned: false,
            max_children: None,
            children_state: ChildrenState::Unloaded,
        }
    }

    /// Set whether the node reports children (builder).
    pub fn expandable(mut self, expandable: bool) -> Self {
        self.expandable = expandable;
        self
    }

    /// Set whether the node can be selected (builder).
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Set the known child count (builder).
    pub fn with_max_children(mut self, max: usize) -> Self {
        self.max_children = Some(max);
        self
    }

    /// Whether the data has been fetched.
    pub fn is_resolved(&self) -> bool {
        self.data.is_some()
    }

    /// Borrow the data, if resolved.
    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults() {
        let node = TreeNode::new("a", 1_u32);
        assert_eq!(node.data_id.as_str(), "a");
        assert_eq!(node.data(), Some(&1));
        assert!(!node.expanded);
        assert!(!node.expandable);
        assert!(node.selectable);
        assert!(!node.selected);
        assert!(!node.pinned);
        assert_eq!(node.children_state, ChildrenState::Unloaded);
    }

    #[test]
    fn unresolved_has_no_data() {
        let node: TreeNode<u32> = TreeNode::unresolved("x");
        assert!(!node.is_resolved());
        assert_eq!(node.data_id, DataId::from("x"));
    }

    #[test]
    fn builders() {
        let node = TreeNode::new("a", ())
            .expandable(true)
            .selectable(false)
            .with_max_children(4);
        assert!(node.expandable);
        assert!(!node.selectable);
        assert_eq!(node.max_children, Some(4));
    }

    #[test]
    fn children_state_after_page() {
        assert_eq!(
            ChildrenState::after_page(1, Some(2)),
            ChildrenState::Partial { next_offset: 1 }
        );
        assert_eq!(ChildrenState::after_page(2, Some(2)), ChildrenState::Loaded);
        assert_eq!(ChildrenState::after_page(5, None), ChildrenState::Loaded);
        assert!(ChildrenState::Partial { next_offset: 3 }.has_more());
        assert!(!ChildrenState::Unloaded.is_loaded());
        assert!(ChildrenState::Loaded.is_loaded());
    }

    #[test]
    fn data_id_display_and_empty() {
        assert_eq!(DataId::new("42").to_string(), "42");
        assert!(DataId::default().is_empty());
    }

    #[test]
    fn row_ids_are_distinct() {
        let mut map = slotmap::SlotMap::<NodeKey, ()>::with_key();
        let a = map.insert(());
        let b = map.insert(());
        assert_ne!(a.row_id(), b.row_id());
        assert!(a.row_id().starts_with("node-"));
    }

    #[test]
    fn node_key_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeKey>();
    }
}
