//! Tree operations: insert, dedup, remove, move, pin, flatten, search.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ChildrenState, DataId, NodeKey, TreeNode};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeKey] = &[];

/// Filters applied by [`Tree::tree_to_list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Include nodes whose data has not been fetched yet.
    pub include_unresolved: bool,
    /// Only descend into expanded nodes.
    pub only_expanded: bool,
    /// Only report selected nodes (traversal still visits everything else).
    pub only_selected: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            include_unresolved: true,
            only_expanded: false,
            only_selected: false,
        }
    }
}

impl FlattenOptions {
    /// Every node whose ancestors are all expanded.
    pub fn visible() -> Self {
        Self {
            only_expanded: true,
            ..Self::default()
        }
    }
}

/// A data tree backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so child order is explicit and parent lookup is O(1).
/// The arena always holds a synthetic root with no data; it is permanently
/// expanded and every top-level item is its child.
#[derive(Debug, Clone)]
pub struct Tree<D> {
    nodes: SlotMap<NodeKey, TreeNode<D>>,
    children: SecondaryMap<NodeKey, Vec<NodeKey>>,
    parent: SecondaryMap<NodeKey, NodeKey>,
    root: NodeKey,
}

impl<D> Tree<D> {
    /// Create a tree holding only the synthetic root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root_node = TreeNode::unresolved(DataId::default()).expandable(true);
        root_node.expanded = true;
        root_node.selectable = false;
        let root = nodes.insert(root_node);
        let mut children = SecondaryMap::new();
        children.insert(root, Vec::new());
        Self {
            nodes,
            children,
            parent: SecondaryMap::new(),
            root,
        }
    }

    /// The synthetic root.
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Immutable access to a node.
    pub fn get(&self, key: NodeKey) -> Option<&TreeNode<D>> {
        self.nodes.get(key)
    }

    /// Mutable access to a node.
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut TreeNode<D>> {
        self.nodes.get_mut(key)
    }

    /// Whether the tree contains `key`.
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of nodes, not counting the synthetic root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether the tree has no nodes besides the root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The parent of a node. Top-level nodes report the synthetic root.
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.parent.get(key).copied()
    }

    /// The children of a node, in order. Empty if the node does not exist.
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.children
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `key` up to the root, collecting ancestor keys.
    ///
    /// Starts with the immediate parent and ends with the synthetic root.
    pub fn ancestors(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut result = Vec::new();
        let mut current = key;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Position of `key` within its parent's child list.
    pub fn index_in_parent(&self, key: NodeKey) -> Option<usize> {
        let parent = self.parent(key)?;
        self.children(parent).iter().position(|&c| c == key)
    }

    /// The child of `parent` carrying `data_id`, if any.
    pub fn child_with_data_id(&self, parent: NodeKey, data_id: &DataId) -> Option<NodeKey> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.nodes.get(c).is_some_and(|n| &n.data_id == data_id))
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Insert `node` under `parent` at `index` (clamped to the child count).
    ///
    /// Children are unique by data id: if a sibling already carries the same
    /// id, that sibling's data and paging hints are replaced and its key is
    /// returned instead. Returns `None` if `parent` does not exist.
    pub fn insert_child(
        &mut self,
        parent: NodeKey,
        node: TreeNode<D>,
        index: usize,
    ) -> Option<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        if let Some(existing) = self.child_with_data_id(parent, &node.data_id) {
            self.merge_into(existing, node);
            return Some(existing);
        }
        let key = self.nodes.insert(node);
        self.children.insert(key, Vec::new());
        self.parent.insert(key, parent);
        let siblings = self.children.get_mut(parent)?;
        let index = index.min(siblings.len());
        siblings.insert(index, key);
        Some(key)
    }

    /// Append `node` as the last child of `parent`. Deduplicates like
    /// [`insert_child`](Self::insert_child).
    pub fn add_child(&mut self, parent: NodeKey, node: TreeNode<D>) -> Option<NodeKey> {
        let end = self.children(parent).len();
        self.insert_child(parent, node, end)
    }

    /// Replace the data of the child of `parent` carrying `data_id`.
    pub fn update_child(&mut self, parent: NodeKey, data_id: &DataId, data: D) -> Option<NodeKey> {
        let key = self.child_with_data_id(parent, data_id)?;
        if let Some(node) = self.nodes.get_mut(key) {
            node.data = Some(data);
        }
        Some(key)
    }

    /// Remove `child` (and its subtree) from `parent`.
    ///
    /// Removing the last child collapses the parent. Returns the removed
    /// node, or `None` if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> Option<TreeNode<D>> {
        if self.parent(child) != Some(parent) {
            return None;
        }
        self.detach(child);
        let removed = self.drop_subtree(child);
        self.collapse_if_childless(parent);
        removed
    }

    /// Remove a node and its subtree wherever it sits. The root cannot be removed.
    pub fn remove(&mut self, key: NodeKey) -> Option<TreeNode<D>> {
        let parent = self.parent(key)?;
        self.remove_child(parent, key)
    }

    /// Remove every child of `parent`. The parent is collapsed and marked
    /// unloaded. Returns the number of direct children removed.
    pub fn remove_children(&mut self, parent: NodeKey) -> usize {
        let kids = match self.children.get_mut(parent) {
            Some(kids) => std::mem::take(kids),
            None => return 0,
        };
        for &kid in &kids {
            self.parent.remove(kid);
            self.drop_subtree(kid);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            if parent != self.root {
                node.expanded = false;
            }
            node.children_state = ChildrenState::Unloaded;
        }
        kids.len()
    }

    /// Replace the children of `parent` with `nodes`.
    ///
    /// Duplicate data ids within `nodes` are dropped (first occurrence wins).
    /// Returns the keys of the new children in order.
    pub fn set_children(&mut self, parent: NodeKey, nodes: Vec<TreeNode<D>>) -> Vec<NodeKey> {
        let kids = self
            .children
            .get_mut(parent)
            .map(std::mem::take)
            .unwrap_or_default();
        for kid in kids {
            self.parent.remove(kid);
            self.drop_subtree(kid);
        }
        self.append_children(parent, nodes)
    }

    /// Append `nodes` after the existing children of `parent`.
    ///
    /// A node whose data id already exists among the children (existing or
    /// earlier in `nodes`) is merged into that child instead of added.
    /// Returns one key per input node, in input order, with duplicates merged.
    pub fn append_children(&mut self, parent: NodeKey, nodes: Vec<TreeNode<D>>) -> Vec<NodeKey> {
        let mut keys = Vec::with_capacity(nodes.len());
        for node in nodes {
            if let Some(existing) = self.child_with_data_id(parent, &node.data_id) {
                if !keys.contains(&existing) {
                    self.merge_into(existing, node);
                    keys.push(existing);
                }
                continue;
            }
            if let Some(key) = self.add_child(parent, node) {
                keys.push(key);
            }
        }
        keys
    }

    /// Move the child at `from` to position `to` within `parent`'s children.
    ///
    /// Returns `false` if either index is out of range.
    pub fn move_child(&mut self, parent: NodeKey, from: usize, to: usize) -> bool {
        let Some(kids) = self.children.get_mut(parent) else {
            return false;
        };
        if from >= kids.len() || to >= kids.len() {
            return false;
        }
        let key = kids.remove(from);
        kids.insert(to, key);
        true
    }

    /// Move `key` with its subtree under `new_parent` at `index`.
    ///
    /// The old parent collapses if this removed its last child.
    pub fn reparent(&mut self, key: NodeKey, new_parent: NodeKey, index: usize) -> bool {
        if key == self.root || !self.nodes.contains_key(new_parent) {
            return false;
        }
        if key == new_parent || self.ancestors(new_parent).contains(&key) {
            return false;
        }
        let old_parent = self.detach(key);
        self.parent.insert(key, new_parent);
        if let Some(siblings) = self.children.get_mut(new_parent) {
            let index = index.min(siblings.len());
            siblings.insert(index, key);
        }
        if let Some(old) = old_parent {
            self.collapse_if_childless(old);
        }
        true
    }

    /// Promote `key` to be a direct child of the root, placed first.
    ///
    /// No-op (returns `false`) if a root child already carries the same data id,
    /// which includes the node itself having been pinned before.
    pub fn pin_to_root(&mut self, key: NodeKey) -> bool {
        let Some(data_id) = self.nodes.get(key).map(|n| n.data_id.clone()) else {
            return false;
        };
        if key == self.root || self.child_with_data_id(self.root, &data_id).is_some() {
            return false;
        }
        let root = self.root;
        if !self.reparent(key, root, 0) {
            return false;
        }
        if let Some(node) = self.nodes.get_mut(key) {
            node.pinned = true;
        }
        true
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Pre-order list of the descendants of `start` (excluding `start`).
    pub fn tree_to_list(&self, start: NodeKey, options: FlattenOptions) -> Vec<NodeKey> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeKey> = self.children(start).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            let resolved_ok = options.include_unresolved || node.is_resolved();
            let selected_ok = !options.only_selected || node.selected;
            if resolved_ok && selected_ok {
                result.push(current);
            }
            if options.only_expanded && !node.expanded {
                continue;
            }
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// First node carrying `data_id` in depth-first pre-order.
    pub fn find_node(&self, data_id: &DataId) -> Option<NodeKey> {
        self.walk_depth_first(self.root)
            .into_iter()
            .skip(1)
            .find(|&k| self.nodes.get(k).is_some_and(|n| &n.data_id == data_id))
    }

    /// Every node carrying `data_id`, in depth-first pre-order.
    pub fn find_nodes(&self, data_id: &DataId) -> Vec<NodeKey> {
        self.walk_depth_first(self.root)
            .into_iter()
            .skip(1)
            .filter(|&k| self.nodes.get(k).is_some_and(|n| &n.data_id == data_id))
            .collect()
    }

    /// Depth of `key` below the root. Top-level nodes are level 0.
    pub fn calc_level(&self, key: NodeKey) -> usize {
        self.ancestors(key).len().saturating_sub(1)
    }

    /// Whether every ancestor of `key` is expanded.
    pub fn is_visible(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
            && self
                .ancestors(key)
                .into_iter()
                .all(|a| self.nodes.get(a).is_some_and(|n| n.expanded))
    }

    /// Number of rows the descendants of `start` occupy when shown.
    pub fn visible_count(&self, start: NodeKey) -> usize {
        self.tree_to_list(start, FlattenOptions::visible()).len()
    }

    /// Pre-order depth-first traversal starting from (and including) `start`.
    pub fn walk_depth_first(&self, start: NodeKey) -> Vec<NodeKey> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Unlink `key` from its parent's child list. Returns the old parent.
    fn detach(&mut self, key: NodeKey) -> Option<NodeKey> {
        let parent = self.parent.remove(key)?;
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.retain(|&c| c != key);
        }
        Some(parent)
    }

    /// Drop `key` and all descendants from the arena (BFS). Links to `key`
    /// from its parent must already be gone.
    fn drop_subtree(&mut self, key: NodeKey) -> Option<TreeNode<D>> {
        let mut queue = VecDeque::new();
        queue.push_back(key);
        let mut removed = None;
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            let node = self.nodes.remove(current);
            if current == key {
                removed = node;
            }
        }
        removed
    }

    fn collapse_if_childless(&mut self, key: NodeKey) {
        if key == self.root || !self.children(key).is_empty() {
            return;
        }
        if let Some(node) = self.nodes.get_mut(key) {
            node.expanded = false;
        }
    }

    fn merge_into(&mut self, existing: NodeKey, incoming: TreeNode<D>) {
        if let Some(node) = self.nodes.get_mut(existing) {
            if incoming.data.is_some() {
                node.data = incoming.data;
            }
            node.expandable = incoming.expandable;
            node.selectable = incoming.selectable;
            if incoming.max_children.is_some() {
                node.max_children = incoming.max_children;
            }
        }
    }
}

impl<D> Default for Tree<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(id: &str) -> TreeNode<String> {
        TreeNode::new(id, id.to_uppercase())
    }

    /// Build a small test tree:
    /// ```text
    ///      (root)
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (Tree<String>, NodeKey, NodeKey, NodeKey, NodeKey) {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.add_child(root, node("a").expandable(true)).unwrap();
        let b = tree.add_child(root, node("b")).unwrap();
        let c = tree.add_child(a, node("c")).unwrap();
        let d = tree.add_child(a, node("d").expandable(true)).unwrap();
        (tree, a, b, c, d)
    }

    fn ids(tree: &Tree<String>, keys: &[NodeKey]) -> Vec<String> {
        keys.iter()
            .map(|&k| tree.get(k).unwrap().data_id.to_string())
            .collect()
    }

    // ── Structure ────────────────────────────────────────────────────

    #[test]
    fn new_tree_is_empty() {
        let tree: Tree<String> = Tree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.get(tree.root()).unwrap().expanded);
    }

    #[test]
    fn parent_relationship() {
        let (tree, a, _b, c, _d) = build_tree();
        assert_eq!(tree.parent(a), Some(tree.root()));
        assert_eq!(tree.parent(c), Some(a));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn children_in_order() {
        let (tree, a, b, c, d) = build_tree();
        assert_eq!(tree.children(tree.root()), &[a, b]);
        assert_eq!(tree.children(a), &[c, d]);
        assert!(tree.children(c).is_empty());
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn insert_child_at_index() {
        let (mut tree, a, _b, c, d) = build_tree();
        let e = tree.insert_child(a, node("e"), 1).unwrap();
        assert_eq!(tree.children(a), &[c, e, d]);
        let f = tree.insert_child(a, node("f"), 99).unwrap();
        assert_eq!(tree.children(a).last(), Some(&f));
    }

    #[test]
    fn add_child_dedups_by_data_id() {
        let (mut tree, a, _b, c, _d) = build_tree();
        let again = tree.add_child(a, TreeNode::new("c", "NEW".to_string())).unwrap();
        assert_eq!(again, c);
        assert_eq!(tree.children(a).len(), 2);
        assert_eq!(tree.get(c).unwrap().data(), Some(&"NEW".to_string()));
    }

    #[test]
    fn update_child_replaces_data() {
        let (mut tree, a, _b, c, _d) = build_tree();
        let key = tree.update_child(a, &DataId::from("c"), "changed".into());
        assert_eq!(key, Some(c));
        assert_eq!(tree.get(c).unwrap().data(), Some(&"changed".to_string()));
        assert!(tree.update_child(a, &DataId::from("zz"), "x".into()).is_none());
    }

    #[test]
    fn set_children_dedups() {
        let (mut tree, _a, b, ..) = build_tree();
        let keys = tree.set_children(b, vec![node("x"), node("y"), node("x")]);
        assert_eq!(keys.len(), 2);
        assert_eq!(ids(&tree, tree.children(b)), vec!["x", "y"]);
    }

    #[test]
    fn set_children_replaces_old_subtree() {
        let (mut tree, a, _b, c, d) = build_tree();
        tree.set_children(a, vec![node("z")]);
        assert!(!tree.contains(c));
        assert!(!tree.contains(d));
        assert_eq!(ids(&tree, tree.children(a)), vec!["z"]);
    }

    #[test]
    fn append_children_merges_existing() {
        let (mut tree, a, ..) = build_tree();
        let keys = tree.append_children(a, vec![node("d"), node("e")]);
        assert_eq!(keys.len(), 2);
        assert_eq!(ids(&tree, tree.children(a)), vec!["c", "d", "e"]);
    }

    // ── Removal ──────────────────────────────────────────────────────

    #[test]
    fn remove_child_subtree() {
        let (mut tree, a, b, c, d) = build_tree();
        let removed = tree.remove_child(tree.root(), a).unwrap();
        assert_eq!(removed.data_id.as_str(), "a");
        assert!(!tree.contains(c));
        assert!(!tree.contains(d));
        assert_eq!(tree.children(tree.root()), &[b]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn remove_child_wrong_parent() {
        let (mut tree, _a, b, c, _d) = build_tree();
        assert!(tree.remove_child(b, c).is_none());
        assert!(tree.contains(c));
    }

    #[test]
    fn removing_last_child_collapses_parent() {
        let (mut tree, a, _b, c, d) = build_tree();
        tree.get_mut(a).unwrap().expanded = true;
        tree.remove_child(a, c);
        assert!(tree.get(a).unwrap().expanded);
        tree.remove_child(a, d);
        assert!(!tree.get(a).unwrap().expanded);
    }

    #[test]
    fn remove_children_resets_state() {
        let (mut tree, a, ..) = build_tree();
        tree.get_mut(a).unwrap().expanded = true;
        tree.get_mut(a).unwrap().children_state = ChildrenState::Loaded;
        assert_eq!(tree.remove_children(a), 2);
        let node = tree.get(a).unwrap();
        assert!(!node.expanded);
        assert_eq!(node.children_state, ChildrenState::Unloaded);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn root_cannot_be_removed() {
        let (mut tree, ..) = build_tree();
        let root = tree.root();
        assert!(tree.remove(root).is_none());
        assert!(tree.contains(root));
    }

    // ── Move / pin ───────────────────────────────────────────────────

    #[test]
    fn move_child_reorders() {
        let (mut tree, a, _b, c, d) = build_tree();
        let e = tree.add_child(a, node("e")).unwrap();
        assert!(tree.move_child(a, 0, 2));
        assert_eq!(tree.children(a), &[d, e, c]);
        assert!(!tree.move_child(a, 0, 3));
    }

    #[test]
    fn reparent_rejects_cycles() {
        let (mut tree, a, _b, c, _d) = build_tree();
        assert!(!tree.reparent(a, c, 0));
        assert_eq!(tree.parent(c), Some(a));
    }

    #[test]
    fn pin_deep_node_to_root() {
        let (mut tree, a, b, _c, d) = build_tree();
        let e = tree.add_child(d, node("e")).unwrap();
        assert_eq!(tree.calc_level(e), 2);
        assert!(tree.pin_to_root(e));
        assert_eq!(tree.children(tree.root()), &[e, a, b]);
        assert!(tree.get(e).unwrap().pinned);
        assert_eq!(tree.calc_level(e), 0);
        assert!(!tree.pin_to_root(e));
        assert_eq!(tree.children(tree.root()).len(), 3);
    }

    #[test]
    fn pin_skips_when_root_child_shares_id() {
        let (mut tree, _a, _b, c, _d) = build_tree();
        let dup = tree.add_child(c, node("b")).unwrap();
        assert!(!tree.pin_to_root(dup));
        assert_eq!(tree.parent(dup), Some(c));
    }

    // ── Queries ──────────────────────────────────────────────────────

    #[test]
    fn tree_to_list_full_preorder() {
        let (tree, ..) = build_tree();
        let list = tree.tree_to_list(tree.root(), FlattenOptions::default());
        assert_eq!(ids(&tree, &list), vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn tree_to_list_only_expanded() {
        let (mut tree, a, ..) = build_tree();
        let list = tree.tree_to_list(tree.root(), FlattenOptions::visible());
        assert_eq!(ids(&tree, &list), vec!["a", "b"]);
        tree.get_mut(a).unwrap().expanded = true;
        let list = tree.tree_to_list(tree.root(), FlattenOptions::visible());
        assert_eq!(ids(&tree, &list), vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn tree_to_list_only_selected_and_resolved() {
        let (mut tree, a, b, _c, d) = build_tree();
        tree.add_child(b, TreeNode::unresolved("u"));
        tree.get_mut(d).unwrap().selected = true;
        tree.get_mut(b).unwrap().selected = true;
        let selected = tree.tree_to_list(
            tree.root(),
            FlattenOptions {
                only_selected: true,
                ..FlattenOptions::default()
            },
        );
        assert_eq!(ids(&tree, &selected), vec!["d", "b"]);
        let resolved = tree.tree_to_list(
            tree.root(),
            FlattenOptions {
                include_unresolved: false,
                ..FlattenOptions::default()
            },
        );
        assert_eq!(ids(&tree, &resolved), vec!["a", "c", "d", "b"]);
        assert!(tree.tree_to_list(a, FlattenOptions::default()).len() == 2);
    }

    #[test]
    fn find_node_and_nodes() {
        let (mut tree, _a, b, c, _d) = build_tree();
        let dup = tree.add_child(b, node("c")).unwrap();
        assert_eq!(tree.find_node(&DataId::from("c")), Some(c));
        assert_eq!(tree.find_nodes(&DataId::from("c")), vec![c, dup]);
        assert!(tree.find_node(&DataId::from("nope")).is_none());
    }

    #[test]
    fn levels_and_visibility() {
        let (mut tree, a, b, c, _d) = build_tree();
        assert_eq!(tree.calc_level(a), 0);
        assert_eq!(tree.calc_level(c), 1);
        assert!(tree.is_visible(b));
        assert!(!tree.is_visible(c));
        tree.get_mut(a).unwrap().expanded = true;
        assert!(tree.is_visible(c));
    }

    #[test]
    fn visible_count_follows_expansion() {
        let (mut tree, a, _b, _c, d) = build_tree();
        tree.add_child(d, node("e"));
        let root = tree.root();
        assert_eq!(tree.visible_count(root), 2);
        tree.get_mut(a).unwrap().expanded = true;
        assert_eq!(tree.visible_count(root), 4);
        tree.get_mut(d).unwrap().expanded = true;
        assert_eq!(tree.visible_count(root), 5);
        tree.get_mut(a).unwrap().expanded = false;
        assert_eq!(tree.visible_count(root), 2);
    }

    #[test]
    fn index_in_parent() {
        let (tree, a, b, _c, d) = build_tree();
        assert_eq!(tree.index_in_parent(a), Some(0));
        assert_eq!(tree.index_in_parent(b), Some(1));
        assert_eq!(tree.index_in_parent(d), Some(1));
        assert_eq!(tree.index_in_parent(tree.root()), None);
    }
}
