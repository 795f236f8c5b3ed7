//! The tree grid: lazily fetched nodes projected onto a row view.

use log::{debug, trace, warn};
use tokio::time::Instant;

use super::config::TreeGridConfig;
use super::error::{ErrorHandler, ErrorPanel, LogErrorHandler, Result, TreeGridError};
use super::projection::project;
use super::source::{Page, PageRequest, TreeDataSource};
use super::view::{RowItem, RowView};
use crate::event::{DataChangeKind, EventQueue, KeyBindingRegistry, TreeGridEvent};
use crate::selection::{SelectionDebouncer, SelectionTracker};
use crate::tree::{
    ChildrenState, DataId, FlattenOptions, NodeKey, SelectedItem, SelectionChangeType, Tree,
    TreeNode, TreeRoot,
};

/// Whether the grid is accepting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridState {
    Active,
    /// A structural operation is running.
    Inactive,
    /// A fetch is in flight.
    Loading,
}

/// How a plain click is interpreted, derived from the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    /// Nothing selected: clicks move a single highlight.
    Highlight,
    /// Something selected: clicks toggle selection.
    Select,
}

// ---------------------------------------------------------------------------
// TreeGrid
// ---------------------------------------------------------------------------

/// A hierarchical, virtualized grid over a [`TreeDataSource`].
///
/// The grid owns a [`TreeRoot`] (default and filtered trees plus the
/// selection), projects the current tree into rows, and keeps a [`RowView`]
/// in sync. Structural operations are `async` and take `&mut self`, so two
/// of them can never interleave on one grid.
///
/// Everything the grid wants to tell its host goes into an event queue,
/// drained with [`drain_events`](Self::drain_events).
///
/// Selection notifications are debounced: nothing is queued until the host
/// calls [`flush_selection_changed`](Self::flush_selection_changed) after
/// the quiet period, or runs a [`PagingPoller`](super::PagingPoller), whose
/// ticks do it.
pub struct TreeGrid<S: TreeDataSource, V: RowView> {
    pub(super) source: S,
    pub(super) view: V,
    pub(super) config: TreeGridConfig,
    pub(super) root: TreeRoot<S::Item>,
    pub(super) rows: Vec<RowItem>,
    pub(super) tracker: SelectionTracker,
    pub(super) debouncer: SelectionDebouncer,
    pub(super) pending_change: SelectionChangeType,
    pub(super) bindings: KeyBindingRegistry,
    pub(super) events: EventQueue,
    pub(super) highlighted: Option<DataId>,
    expanded_ids: Vec<DataId>,
    error_handler: Box<dyn ErrorHandler>,
    error_panel: Option<ErrorPanel>,
    active: bool,
    loading: bool,
    visible: bool,
}

impl<S: TreeDataSource, V: RowView> TreeGrid<S, V> {
    /// Create a grid with the default key bindings and a logging error handler.
    ///
    /// Nothing is fetched until [`reload`](Self::reload).
    pub fn new(source: S, view: V, config: TreeGridConfig) -> Self {
        let debouncer = SelectionDebouncer::new(config.selection_debounce);
        let expanded_ids = config.expanded_data_ids.clone();
        Self {
            source,
            view,
            config,
            root: TreeRoot::new(),
            rows: Vec::new(),
            tracker: SelectionTracker::new(),
            debouncer,
            pending_change: SelectionChangeType::None,
            bindings: KeyBindingRegistry::with_defaults(),
            events: EventQueue::new(),
            highlighted: None,
            expanded_ids,
            error_handler: Box::new(LogErrorHandler),
            error_panel: None,
            active: true,
            loading: false,
            visible: true,
        }
    }

    /// Replace the key bindings (builder).
    pub fn with_bindings(mut self, bindings: KeyBindingRegistry) -> Self {
        self.bindings = bindings;
        self
    }

    /// Replace the error handler (builder).
    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Box::new(handler);
        self
    }

    /// Replace the selection debouncer (builder).
    pub fn with_debouncer(mut self, debouncer: SelectionDebouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &TreeGridConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindingRegistry {
        &mut self.bindings
    }

    pub fn tree_root(&self) -> &TreeRoot<S::Item> {
        &self.root
    }

    /// The tree currently shown (filtered or default).
    pub fn tree(&self) -> &Tree<S::Item> {
        self.root.current()
    }

    /// The visible rows, in display order.
    pub fn rows(&self) -> &[RowItem] {
        &self.rows
    }

    pub fn state(&self) -> GridState {
        if self.loading {
            GridState::Loading
        } else if self.active {
            GridState::Active
        } else {
            GridState::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Mark the grid as shown or hidden. Paging only runs while shown.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// The inline error left by the last failure in quiet mode.
    pub fn error_panel(&self) -> Option<&ErrorPanel> {
        self.error_panel.as_ref()
    }

    pub fn highlighted(&self) -> Option<&DataId> {
        self.highlighted.as_ref()
    }

    /// Data ids whose nodes should be expanded once loaded.
    pub fn expanded_data_ids(&self) -> &[DataId] {
        &self.expanded_ids
    }

    pub fn is_filtered(&self) -> bool {
        self.root.is_filtered()
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        if self.root.current_selection().is_empty() {
            InteractionMode::Highlight
        } else {
            InteractionMode::Select
        }
    }

    /// Ids selected in the current tree, in selection order.
    pub fn selected_ids(&self) -> Vec<DataId> {
        self.root.current_ids()
    }

    pub fn selected_items(&self) -> &[SelectedItem<S::Item>] {
        self.root.current_selection()
    }

    /// Current and stashed selection, without repeats.
    pub fn full_selection(&self) -> Vec<DataId> {
        self.root.get_full_selection(true)
    }

    /// Take every pending event.
    pub fn drain_events(&mut self) -> Vec<TreeGridEvent> {
        self.events.drain()
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Fetch the top-level items and rebuild the current tree.
    ///
    /// Selection entries whose ids come back are restored, and nodes listed
    /// in the expanded ids are re-expanded as they load. On failure the
    /// current tree is left untouched.
    pub async fn reload(&mut self) -> Result<()> {
        debug!("reloading tree grid (filtered: {})", self.root.is_filtered());
        self.set_active(false);
        self.set_loading(true);
        let fetched = self
            .source
            .fetch_root(PageRequest::first(self.config.page_size))
            .await;
        self.set_loading(false);
        let result = match fetched {
            Ok(page) => {
                self.install_root_page(page);
                self.error_panel = None;
                let top = self.tree().children(self.tree().root()).to_vec();
                self.restore_expansion(top).await;
                self.events.push(TreeGridEvent::Loaded);
                Ok(())
            }
            Err(err) => Err(self.report(err.into())),
        };
        self.set_active(true);
        result
    }

    /// Switch between the filtered and default trees.
    ///
    /// Turning filtering on fetches a fresh filtered tree. Turning it off
    /// shows the default tree as it was left. Selection carries across
    /// both ways through the stash.
    pub async fn set_filtered(&mut self, filtered: bool) -> Result<()> {
        if !filtered && !self.root.is_filtered() {
            return Ok(());
        }
        self.root.set_filtered(filtered);
        if filtered {
            return self.reload().await;
        }
        self.after_structure_change();
        Ok(())
    }

    /// Expand `key`, fetching its first page of children if none are loaded.
    ///
    /// Returns `Ok(false)` if the node has nothing to show. Expanding an
    /// expanded node is a no-op. On failure the node stays collapsed.
    pub async fn expand(&mut self, key: NodeKey) -> Result<bool> {
        if !self.tree().contains(key) || key == self.tree().root() {
            return Err(self.report(TreeGridError::StaleKey));
        }
        self.set_active(false);
        let result = self.expand_inner(key).await;
        self.set_active(true);
        result.map_err(|err| self.report(err))
    }

    /// Expand the first node carrying `data_id`.
    pub async fn expand_data(&mut self, data_id: &DataId) -> Result<bool> {
        let key = self.key_of(data_id).map_err(|err| self.report(err))?;
        self.expand(key).await
    }

    /// Collapse `key`; with `collapse_all`, its expanded descendants too.
    ///
    /// Loaded children stay in the tree, so expanding again does not fetch.
    pub fn collapse(&mut self, key: NodeKey, collapse_all: bool) -> Result<bool> {
        if !self.tree().contains(key) || key == self.tree().root() {
            return Err(self.report(TreeGridError::StaleKey));
        }
        self.set_active(false);
        let mut targets = vec![key];
        if collapse_all {
            targets.extend(self.tree().tree_to_list(key, FlattenOptions::default()));
        }
        let mut changed = false;
        for target in targets {
            let Some(node) = self.root.current_mut().get_mut(target) else {
                continue;
            };
            if !node.expanded {
                continue;
            }
            node.expanded = false;
            let data_id = node.data_id.clone();
            self.forget_expanded(&data_id);
            changed = true;
        }
        if changed {
            self.refresh_rows();
        }
        self.set_active(true);
        Ok(changed)
    }

    /// Collapse `key` if expanded, otherwise expand it.
    pub async fn toggle_expanded(&mut self, key: NodeKey) -> Result<bool> {
        let expanded = self.tree().get(key).is_some_and(|n| n.expanded);
        if expanded {
            self.collapse(key, false)
        } else {
            self.expand(key).await
        }
    }

    /// Re-fetch one item and apply it like [`update_data`](Self::update_data).
    pub async fn refresh_node(&mut self, data_id: &DataId) -> Result<()> {
        self.set_active(false);
        let fetched = self.source.fetch(data_id).await;
        self.set_active(true);
        match fetched {
            Ok(item) => {
                self.update_data(item);
                Ok(())
            }
            Err(err) => Err(self.report(err.into())),
        }
    }

    // ── Data mutation ────────────────────────────────────────────────

    /// Insert `item` under the node carrying `parent` (top level if `None`).
    ///
    /// If the parent's children were never fetched the item is not placed;
    /// the parent just becomes expandable and the item arrives with the
    /// next fetch. Returns the key of the placed (or merged) node.
    pub fn insert_data(
        &mut self,
        parent: Option<&DataId>,
        item: S::Item,
        index: Option<usize>,
    ) -> Result<Option<NodeKey>> {
        let parent_key = match parent {
            Some(id) => self.key_of(id).map_err(|err| self.report(err))?,
            None => self.tree().root(),
        };
        let node = self.to_node(item);
        let data_id = node.data_id.clone();
        let is_root = parent_key == self.tree().root();
        let loaded = self
            .tree()
            .get(parent_key)
            .is_some_and(|p| p.children_state.is_loaded());

        let placed = if loaded || is_root {
            let index = index.unwrap_or_else(|| self.tree().children(parent_key).len());
            self.root.current_mut().insert_child(parent_key, node, index)
        } else {
            None
        };
        if !is_root {
            if let Some(p) = self.root.current_mut().get_mut(parent_key) {
                p.expandable = true;
            }
        }
        self.after_structure_change();
        self.events.push(TreeGridEvent::DataChanged {
            kind: DataChangeKind::Added,
            items: vec![data_id],
        });
        Ok(placed)
    }

    /// Replace the data of every node carrying `item`'s id.
    ///
    /// Returns how many nodes were updated.
    pub fn update_data(&mut self, item: S::Item) -> usize {
        let data_id = self.source.data_id(&item);
        let expandable = self.source.has_children(&item);
        let keys = self.tree().find_nodes(&data_id);
        for &key in &keys {
            if let Some(node) = self.root.current_mut().get_mut(key) {
                node.data = Some(item.clone());
                node.expandable = expandable;
            }
        }
        if keys.is_empty() {
            trace!("update for {data_id} matched no node");
            return 0;
        }

        self.rows = project(self.root.current(), self.highlighted.as_ref());
        let touched: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.data_id() == Some(&data_id))
            .map(|(index, _)| index)
            .collect();
        for &index in &touched {
            let row = self.rows[index].clone();
            let row_id = row.row_id.clone();
            self.view.update_row(&row_id, row);
        }
        self.view.invalidate_rows(&touched);
        self.events.push(TreeGridEvent::DataChanged {
            kind: DataChangeKind::Updated,
            items: vec![data_id],
        });
        keys.len()
    }

    /// Remove every node carrying any of `ids`, and forget them in the
    /// selection, highlight and expanded ids. Returns how many nodes went.
    pub fn delete_data(&mut self, ids: &[DataId]) -> usize {
        let mut removed = 0;
        for id in ids {
            for key in self.tree().find_nodes(id) {
                if self.root.current_mut().remove(key).is_some() {
                    removed += 1;
                }
            }
            self.forget_expanded(id);
        }
        if self.root.remove_from_selection(ids) > 0 {
            self.sync_tracker(SelectionChangeType::Removed);
        }
        self.after_structure_change();
        self.events.push(TreeGridEvent::DataChanged {
            kind: DataChangeKind::Deleted,
            items: ids.to_vec(),
        });
        removed
    }

    /// Promote the node carrying `data_id` to the first top-level row.
    ///
    /// Returns `false` if a top-level node with that id already exists.
    pub fn pin(&mut self, data_id: &DataId) -> Result<bool> {
        let key = self.key_of(data_id).map_err(|err| self.report(err))?;
        let pinned = self.root.current_mut().pin_to_root(key);
        if pinned {
            debug!("pinned {data_id} to the top level");
            self.refresh_rows();
        }
        Ok(pinned)
    }

    // ── Selection notification ───────────────────────────────────────

    /// Emit the debounced selection change if its quiet period is over at `now`.
    pub fn flush_selection_changed(&mut self, now: Instant) -> bool {
        if !self.debouncer.poll(now) || !self.tracker.is_changed() {
            return false;
        }
        self.events.push(TreeGridEvent::SelectionChanged {
            change: std::mem::take(&mut self.pending_change),
            selection: self.tracker.ids().to_vec(),
        });
        self.tracker.reset_selection_changed();
        true
    }

    /// Bring the tracker in line with the full selection, starting the
    /// quiet period if the id set moved.
    pub(super) fn sync_tracker(&mut self, change: SelectionChangeType) {
        let full = self.root.get_full_selection(true);
        let differs =
            full.len() != self.tracker.len() || full.iter().any(|id| !self.tracker.contains(id));
        self.tracker.replace(&full);
        if differs {
            self.pending_change = merge_change(self.pending_change, change);
            self.debouncer.notify(Instant::now());
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Switch input handling on or off. Structural operations switch it off
    /// while they run; clicks and keys are ignored meanwhile.
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.active = active;
            self.events.push(TreeGridEvent::ActiveChanged(active));
        }
    }

    pub(super) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Route a failure to the inline panel or the error handler, and hand
    /// it back for the caller to return.
    pub(super) fn report(&mut self, err: TreeGridError) -> TreeGridError {
        if self.config.quiet_errors {
            self.error_panel = Some(ErrorPanel {
                message: err.to_string(),
            });
        } else {
            self.error_handler.handle(&err);
        }
        err
    }

    pub(super) fn key_of(&self, data_id: &DataId) -> Result<NodeKey> {
        self.tree()
            .find_node(data_id)
            .ok_or_else(|| TreeGridError::NodeNotFound(data_id.clone()))
    }

    /// Re-project rows and push them, with the selection, to the view.
    pub(super) fn refresh_rows(&mut self) {
        self.rows = project(self.root.current(), self.highlighted.as_ref());
        self.view
            .set_rows(&self.config.id_property_name, self.rows.clone());
        let selected = self.selected_row_indices();
        self.view.set_selected_rows(&selected);
    }

    /// After nodes came or went: pull in stashed selection that is now
    /// present, drop a highlight that is gone, and re-project.
    pub(super) fn after_structure_change(&mut self) {
        if !self.root.restore_stashed().is_empty() {
            self.sync_tracker(SelectionChangeType::Added);
        }
        let stale = self
            .highlighted
            .as_ref()
            .is_some_and(|id| self.tree().find_node(id).is_none());
        if stale {
            self.set_highlight(None);
        }
        self.refresh_rows();
    }

    pub(super) fn to_node(&self, item: S::Item) -> TreeNode<S::Item> {
        let data_id = self.source.data_id(&item);
        let expandable = self.source.has_children(&item);
        TreeNode::new(data_id, item).expandable(expandable)
    }

    pub(super) fn to_nodes(&self, items: Vec<S::Item>) -> Vec<TreeNode<S::Item>> {
        items.into_iter().map(|item| self.to_node(item)).collect()
    }

    fn install_root_page(&mut self, page: Page<S::Item>) {
        let fetched = page.items.len();
        let mut tree = Tree::new();
        let root = tree.root();
        tree.set_children(root, self.to_nodes(page.items));
        if let Some(node) = tree.get_mut(root) {
            node.children_state = ChildrenState::after_page(fetched, page.total);
            node.max_children = page.total;
        }
        debug!("loaded {fetched} top-level items (total: {:?})", page.total);
        self.root.replace_current(tree);
        self.after_structure_change();
    }

    fn install_children(&mut self, key: NodeKey, page: Page<S::Item>) {
        let fetched = page.items.len();
        let nodes = self.to_nodes(page.items);
        let tree = self.root.current_mut();
        tree.set_children(key, nodes);
        if let Some(node) = tree.get_mut(key) {
            node.children_state = ChildrenState::after_page(fetched, page.total);
            node.max_children = page.total;
        }
    }

    /// Fetch the data of a node that only carries an id.
    async fn resolve_data(&mut self, key: NodeKey, data_id: &DataId) -> Result<S::Item> {
        trace!("resolving data of {data_id}");
        self.set_loading(true);
        let fetched = self.source.fetch(data_id).await;
        self.set_loading(false);
        let item = fetched?;
        let expandable = self.source.has_children(&item);
        if let Some(node) = self.root.current_mut().get_mut(key) {
            node.data = Some(item.clone());
            node.expandable = expandable;
        }
        Ok(item)
    }

    pub(super) async fn expand_inner(&mut self, key: NodeKey) -> Result<bool> {
        let Some(node) = self.tree().get(key) else {
            return Err(TreeGridError::StaleKey);
        };
        if !node.expandable {
            return Ok(false);
        }
        if node.expanded {
            return Ok(true);
        }
        let data_id = node.data_id.clone();
        let loaded = node.children_state.is_loaded();
        let data = node.data.clone();

        if !loaded {
            let data = match data {
                Some(data) => data,
                None => self.resolve_data(key, &data_id).await?,
            };
            trace!("fetching children of {data_id}");
            self.set_loading(true);
            let fetched = self
                .source
                .fetch_children(&data, PageRequest::first(self.config.page_size))
                .await;
            self.set_loading(false);
            self.install_children(key, fetched?);
        }

        let has_children = !self.tree().children(key).is_empty();
        if let Some(node) = self.root.current_mut().get_mut(key) {
            node.expanded = has_children;
            node.expandable = has_children;
        }
        if has_children {
            self.remember_expanded(&data_id);
        }
        self.after_structure_change();
        if !has_children {
            return Ok(false);
        }
        let children = self.tree().children(key).to_vec();
        self.restore_expansion(children).await;
        Ok(true)
    }

    /// Expand every node among `keys` listed in the expanded ids, recursively.
    pub(super) async fn restore_expansion(&mut self, keys: Vec<NodeKey>) {
        for key in keys {
            let wanted = self.tree().get(key).is_some_and(|n| {
                n.expandable && !n.expanded && self.expanded_ids.contains(&n.data_id)
            });
            if !wanted {
                continue;
            }
            if let Err(err) = Box::pin(self.expand_inner(key)).await {
                warn!("could not restore expansion: {err}");
                self.report(err);
            }
        }
    }

    pub(super) fn remember_expanded(&mut self, data_id: &DataId) {
        if !self.expanded_ids.contains(data_id) {
            self.expanded_ids.push(data_id.clone());
        }
    }

    fn forget_expanded(&mut self, data_id: &DataId) {
        self.expanded_ids.retain(|id| id != data_id);
    }
}

/// Combine two selection changes made within one quiet period.
fn merge_change(previous: SelectionChangeType, next: SelectionChangeType) -> SelectionChangeType {
    match (previous, next) {
        (SelectionChangeType::None, change) | (change, SelectionChangeType::None) => change,
        (a, b) if a == b => a,
        _ => SelectionChangeType::Mixed,
    }
}
