//! Keyboard navigation.

use log::trace;

use super::error::Result;
use super::source::TreeDataSource;
use super::tree_grid::TreeGrid;
use super::view::RowView;
use crate::event::{GridAction, KeyEvent, TreeGridEvent};
use crate::selection::{extend_range, Direction};
use crate::tree::DataId;

impl<S: TreeDataSource, V: RowView> TreeGrid<S, V> {
    /// Resolve a key through the bindings and run its action.
    ///
    /// Returns `Ok(false)` if the key is unbound or the grid is inactive.
    pub async fn handle_key(&mut self, event: KeyEvent) -> Result<bool> {
        if !self.is_active() {
            trace!("key {:?} ignored while inactive", event.code);
            return Ok(false);
        }
        let Some(action) = self.bindings.resolve(&event).cloned() else {
            return Ok(false);
        };
        trace!("key {:?} -> {action:?}", event.code);
        match action {
            GridAction::MoveUp => self.move_focus(Direction::Up),
            GridAction::MoveDown => self.move_focus(Direction::Down),
            GridAction::ExtendUp => self.extend_selection(Direction::Up),
            GridAction::ExtendDown => self.extend_selection(Direction::Down),
            GridAction::Collapse => self.collapse_or_ascend()?,
            GridAction::Expand => self.expand_focused().await?,
            GridAction::ToggleSelection => {
                if let Some(row) = self.focus_row() {
                    if let Some(data_id) = self.rows[row].data_id().cloned() {
                        self.toggle_selection(&data_id);
                        self.set_highlight(None);
                        self.refresh_rows();
                    }
                }
            }
            GridAction::Edit => {
                let target = self
                    .root
                    .current_selection()
                    .last()
                    .map(|item| item.data_id.clone())
                    .or_else(|| self.highlighted.clone());
                if let Some(data_id) = target {
                    self.events.push(TreeGridEvent::EditRequested { data_id });
                }
            }
            GridAction::SelectAll => self.select_all_visible(),
            GridAction::Custom(name) => self.events.push(TreeGridEvent::Action(name)),
        }
        Ok(true)
    }

    /// Expand every collapsed ancestor of the node carrying `data_id`.
    ///
    /// Ancestors of a node are always loaded, so no fetch happens. Returns
    /// whether anything was expanded; rows are not re-projected.
    pub(super) fn reveal(&mut self, data_id: &DataId) -> bool {
        let Some(key) = self.tree().find_node(data_id) else {
            return false;
        };
        let root = self.tree().root();
        let mut revealed = Vec::new();
        for ancestor in self.tree().ancestors(key) {
            if ancestor == root {
                continue;
            }
            if let Some(node) = self.root.current_mut().get_mut(ancestor) {
                if !node.expanded {
                    node.expanded = true;
                    revealed.push(node.data_id.clone());
                }
            }
        }
        for id in &revealed {
            self.remember_expanded(id);
        }
        !revealed.is_empty()
    }

    /// The highlighted row, else the anchor of the selection, revealing it
    /// if an ancestor is collapsed.
    fn focus_row(&mut self) -> Option<usize> {
        let data_id = self.highlighted.clone().or_else(|| {
            self.root
                .current_selection()
                .last()
                .map(|item| item.data_id.clone())
        })?;
        if self.row_of(&data_id).is_none() && self.reveal(&data_id) {
            self.refresh_rows();
        }
        self.row_of(&data_id)
    }

    /// Nearest node row from `row` in `direction`, skipping load-more rows.
    fn next_node_row(&self, row: usize, direction: Direction) -> Option<usize> {
        let mut cursor = row;
        loop {
            cursor = direction.step(cursor, self.rows.len())?;
            if !self.rows[cursor].is_load_more() {
                return Some(cursor);
            }
        }
    }

    /// Highlight `data_id` alone, or select it alone in single-select mode.
    fn focus_on(&mut self, data_id: DataId) {
        if self.config.multi_select {
            self.apply_selection(Vec::new());
            self.set_highlight(Some(data_id));
        } else {
            self.apply_selection(vec![data_id]);
            self.set_highlight(None);
        }
        self.refresh_rows();
    }

    fn move_focus(&mut self, direction: Direction) {
        let target = match self.focus_row() {
            Some(row) => self.next_node_row(row, direction),
            None => match direction {
                Direction::Down => self.rows.iter().position(|r| !r.is_load_more()),
                Direction::Up => self.rows.iter().rposition(|r| !r.is_load_more()),
            },
        };
        if let Some(data_id) = target.and_then(|row| self.rows[row].data_id().cloned()) {
            self.focus_on(data_id);
        }
    }

    fn extend_selection(&mut self, direction: Direction) {
        if !self.config.multi_select {
            self.move_focus(direction);
            return;
        }
        let mut selected = self.selected_row_indices();
        if selected.is_empty() {
            selected.extend(self.focus_row());
        }
        if selected.is_empty() {
            return;
        }
        // Range arithmetic runs over node rows only so load-more rows are stepped over.
        let node_rows: Vec<usize> = (0..self.rows.len())
            .filter(|&row| !self.rows[row].is_load_more())
            .collect();
        let positions: Vec<usize> = selected
            .iter()
            .filter_map(|row| node_rows.iter().position(|node_row| node_row == row))
            .collect();
        if positions.is_empty() {
            return;
        }
        let rows: Vec<usize> = extend_range(&positions, direction, node_rows.len())
            .into_iter()
            .map(|pos| node_rows[pos])
            .collect();
        let ids = self.ids_for_rows(&rows);
        self.apply_selection(ids);
        self.set_highlight(None);
        self.refresh_rows();
    }

    /// Collapse the focused node if expanded, else move focus to its parent.
    fn collapse_or_ascend(&mut self) -> Result<()> {
        let Some(key) = self.focus_row().and_then(|row| self.rows[row].node_key()) else {
            return Ok(());
        };
        if self.tree().get(key).is_some_and(|n| n.expanded) {
            self.collapse(key, false)?;
            return Ok(());
        }
        let root = self.tree().root();
        let parent = self
            .tree()
            .parent(key)
            .filter(|&parent| parent != root)
            .and_then(|parent| self.tree().get(parent))
            .map(|node| node.data_id.clone());
        if let Some(data_id) = parent {
            self.focus_on(data_id);
        }
        Ok(())
    }

    async fn expand_focused(&mut self) -> Result<()> {
        let Some(key) = self.focus_row().and_then(|row| self.rows[row].node_key()) else {
            return Ok(());
        };
        let collapsed = self
            .tree()
            .get(key)
            .is_some_and(|n| n.expandable && !n.expanded);
        if collapsed {
            self.expand(key).await?;
        }
        Ok(())
    }

    /// Select every selectable visible row, or clear the selection if they
    /// are all selected already.
    fn select_all_visible(&mut self) {
        if !self.config.multi_select {
            return;
        }
        let visible: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                row.node_key()
                    .and_then(|key| self.tree().get(key))
                    .is_some_and(|node| node.selectable)
            })
            .map(|(index, _)| index)
            .collect();
        let all_selected = !visible.is_empty()
            && visible
                .iter()
                .filter_map(|&row| self.rows[row].data_id())
                .all(|id| self.root.is_selected(id));
        if all_selected {
            self.apply_selection(Vec::new());
        } else {
            let ids = self.ids_for_rows(&visible);
            self.apply_selection(ids);
        }
        self.set_highlight(None);
        self.refresh_rows();
    }
}
