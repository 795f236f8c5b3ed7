//! Pointer gestures and selection/highlight reconciliation.

use log::trace;

use super::error::{Result, TreeGridError};
use super::tree_grid::{InteractionMode, TreeGrid};
use super::source::TreeDataSource;
use super::view::{RowItem, RowView};
use crate::event::{Modifiers, RowClick, TreeGridEvent};
use crate::selection::walk_range;
use crate::tree::{DataId, SelectedItem, SelectionChangeType};

impl<S: TreeDataSource, V: RowView> TreeGrid<S, V> {
    // ── Gestures ─────────────────────────────────────────────────────

    /// Apply a row click.
    ///
    /// - Shift: select every row from the anchor (highlight, else the last
    ///   selected row) to the clicked one.
    /// - Ctrl/Meta: toggle the clicked row alone.
    /// - Plain, in highlight mode, off the checkbox, with multi-select on:
    ///   highlight the row and clear the selection.
    /// - Otherwise: toggle the row's selection and clear the highlight.
    ///
    /// Ignored while the grid is inactive and on load-more rows.
    pub fn click(&mut self, click: RowClick) -> Result<()> {
        if !self.is_active() {
            trace!("click on row {} ignored while inactive", click.row);
            return Ok(());
        }
        let Some(data_id) = self.row_at(click.row)?.data_id().cloned() else {
            return Ok(());
        };

        if click.modifiers.contains(Modifiers::SHIFT) {
            self.extend_to_row(click.row, &data_id);
        } else if click.modifiers.has_mod() {
            self.toggle_selection(&data_id);
            if self.highlighted.as_ref() != Some(&data_id) {
                self.set_highlight(None);
            }
        } else if self.interaction_mode() == InteractionMode::Highlight
            && !click.checkbox
            && self.config.multi_select
        {
            self.apply_selection(Vec::new());
            self.set_highlight(Some(data_id));
        } else {
            self.toggle_selection(&data_id);
            self.set_highlight(None);
        }
        self.refresh_rows();
        Ok(())
    }

    /// Open a context menu on a row at screen position (`x`, `y`).
    ///
    /// A row outside the selection becomes the highlighted row first.
    pub fn show_context_menu(&mut self, row: usize, x: u16, y: u16) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }
        if let Some(data_id) = self.row_at(row)?.data_id().cloned() {
            if !self.root.is_selected(&data_id) {
                self.apply_selection(Vec::new());
                self.set_highlight(Some(data_id));
                self.refresh_rows();
            }
        }
        self.events.push(TreeGridEvent::ContextMenuShown { x, y });
        Ok(())
    }

    // ── Programmatic selection ───────────────────────────────────────

    /// Replace the selection with `ids`, clearing the highlight.
    ///
    /// Ids of non-selectable nodes are skipped; ids not in the current tree
    /// are kept only if they were already selected.
    pub fn select_data(&mut self, ids: &[DataId]) -> SelectionChangeType {
        let change = self.apply_selection(ids.to_vec());
        self.set_highlight(None);
        self.refresh_rows();
        change
    }

    pub fn deselect_all(&mut self) -> SelectionChangeType {
        self.select_data(&[])
    }

    /// Highlight the node carrying `data_id` (or nothing), clearing the
    /// selection and expanding its ancestors.
    pub fn set_highlighted(&mut self, data_id: Option<&DataId>) -> Result<()> {
        if let Some(id) = data_id {
            self.key_of(id).map_err(|err| self.report(err))?;
            self.reveal(id);
        }
        self.apply_selection(Vec::new());
        self.set_highlight(data_id.cloned());
        self.refresh_rows();
        Ok(())
    }

    // ── Row resolution ───────────────────────────────────────────────

    /// Row index of `data_id`.
    ///
    /// `row_id_hint` is tried against the view's id index first; if it is
    /// missing or stale the rows are scanned by data id.
    pub fn resolve_row(&self, data_id: &DataId, row_id_hint: Option<&str>) -> Option<usize> {
        let by_hint = row_id_hint
            .and_then(|row_id| self.view.row_index_by_id(row_id))
            .filter(|&index| {
                self.rows.get(index).and_then(RowItem::data_id) == Some(data_id)
            });
        by_hint.or_else(|| {
            self.rows
                .iter()
                .position(|row| row.data_id() == Some(data_id))
        })
    }

    /// Row index of the first node carrying `data_id`, if visible.
    pub fn row_of(&self, data_id: &DataId) -> Option<usize> {
        let hint = self.tree().find_node(data_id).map(|key| key.row_id());
        self.resolve_row(data_id, hint.as_deref())
    }

    /// The view rebuilt or re-sorted its rows: push the selection back as
    /// row indices.
    pub fn handle_rows_changed(&mut self) {
        let selected = self.selected_row_indices();
        trace!("rows changed, reselecting {} rows", selected.len());
        self.view.set_selected_rows(&selected);
    }

    /// Rows of the current selection, in selection order. Hidden entries
    /// are skipped.
    pub(super) fn selected_row_indices(&self) -> Vec<usize> {
        self.root
            .current_selection()
            .iter()
            .filter_map(|item| self.row_of(&item.data_id))
            .collect()
    }

    pub(super) fn row_at(&self, row: usize) -> Result<&RowItem> {
        self.rows.get(row).ok_or(TreeGridError::RowOutOfRange {
            row,
            rows: self.rows.len(),
        })
    }

    // ── State transitions ────────────────────────────────────────────

    /// Make `ids` the current selection and start the quiet period if it
    /// changed. Rows are not re-projected.
    pub(super) fn apply_selection(&mut self, ids: Vec<DataId>) -> SelectionChangeType {
        let items: Vec<SelectedItem<S::Item>> = ids
            .into_iter()
            .filter_map(|id| self.selected_item(id))
            .collect();
        let change = self.root.update_selection(items);
        if change.is_change() {
            trace!("selection {change:?}: {} selected", self.root.current_selection().len());
            self.sync_tracker(change);
        }
        change
    }

    fn selected_item(&self, data_id: DataId) -> Option<SelectedItem<S::Item>> {
        let tree = self.tree();
        match tree.find_node(&data_id).and_then(|key| tree.get(key)) {
            Some(node) if node.selectable => Some(SelectedItem::new(data_id, node.data.clone())),
            Some(_) => None,
            None => self
                .root
                .current_selection()
                .iter()
                .find(|item| item.data_id == data_id)
                .cloned(),
        }
    }

    /// Change the highlighted id, emitting an event if it moved. Rows are
    /// not re-projected.
    pub(super) fn set_highlight(&mut self, data_id: Option<DataId>) {
        if self.highlighted == data_id {
            return;
        }
        self.highlighted = data_id.clone();
        self.events
            .push(TreeGridEvent::HighlightingChanged { highlighted: data_id });
    }

    /// Toggle one id. Single-select mode replaces the selection instead
    /// of adding to it.
    pub(super) fn toggle_selection(&mut self, data_id: &DataId) {
        let mut ids = self.selected_ids();
        if let Some(pos) = ids.iter().position(|id| id == data_id) {
            ids.remove(pos);
        } else if self.config.multi_select {
            ids.push(data_id.clone());
        } else {
            ids = vec![data_id.clone()];
        }
        self.apply_selection(ids);
    }

    /// Shift-click: select the walk from the anchor row to `target`.
    fn extend_to_row(&mut self, target: usize, data_id: &DataId) {
        if !self.config.multi_select {
            self.toggle_selection(data_id);
            self.set_highlight(None);
            return;
        }
        let mut selected = self.selected_row_indices();
        let highlighted_row = self.highlighted.as_ref().and_then(|id| self.row_of(id));
        let anchor = match highlighted_row {
            Some(row) => {
                if !selected.contains(&row) {
                    selected.push(row);
                }
                Some(row)
            }
            None => selected.last().copied(),
        };
        match anchor {
            Some(anchor) => {
                let rows = walk_range(anchor, target, &selected);
                let ids = self.ids_for_rows(&rows);
                self.apply_selection(ids);
            }
            None => self.toggle_selection(data_id),
        }
        self.set_highlight(None);
    }

    /// Data ids for `rows`, preceded by selected ids that have no visible
    /// row so a row-based edit never drops hidden selection.
    pub(super) fn ids_for_rows(&self, rows: &[usize]) -> Vec<DataId> {
        let mut ids: Vec<DataId> = self
            .root
            .current_selection()
            .iter()
            .filter(|item| self.row_of(&item.data_id).is_none())
            .map(|item| item.data_id.clone())
            .collect();
        ids.extend(
            rows.iter()
                .filter_map(|&row| self.rows.get(row).and_then(RowItem::data_id))
                .cloned(),
        );
        ids
    }
}
