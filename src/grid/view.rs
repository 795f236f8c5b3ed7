//! The row view contract: the flat, virtualized list a grid renders into.

use crate::tree::{DataId, NodeKey};

/// What a visible row stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// A tree node.
    Node { key: NodeKey, data_id: DataId },
    /// Placeholder after a partially fetched child list.
    LoadMore { parent: NodeKey },
}

/// One visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowItem {
    /// Value of the id property the view indexes rows by.
    pub row_id: String,
    pub kind: RowKind,
    /// Indentation level; top-level rows are 0.
    pub level: usize,
    pub expandable: bool,
    pub expanded: bool,
    pub selected: bool,
    pub highlighted: bool,
}

impl RowItem {
    pub fn data_id(&self) -> Option<&DataId> {
        match &self.kind {
            RowKind::Node { data_id, .. } => Some(data_id),
            RowKind::LoadMore { .. } => None,
        }
    }

    pub fn node_key(&self) -> Option<NodeKey> {
        match self.kind {
            RowKind::Node { key, .. } => Some(key),
            RowKind::LoadMore { .. } => None,
        }
    }

    pub fn is_load_more(&self) -> bool {
        matches!(self.kind, RowKind::LoadMore { .. })
    }
}

/// Inclusive range of row indices currently rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub top: usize,
    pub bottom: usize,
}

impl Viewport {
    pub fn new(top: usize, bottom: usize) -> Self {
        Self { top, bottom }
    }
}

/// A virtualized list of rows with an id index and row-level selection.
///
/// The grid owns the row projection and pushes it here; the view owns
/// scrolling and rendering.
pub trait RowView {
    /// Replace every row. Rows are indexed by `row_id`, which holds the
    /// value of the `id_property` column.
    fn set_rows(&mut self, id_property: &str, rows: Vec<RowItem>);

    fn row_count(&self) -> usize;

    fn row(&self, index: usize) -> Option<&RowItem>;

    fn row_index_by_id(&self, row_id: &str) -> Option<usize>;

    fn insert_row(&mut self, index: usize, row: RowItem);

    /// Replace the row carrying `row_id`. Returns `false` if absent.
    fn update_row(&mut self, row_id: &str, row: RowItem) -> bool;

    /// Remove the row carrying `row_id`. Returns `false` if absent.
    fn delete_row(&mut self, row_id: &str) -> bool;

    fn selected_rows(&self) -> Vec<usize>;

    fn set_selected_rows(&mut self, rows: &[usize]);

    /// Request a repaint of the given rows.
    fn invalidate_rows(&mut self, rows: &[usize]);

    fn viewport(&self) -> Viewport;
}
