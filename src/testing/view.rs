//! A row view that keeps rows in memory instead of drawing them.

use std::collections::HashMap;

use crate::grid::{RowItem, RowView, Viewport};

/// Headless [`RowView`] with a fixed-height viewport.
#[derive(Debug, Clone, Default)]
pub struct HeadlessView {
    id_property: String,
    rows: Vec<RowItem>,
    index: HashMap<String, usize>,
    selected: Vec<usize>,
    invalidated: Vec<usize>,
    top: usize,
    height: usize,
}

impl HeadlessView {
    /// A view showing `height` rows at a time.
    pub fn new(height: usize) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    /// Scroll so that `top` is the first rendered row.
    pub fn scroll_to(&mut self, top: usize) {
        self.top = top;
    }

    /// The id property passed with the last `set_rows`.
    pub fn id_property(&self) -> &str {
        &self.id_property
    }

    pub fn rows(&self) -> &[RowItem] {
        &self.rows
    }

    /// Rows invalidated since the last `set_rows`.
    pub fn invalidated(&self) -> &[usize] {
        &self.invalidated
    }

    fn reindex(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.row_id.clone(), i))
            .collect();
    }
}

impl RowView for HeadlessView {
    fn set_rows(&mut self, id_property: &str, rows: Vec<RowItem>) {
        self.id_property = id_property.to_owned();
        self.rows = rows;
        self.selected.clear();
        self.invalidated.clear();
        self.reindex();
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Option<&RowItem> {
        self.rows.get(index)
    }

    fn row_index_by_id(&self, row_id: &str) -> Option<usize> {
        self.index.get(row_id).copied()
    }

    fn insert_row(&mut self, index: usize, row: RowItem) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, row);
        self.reindex();
    }

    fn update_row(&mut self, row_id: &str, row: RowItem) -> bool {
        let Some(&index) = self.index.get(row_id) else {
            return false;
        };
        self.rows[index] = row;
        self.reindex();
        true
    }

    fn delete_row(&mut self, row_id: &str) -> bool {
        let Some(index) = self.index.get(row_id).copied() else {
            return false;
        };
        self.rows.remove(index);
        self.selected.retain(|&r| r != index);
        for r in &mut self.selected {
            if *r > index {
                *r -= 1;
            }
        }
        self.reindex();
        true
    }

    fn selected_rows(&self) -> Vec<usize> {
        self.selected.clone()
    }

    fn set_selected_rows(&mut self, rows: &[usize]) {
        self.selected = rows.to_vec();
    }

    fn invalidate_rows(&mut self, rows: &[usize]) {
        self.invalidated.extend_from_slice(rows);
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.top, self.top + self.height.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RowKind;
    use crate::tree::{DataId, Tree, TreeNode};

    fn rows() -> Vec<RowItem> {
        let mut tree: Tree<()> = Tree::new();
        let root = tree.root();
        ["a", "b", "c"]
            .iter()
            .map(|id| {
                let key = tree.add_child(root, TreeNode::new(*id, ())).unwrap();
                RowItem {
                    row_id: key.row_id(),
                    kind: RowKind::Node {
                        key,
                        data_id: DataId::from(*id),
                    },
                    level: 0,
                    expandable: false,
                    expanded: false,
                    selected: false,
                    highlighted: false,
                }
            })
            .collect()
    }

    #[test]
    fn set_rows_builds_index() {
        let mut view = HeadlessView::new(10);
        let rows = rows();
        let second = rows[1].row_id.clone();
        view.set_rows("id", rows);
        assert_eq!(view.row_count(), 3);
        assert_eq!(view.row_index_by_id(&second), Some(1));
        assert_eq!(view.id_property(), "id");
    }

    #[test]
    fn delete_row_shifts_selection() {
        let mut view = HeadlessView::new(10);
        let rows = rows();
        let first = rows[0].row_id.clone();
        let last = rows[2].row_id.clone();
        view.set_rows("id", rows);
        view.set_selected_rows(&[0, 2]);
        assert!(view.delete_row(&first));
        assert_eq!(view.selected_rows(), vec![1]);
        assert_eq!(view.row_index_by_id(&last), Some(1));
        assert!(!view.delete_row(&first));
    }

    #[test]
    fn viewport_follows_scroll() {
        let mut view = HeadlessView::new(5);
        assert_eq!(view.viewport(), Viewport::new(0, 4));
        view.scroll_to(10);
        assert_eq!(view.viewport(), Viewport::new(10, 14));
    }
}
