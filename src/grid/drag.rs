//! Drag reordering among siblings.

use log::debug;

use super::error::{Result, TreeGridError};
use super::source::TreeDataSource;
use super::tree_grid::TreeGrid;
use super::view::RowView;
use crate::event::{DataChangeKind, TreeGridEvent};
use crate::tree::NodeKey;

impl<S: TreeDataSource, V: RowView> TreeGrid<S, V> {
    /// Move the node at row `from` to the sibling position of the node at
    /// row `to`.
    ///
    /// Both rows must be nodes under the same parent. The dragged node keeps
    /// its subtree and expansion. Returns the row the node ended up on.
    pub fn move_node(&mut self, from: usize, to: usize) -> Result<usize> {
        if !self.is_active() {
            return Ok(from);
        }
        let from_key = self.node_row(from)?;
        let to_key = self.node_row(to)?;
        if from == to {
            return Ok(from);
        }
        let tree = self.tree();
        let parent = tree.parent(from_key);
        if parent.is_none() || parent != tree.parent(to_key) {
            return Err(TreeGridError::InvalidMove {
                from,
                to,
                reason: "rows have different parents",
            });
        }
        let (Some(parent), Some(from_index), Some(to_index)) = (
            parent,
            tree.index_in_parent(from_key),
            tree.index_in_parent(to_key),
        ) else {
            return Err(TreeGridError::StaleKey);
        };
        let data_id = tree.get(from_key).map(|n| n.data_id.clone());

        self.set_active(false);
        self.root
            .current_mut()
            .move_child(parent, from_index, to_index);
        self.refresh_rows();
        self.set_active(true);

        let row = self
            .rows
            .iter()
            .position(|r| r.node_key() == Some(from_key))
            .unwrap_or(to);
        debug!("moved row {from} to {row}");
        if let Some(data_id) = data_id {
            self.events.push(TreeGridEvent::DataChanged {
                kind: DataChangeKind::Updated,
                items: vec![data_id],
            });
        }
        Ok(row)
    }

    fn node_row(&self, row: usize) -> Result<NodeKey> {
        self.row_at(row)?
            .node_key()
            .ok_or(TreeGridError::InvalidMove {
                from: row,
                to: row,
                reason: "not a node row",
            })
    }
}
