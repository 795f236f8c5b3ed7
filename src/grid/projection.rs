//! Flattening the current tree into visible rows.

use super::view::{RowItem, RowKind};
use crate::tree::{DataId, NodeKey, Tree};

/// Project the visible part of `tree` into rows.
///
/// Children of expanded nodes follow their parent one level deeper. A
/// partially fetched child list is followed by a load-more row at the
/// children's level; the root's own list counts too.
pub fn project<D>(tree: &Tree<D>, highlighted: Option<&DataId>) -> Vec<RowItem> {
    let mut rows = Vec::new();
    push_children(tree, tree.root(), 0, highlighted, &mut rows);
    rows
}

fn push_children<D>(
    tree: &Tree<D>,
    parent: NodeKey,
    level: usize,
    highlighted: Option<&DataId>,
    rows: &mut Vec<RowItem>,
) {
    for &key in tree.children(parent) {
        let Some(node) = tree.get(key) else {
            continue;
        };
        rows.push(RowItem {
            row_id: key.row_id(),
            kind: RowKind::Node {
                key,
                data_id: node.data_id.clone(),
            },
            level,
            expandable: node.expandable,
            expanded: node.expanded,
            selected: node.selected,
            highlighted: highlighted == Some(&node.data_id),
        });
        if node.expanded {
            push_children(tree, key, level + 1, highlighted, rows);
        }
    }
    if tree.get(parent).is_some_and(|p| p.children_state.has_more()) {
        rows.push(RowItem {
            row_id: format!("{}-more", parent.row_id()),
            kind: RowKind::LoadMore { parent },
            level,
            expandable: false,
            expanded: false,
            selected: false,
            highlighted: false,
        });
    }
}
