//! Plain-text outlines of grid rows for snapshot assertions.
//!
//! One line per row, indented two spaces per level:
//!
//! ```text
//! + a          collapsed, expandable
//! - b [x]      expanded, selected
//!   · b1 *     leaf, highlighted
//!   …          load-more
//! ```

use crate::grid::{RowItem, RowKind, RowView, TreeDataSource, TreeGrid};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render rows as an outline. Lines are joined with `'\n'`, without a
/// trailing newline.
pub fn outline(rows: &[RowItem]) -> String {
    rows.iter().map(outline_row).collect::<Vec<_>>().join("\n")
}

/// Render a grid's visible rows as an outline.
pub fn grid_outline<S: TreeDataSource, V: RowView>(grid: &TreeGrid<S, V>) -> String {
    outline(grid.rows())
}

fn outline_row(row: &RowItem) -> String {
    let indent = "  ".repeat(row.level);
    let data_id = match &row.kind {
        RowKind::Node { data_id, .. } => data_id,
        RowKind::LoadMore { .. } => return format!("{indent}…"),
    };
    let marker = match (row.expandable, row.expanded) {
        (_, true) => '-',
        (true, false) => '+',
        (false, false) => '·',
    };
    let mut line = format!("{indent}{marker} {data_id}");
    if row.selected {
        line.push_str(" [x]");
    }
    if row.highlighted {
        line.push_str(" *");
    }
    line
}

// ===========================================================================
// Tests
// ===========================================================================
