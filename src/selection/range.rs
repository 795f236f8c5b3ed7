//! Row-index arithmetic for keyboard and shift-click range selection.
//!
//! Selections are ordered lists of row indices; the last element is the
//! anchor, the row the next extension starts from.

/// Direction of travel through the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// The neighbour of `row`, or `None` past either end.
    pub fn step(self, row: usize, total_rows: usize) -> Option<usize> {
        match self {
            Direction::Up => row.checked_sub(1),
            Direction::Down => Some(row + 1).filter(|&r| r < total_rows),
        }
    }
}

/// One shift+arrow step applied to `selected`.
///
/// - The neighbour of the anchor in the direction of travel is unselected:
///   select it; it becomes the anchor.
/// - It is selected and the anchor's opposite neighbour is not: the range
///   is shrinking, so deselect the anchor and make that neighbour the anchor.
/// - Both are selected: walk on past selected rows and select the first
///   unselected one as the new anchor.
///
/// Rows outside `0..total_rows` are dropped from the input, and a step past
/// either end leaves the selection unchanged.
pub fn extend_range(selected: &[usize], direction: Direction, total_rows: usize) -> Vec<usize> {
    let mut rows: Vec<usize> = Vec::with_capacity(selected.len() + 1);
    for &row in selected {
        if row < total_rows && !rows.contains(&row) {
            rows.push(row);
        }
    }
    let Some(&anchor) = rows.last() else {
        return rows;
    };
    let Some(next) = direction.step(anchor, total_rows) else {
        return rows;
    };
    if !rows.contains(&next) {
        rows.push(next);
        return rows;
    }

    let behind = direction.opposite().step(anchor, total_rows);
    if behind.is_none_or(|b| !rows.contains(&b)) {
        rows.pop();
        rows.retain(|&r| r != next);
        rows.push(next);
        return rows;
    }

    let mut cursor = next;
    while let Some(candidate) = direction.step(cursor, total_rows) {
        if !rows.contains(&candidate) {
            rows.push(candidate);
            break;
        }
        cursor = candidate;
    }
    rows
}

/// Extend `selected` with every row from `anchor` to `target` inclusive.
///
/// Rows are visited in walk order and appended when not already selected;
/// `target` always ends up last so it becomes the new anchor.
pub fn walk_range(anchor: usize, target: usize, selected: &[usize]) -> Vec<usize> {
    let mut rows = selected.to_vec();
    let walk: Box<dyn Iterator<Item = usize>> = if anchor <= target {
        Box::new(anchor..=target)
    } else {
        Box::new((target..=anchor).rev())
    };
    for row in walk {
        if !rows.contains(&row) {
            rows.push(row);
        }
    }
    rows.retain(|&r| r != target);
    rows.push(target);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use Direction::{Down, Up};

    // ── extend_range ─────────────────────────────────────────────────

    #[test]
    fn grows_into_unselected_neighbour() {
        assert_eq!(extend_range(&[3], Down, 10), vec![3, 4]);
        assert_eq!(extend_range(&[3], Up, 10), vec![3, 2]);
    }

    #[test]
    fn shrinks_when_backing_over() {
        // Grew downward from 3 to 5, then goes back up.
        let grown = vec![3, 4, 5];
        assert_eq!(extend_range(&grown, Up, 10), vec![3, 4]);
        assert_eq!(extend_range(&[3, 4], Up, 10), vec![3]);
        // Past the origin it grows again.
        assert_eq!(extend_range(&[3], Up, 10), vec![3, 2]);
    }

    #[test]
    fn walks_over_selected_block() {
        // Anchor 4 has selected rows on both sides; 5 and 6 are selected.
        let rows = vec![6, 5, 3, 4];
        assert_eq!(extend_range(&rows, Down, 10), vec![6, 5, 3, 4, 7]);
    }

    #[test]
    fn walk_hitting_end_is_noop() {
        let rows = vec![8, 9, 7, 8];
        // Deduped to [8, 9, 7]; anchor 7, 8 selected, 6 unselected: shrink.
        assert_eq!(extend_range(&rows, Down, 10), vec![9, 8]);
        let rows = vec![9, 7, 8];
        assert_eq!(extend_range(&rows, Down, 10), vec![9, 7, 8]);
    }

    #[test]
    fn clamps_at_bounds() {
        assert_eq!(extend_range(&[0], Up, 5), vec![0]);
        assert_eq!(extend_range(&[4], Down, 5), vec![4]);
    }

    #[test]
    fn anchor_at_top_moving_down_over_selected_shrinks() {
        assert_eq!(extend_range(&[1, 0], Down, 5), vec![1]);
    }

    #[test]
    fn empty_selection_is_unchanged() {
        assert!(extend_range(&[], Down, 5).is_empty());
    }

    #[test]
    fn out_of_range_input_is_dropped() {
        assert_eq!(extend_range(&[2, 12], Down, 5), vec![2, 3]);
        assert!(extend_range(&[7], Up, 0).is_empty());
    }

    #[test]
    fn never_leaves_bounds() {
        let total = 6;
        for start in 0..total {
            for dir in [Up, Down] {
                let mut rows = vec![start];
                for _ in 0..10 {
                    rows = extend_range(&rows, dir, total);
                    assert!(rows.iter().all(|&r| r < total), "{rows:?}");
                }
            }
        }
    }

    // ── walk_range ───────────────────────────────────────────────────

    #[test]
    fn walk_down_selects_span() {
        assert_eq!(walk_range(0, 2, &[0]), vec![0, 1, 2]);
    }

    #[test]
    fn walk_up_visits_in_reverse() {
        assert_eq!(walk_range(4, 1, &[4]), vec![4, 3, 2, 1]);
    }

    #[test]
    fn walk_keeps_existing_and_moves_target_last() {
        assert_eq!(walk_range(0, 2, &[2, 0]), vec![0, 1, 2]);
        assert_eq!(walk_range(3, 3, &[]), vec![3]);
    }
}
