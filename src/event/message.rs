//! Events emitted by a tree grid to its consumers.

use std::fmt;

use crate::tree::{DataId, SelectionChangeType};

/// What happened to the items in a [`TreeGridEvent::DataChanged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataChangeKind {
    Added,
    Updated,
    Deleted,
}

/// Notification from a tree grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeGridEvent {
    /// A reload finished and the rows are in place.
    Loaded,
    /// Items were added, updated or deleted.
    DataChanged {
        kind: DataChangeKind,
        items: Vec<DataId>,
    },
    /// The selection settled after a burst of changes.
    SelectionChanged {
        change: SelectionChangeType,
        selection: Vec<DataId>,
    },
    /// The highlighted row changed.
    HighlightingChanged { highlighted: Option<DataId> },
    /// Input handling was switched on or off.
    ActiveChanged(bool),
    /// A context menu was requested at a position.
    ContextMenuShown { x: u16, y: u16 },
    /// Enter was pressed on a node.
    EditRequested { data_id: DataId },
    /// A custom key binding fired.
    Action(String),
}

impl TreeGridEvent {
    /// Human-readable name for this event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            TreeGridEvent::Loaded => "Loaded",
            TreeGridEvent::DataChanged { .. } => "DataChanged",
            TreeGridEvent::SelectionChanged { .. } => "SelectionChanged",
            TreeGridEvent::HighlightingChanged { .. } => "HighlightingChanged",
            TreeGridEvent::ActiveChanged(_) => "ActiveChanged",
            TreeGridEvent::ContextMenuShown { .. } => "ContextMenuShown",
            TreeGridEvent::EditRequested { .. } => "EditRequested",
            TreeGridEvent::Action(_) => "Action",
        }
    }
}

impl fmt::Display for TreeGridEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeGridEvent::DataChanged { kind, items } => {
                write!(f, "DataChanged({kind:?}, {} items)", items.len())
            }
            TreeGridEvent::ActiveChanged(active) => write!(f, "ActiveChanged({active})"),
            TreeGridEvent::Action(name) => write!(f, "Action({name})"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(TreeGridEvent::Loaded.name(), "Loaded");
        assert_eq!(TreeGridEvent::ActiveChanged(true).name(), "ActiveChanged");
        assert_eq!(
            TreeGridEvent::ContextMenuShown { x: 1, y: 2 }.name(),
            "ContextMenuShown"
        );
    }

    #[test]
    fn display() {
        let event = TreeGridEvent::DataChanged {
            kind: DataChangeKind::Deleted,
            items: vec![DataId::from("a"), DataId::from("b")],
        };
        assert_eq!(event.to_string(), "DataChanged(Deleted, 2 items)");
        assert_eq!(TreeGridEvent::ActiveChanged(false).to_string(), "ActiveChanged(false)");
        assert_eq!(TreeGridEvent::Loaded.to_string(), "Loaded");
    }
}
