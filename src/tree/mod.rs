//! Tree model: slotmap-backed node arena, default/filtered root pair.

pub mod arena;
pub mod node;
pub mod root;

pub use arena::{FlattenOptions, Tree};
pub use node::{ChildrenState, DataId, NodeKey, TreeNode};
pub use root::{SelectedItem, SelectionChangeType, TreeRoot};
