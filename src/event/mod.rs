//! Event system: input types, key bindings, emitted events, event queue.

pub mod binding;
pub mod handler;
pub mod input;
pub mod message;

pub use binding::{GridAction, KeyBindingRegistry};
pub use handler::EventQueue;
pub use input::{Key, KeyEvent, Modifiers, RowClick};
pub use message::{DataChangeKind, TreeGridEvent};
