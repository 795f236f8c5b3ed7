//! Key binding registry and resolution.
//!
//! [`KeyBindingRegistry`] maps key+modifier combinations to [`GridAction`]s.
//! The `with_defaults()` constructor installs the standard tree-grid
//! navigation keys. A registry is built by the host and handed to each grid;
//! there is no process-wide instance.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};

// ---------------------------------------------------------------------------
// GridAction
// ---------------------------------------------------------------------------

/// Action to take when a key binding is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridAction {
    /// Move the highlight (or single selection) to the previous row.
    MoveUp,
    /// Move the highlight (or single selection) to the next row.
    MoveDown,
    /// Grow or shrink the range selection upwards.
    ExtendUp,
    /// Grow or shrink the range selection downwards.
    ExtendDown,
    /// Collapse the current node, or jump to its parent.
    Collapse,
    /// Expand the current node.
    Expand,
    /// Toggle selection of the current row.
    ToggleSelection,
    /// Request an edit of the last selected or highlighted node.
    Edit,
    /// Select every visible row, or clear if all are selected.
    SelectAll,
    /// A named action forwarded to the host as an event.
    Custom(String),
}

// ---------------------------------------------------------------------------
// KeyBindingRegistry
// ---------------------------------------------------------------------------

/// Registry of key bindings, mapping (Key, Modifiers) -> GridAction.
#[derive(Debug, Clone)]
pub struct KeyBindingRegistry {
    bindings: HashMap<(Key, Modifiers), GridAction>,
}

impl KeyBindingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a registry with the standard tree-grid bindings.
    ///
    /// Defaults:
    /// - `Up` / `Down` -> MoveUp / MoveDown
    /// - `Shift+Up` / `Shift+Down` -> ExtendUp / ExtendDown
    /// - `Left` -> Collapse, `Right` -> Expand
    /// - `Space` -> ToggleSelection, `Enter` -> Edit
    /// - `Ctrl+A` and `Meta+A` -> SelectAll
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Up, Modifiers::NONE, GridAction::MoveUp);
        registry.bind(Key::Down, Modifiers::NONE, GridAction::MoveDown);
        registry.bind(Key::Up, Modifiers::SHIFT, GridAction::ExtendUp);
        registry.bind(Key::Down, Modifiers::SHIFT, GridAction::ExtendDown);
        registry.bind(Key::Left, Modifiers::NONE, GridAction::Collapse);
        registry.bind(Key::Right, Modifiers::NONE, GridAction::Expand);
        registry.bind(Key::Char(' '), Modifiers::NONE, GridAction::ToggleSelection);
        registry.bind(Key::Enter, Modifiers::NONE, GridAction::Edit);
        registry.bind(Key::Char('a'), Modifiers::CTRL, GridAction::SelectAll);
        registry.bind(Key::Char('a'), Modifiers::META, GridAction::SelectAll);
        registry
    }

    /// Register a key binding.
    ///
    /// If a binding already exists for this key+modifier combination, it is replaced.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: GridAction) {
        self.bindings.insert((key, modifiers), action);
    }

    /// Remove a key binding.
    ///
    /// Returns the removed action, if any.
    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<GridAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Look up the action for a given key event (exact key + modifiers match).
    pub fn resolve(&self, event: &KeyEvent) -> Option<&GridAction> {
        self.bindings.get(&(event.code, event.modifiers))
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the registry has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyBindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn new_registry_is_empty() {
        let reg = KeyBindingRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn with_defaults_binding_count() {
        let reg = KeyBindingRegistry::with_defaults();
        assert_eq!(reg.len(), 10);
    }

    // ── Bind / Unbind ────────────────────────────────────────────────

    #[test]
    fn bind_and_resolve() {
        let mut reg = KeyBindingRegistry::new();
        reg.bind(Key::Char('e'), Modifiers::NONE, GridAction::Edit);
        let event = KeyEvent::plain(Key::Char('e'));
        assert_eq!(reg.resolve(&event), Some(&GridAction::Edit));
    }

    #[test]
    fn resolve_wrong_modifiers() {
        let reg = KeyBindingRegistry::with_defaults();
        let event = KeyEvent::plain(Key::Char('a'));
        assert!(reg.resolve(&event).is_none());
        let event = KeyEvent::new(Key::Char('a'), Modifiers::CTRL | Modifiers::ALT);
        assert!(reg.resolve(&event).is_none());
    }

    #[test]
    fn unbind_removes_binding() {
        let mut reg = KeyBindingRegistry::with_defaults();
        let removed = reg.unbind(Key::Enter, Modifiers::NONE);
        assert_eq!(removed, Some(GridAction::Edit));
        assert!(reg.resolve(&KeyEvent::plain(Key::Enter)).is_none());
        assert!(reg.unbind(Key::Enter, Modifiers::NONE).is_none());
    }

    #[test]
    fn bind_overwrites_existing() {
        let mut reg = KeyBindingRegistry::new();
        reg.bind(Key::F(2), Modifiers::NONE, GridAction::Custom("first".into()));
        reg.bind(Key::F(2), Modifiers::NONE, GridAction::Custom("second".into()));
        assert_eq!(reg.len(), 1);
        assert_eq!(
            reg.resolve(&KeyEvent::plain(Key::F(2))),
            Some(&GridAction::Custom("second".into()))
        );
    }

    // ── Default bindings ─────────────────────────────────────────────

    #[test]
    fn defaults_navigation() {
        let reg = KeyBindingRegistry::with_defaults();
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Up)), Some(&GridAction::MoveUp));
        assert_eq!(
            reg.resolve(&KeyEvent::new(Key::Down, Modifiers::SHIFT)),
            Some(&GridAction::ExtendDown)
        );
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Left)), Some(&GridAction::Collapse));
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Right)), Some(&GridAction::Expand));
        assert_eq!(
            reg.resolve(&KeyEvent::plain(Key::Char(' '))),
            Some(&GridAction::ToggleSelection)
        );
    }

    #[test]
    fn defaults_select_all_on_both_mod_keys() {
        let reg = KeyBindingRegistry::with_defaults();
        for mods in [Modifiers::CTRL, Modifiers::META] {
            let event = KeyEvent::new(Key::Char('a'), mods);
            assert_eq!(reg.resolve(&event), Some(&GridAction::SelectAll));
        }
    }
}
