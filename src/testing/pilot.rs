//! Pilot: programmatic interaction with a headless tree grid.
//!
//! The `Pilot` wraps a [`TreeGrid`] over a [`MemorySource`] and a
//! [`HeadlessView`], and provides methods to simulate clicks and key presses
//! by data id, settle debounced selection events, and read back the visible
//! rows.

use tokio::time::Instant;

use super::snapshot::outline;
use super::source::MemorySource;
use super::view::HeadlessView;
use crate::event::{Key, KeyEvent, Modifiers, RowClick, TreeGridEvent};
use crate::grid::{Result, RowKind, TreeGrid, TreeGridConfig, TreeGridError};
use crate::tree::DataId;

/// A grid over in-memory data, rendering nowhere.
pub type HeadlessGrid = TreeGrid<MemorySource, HeadlessView>;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless grid driver for testing.
///
/// # Examples
///
/// ```ignore
/// use treegrid::testing::{MemorySource, Pilot};
///
/// let source = MemorySource::new().with_root(&["a", "b"]);
/// let mut pilot = Pilot::new(source);
/// pilot.load().await?;
/// pilot.click("b")?;
/// assert_eq!(pilot.highlighted().as_deref(), Some("b"));
/// ```
pub struct Pilot {
    grid: HeadlessGrid,
}

impl Pilot {
    /// Default config and a 20-row viewport.
    pub fn new(source: MemorySource) -> Self {
        Self::with_config(source, TreeGridConfig::default())
    }

    pub fn with_config(source: MemorySource, config: TreeGridConfig) -> Self {
        Self::with_view(source, config, HeadlessView::new(20))
    }

    pub fn with_view(source: MemorySource, config: TreeGridConfig, view: HeadlessView) -> Self {
        Self {
            grid: TreeGrid::new(source, view, config),
        }
    }

    /// Reload the grid from its source.
    pub async fn load(&mut self) -> Result<()> {
        self.grid.reload().await
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Press a key with no modifiers.
    pub async fn press(&mut self, key: Key) -> Result<bool> {
        self.grid.handle_key(KeyEvent::plain(key)).await
    }

    pub async fn press_with(&mut self, key: Key, modifiers: Modifiers) -> Result<bool> {
        self.grid.handle_key(KeyEvent::new(key, modifiers)).await
    }

    /// Plain click on the row showing `id`.
    pub fn click(&mut self, id: &str) -> Result<()> {
        self.click_with(id, Modifiers::NONE)
    }

    pub fn shift_click(&mut self, id: &str) -> Result<()> {
        self.click_with(id, Modifiers::SHIFT)
    }

    pub fn ctrl_click(&mut self, id: &str) -> Result<()> {
        self.click_with(id, Modifiers::CTRL)
    }

    /// Click the selection checkbox of the row showing `id`.
    pub fn check(&mut self, id: &str) -> Result<()> {
        let row = self.require_row(id)?;
        self.grid.click(RowClick::new(row).on_checkbox())
    }

    fn click_with(&mut self, id: &str, modifiers: Modifiers) -> Result<()> {
        let row = self.require_row(id)?;
        self.grid.click(RowClick::new(row).with_modifiers(modifiers))
    }

    // ── Structure ────────────────────────────────────────────────────

    pub async fn expand(&mut self, id: &str) -> Result<bool> {
        self.grid.expand_data(&DataId::from(id)).await
    }

    pub fn collapse(&mut self, id: &str) -> Result<bool> {
        let key = self
            .grid
            .tree()
            .find_node(&DataId::from(id))
            .ok_or_else(|| TreeGridError::NodeNotFound(DataId::from(id)))?;
        self.grid.collapse(key, false)
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Let the selection quiet period elapse and flush the pending event.
    pub fn settle(&mut self) -> bool {
        let later = Instant::now() + self.grid.config().selection_debounce;
        self.grid.flush_selection_changed(later)
    }

    /// Drain pending events.
    pub fn events(&mut self) -> Vec<TreeGridEvent> {
        self.grid.drain_events()
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn grid(&self) -> &HeadlessGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut HeadlessGrid {
        &mut self.grid
    }

    pub fn source(&self) -> &MemorySource {
        self.grid.source()
    }

    /// Visible rows as ids; load-more rows read `…`.
    pub fn rows(&self) -> Vec<String> {
        self.grid
            .rows()
            .iter()
            .map(|row| match &row.kind {
                RowKind::Node { data_id, .. } => data_id.to_string(),
                RowKind::LoadMore { .. } => "…".to_owned(),
            })
            .collect()
    }

    /// Selected ids in the current tree, in selection order.
    pub fn selected(&self) -> Vec<String> {
        self.grid
            .selected_ids()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn highlighted(&self) -> Option<String> {
        self.grid.highlighted().map(ToString::to_string)
    }

    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.grid.row_of(&DataId::from(id))
    }

    /// Outline of the visible rows; see [`outline`].
    pub fn outline(&self) -> String {
        outline(self.grid.rows())
    }

    fn require_row(&self, id: &str) -> Result<usize> {
        self.row_of(id)
            .ok_or_else(|| TreeGridError::NodeNotFound(DataId::from(id)))
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    fn pilot() -> Pilot {
        let source = MemorySource::new()
            .with_root(&["a", "b", "c"])
            .with_children("b", &["b1", "b2"]);
        let mut pilot = Pilot::new(source);
        block_on(pilot.load()).unwrap();
        pilot
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn load_shows_top_level() {
        let pilot = pilot();
        assert_eq!(pilot.rows(), vec!["a", "b", "c"]);
        assert_eq!(pilot.source().fetches(), vec!["root@0"]);
    }

    #[test]
    fn view_receives_rows() {
        let pilot = pilot();
        assert_eq!(pilot.grid().view().rows().len(), 3);
        assert_eq!(pilot.grid().view().id_property(), "id");
    }

    // ── Input ────────────────────────────────────────────────────────

    #[test]
    fn click_unknown_row_fails() {
        let mut pilot = pilot();
        assert!(matches!(
            pilot.click("zz"),
            Err(TreeGridError::NodeNotFound(_))
        ));
    }

    #[test]
    fn press_unbound_key_is_unhandled() {
        let mut pilot = pilot();
        assert!(!block_on(pilot.press(Key::F(9))).unwrap());
    }

    #[test]
    fn settle_flushes_once() {
        let mut pilot = pilot();
        pilot.check("a").unwrap();
        assert!(pilot.settle());
        assert!(!pilot.settle());
    }
}
