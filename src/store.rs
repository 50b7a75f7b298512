//! Editor store: the composition root that owns one editing session.
//!
//! `EditorStore` owns the canvas configuration, the element list, the single
//! active selection, the undo/redo history, and the clipboard slot. All
//! mutating operations used by the tool controller, the input engine, and the
//! properties panel live here.
//!
//! Committing mutations snapshot the pre-mutation element list into history
//! before applying; gesture-scoped mutations (drag, resize, live text edits)
//! go through [`EditorStore::begin_transform`] once at gesture start and the
//! `*_transient` variants afterwards, so one gesture is one undo step.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::PASTE_OFFSET_PX;
use crate::element::{ElementId, ElementProps, LabelElement, PartialElement};
use crate::error::EditorError;
use crate::geometry::Point;
use crate::history::History;
use crate::validate::validate_props;

/// Millimeters per inch, for physical-size to pixel conversion.
const MM_PER_INCH: f64 = 25.4;

/// Zoom percentage bounds exposed by the UI.
const ZOOM_MIN_PERCENT: f64 = 25.0;
const ZOOM_MAX_PERCENT: f64 = 400.0;

/// Printer resolution of the target label stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum Dpi {
    Dpi203,
    Dpi300,
}

impl Dpi {
    /// Dots per inch as a number.
    #[must_use]
    pub fn dots_per_inch(self) -> f64 {
        match self {
            Self::Dpi203 => 203.0,
            Self::Dpi300 => 300.0,
        }
    }
}

impl From<Dpi> for u32 {
    fn from(dpi: Dpi) -> Self {
        match dpi {
            Dpi::Dpi203 => 203,
            Dpi::Dpi300 => 300,
        }
    }
}

impl TryFrom<u32> for Dpi {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            203 => Ok(Self::Dpi203),
            300 => Ok(Self::Dpi300),
            other => Err(format!("unsupported dpi {other}, expected 203 or 300")),
        }
    }
}

/// Canvas surface configuration for one label design.
///
/// `width_px`/`height_px` are the logical pixel grid elements are positioned
/// on, derived from the label's physical size at the selected DPI.
/// `zoom_percent` only affects how the host displays the canvas; stored
/// geometry never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width_px: f64,
    pub height_px: f64,
    pub dpi: Dpi,
    pub zoom_percent: f64,
}

impl CanvasConfig {
    /// Build a config from a physical label size in millimeters.
    #[must_use]
    pub fn from_label_mm(width_mm: f64, height_mm: f64, dpi: Dpi) -> Self {
        let dots = dpi.dots_per_inch();
        Self {
            width_px: (width_mm / MM_PER_INCH * dots).round(),
            height_px: (height_mm / MM_PER_INCH * dots).round(),
            dpi,
            zoom_percent: 100.0,
        }
    }

    /// Center of the canvas in pixel space.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width_px / 2.0, self.height_px / 2.0)
    }

    /// Re-derive the pixel grid for a new DPI, keeping the physical size.
    pub fn set_dpi(&mut self, dpi: Dpi) {
        let ratio = dpi.dots_per_inch() / self.dpi.dots_per_inch();
        self.width_px = (self.width_px * ratio).round();
        self.height_px = (self.height_px * ratio).round();
        self.dpi = dpi;
    }
}

impl Default for CanvasConfig {
    /// A 4×6 inch shipping label at 203 DPI.
    fn default() -> Self {
        Self::from_label_mm(101.6, 152.4, Dpi::Dpi203)
    }
}

/// One editing session's state: config, elements, selection, history,
/// clipboard.
#[derive(Debug, Default)]
pub struct EditorStore {
    config: CanvasConfig,
    elements: Vec<LabelElement>,
    selected_id: Option<ElementId>,
    history: History,
    clipboard: Option<LabelElement>,
}

impl EditorStore {
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        Self { config, ..Self::default() }
    }

    // --- Queries ---

    /// All elements in insertion order. Render order is by `(z_index, id)`.
    #[must_use]
    pub fn elements(&self) -> &[LabelElement] {
        &self.elements
    }

    /// Elements sorted ascending by `(z_index, id)` for painting and the
    /// layer panel.
    #[must_use]
    pub fn sorted_elements(&self) -> Vec<&LabelElement> {
        let mut out: Vec<&LabelElement> = self.elements.iter().collect();
        out.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        out
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&LabelElement> {
        self.elements.iter().find(|e| e.id == *id)
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected_id
    }

    #[must_use]
    pub fn selected_element(&self) -> Option<&LabelElement> {
        self.selected_id.and_then(|id| self.element(&id))
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether the clipboard slot holds an element.
    #[must_use]
    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Z-index for the next created element: one above the current maximum.
    #[must_use]
    pub fn next_z_index(&self) -> i64 {
        self.elements.iter().map(|e| e.z_index).max().unwrap_or(0) + 1
    }

    // --- Element creation ---

    /// Add an element with its top-left at `(x, y)` and select it.
    pub fn add_element(&mut self, props: ElementProps, x: f64, y: f64) -> ElementId {
        self.commit_checkpoint();
        let el = LabelElement::new(x, y, self.next_z_index(), props);
        let id = el.id;
        debug!(element = %id, kind = ?el.kind(), "add element");
        self.elements.push(el);
        self.selected_id = Some(id);
        id
    }

    /// Add an element centered on the canvas midpoint. Used by tools that
    /// create immediately, without placement mode.
    pub fn add_element_centered(&mut self, props: ElementProps) -> ElementId {
        let (w, h) = props.default_size();
        let c = self.config.center();
        self.add_element(props, c.x - w / 2.0, c.y - h / 2.0)
    }

    /// Add an element for a placement-mode canvas click, offset from the
    /// click point by a quarter of the element's size on each axis.
    pub fn add_element_at_click(&mut self, props: ElementProps, click: Point) -> ElementId {
        let (w, h) = props.default_size();
        self.add_element(props, click.x - w / 4.0, click.y - h / 4.0)
    }

    // --- Element mutation ---

    /// Apply a sparse update, recording an undo step.
    ///
    /// Payload replacements are validated first and must keep the element's
    /// kind; on any error the store (including history) is untouched, so the
    /// element's last-valid properties stay committed.
    pub fn update_element(&mut self, id: &ElementId, partial: &PartialElement) -> Result<(), EditorError> {
        self.check_update(id, partial)?;
        self.commit_checkpoint();
        self.apply_unchecked(id, partial);
        Ok(())
    }

    /// Apply a sparse update without recording history. Used mid-gesture
    /// (drag, resize, live text edits); pair with
    /// [`EditorStore::begin_transform`] at the gesture boundary.
    pub fn update_element_transient(&mut self, id: &ElementId, partial: &PartialElement) -> Result<(), EditorError> {
        self.check_update(id, partial)?;
        self.apply_unchecked(id, partial);
        Ok(())
    }

    /// Record one undo step covering an upcoming run of transient updates.
    pub fn begin_transform(&mut self, id: &ElementId) -> Result<(), EditorError> {
        if self.element(id).is_none() {
            return Err(EditorError::UnknownElement(*id));
        }
        self.commit_checkpoint();
        Ok(())
    }

    /// Remove an element. Clears the selection if it pointed at the element.
    pub fn delete_element(&mut self, id: &ElementId) -> Result<(), EditorError> {
        if self.element(id).is_none() {
            return Err(EditorError::UnknownElement(*id));
        }
        self.commit_checkpoint();
        debug!(element = %id, "delete element");
        self.elements.retain(|e| e.id != *id);
        if self.selected_id == Some(*id) {
            self.selected_id = None;
        }
        Ok(())
    }

    /// Translate the selected element by `(dx, dy)`, recording an undo step.
    /// Returns `false` when nothing is selected. No canvas-bounds clamping.
    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        let Some(id) = self.selected_id else {
            return false;
        };
        let Some(el) = self.element(&id) else {
            return false;
        };
        let partial = PartialElement::at(el.x + dx, el.y + dy);
        self.update_element(&id, &partial).is_ok()
    }

    // --- Z-order ---

    /// Raise an element above everything else.
    pub fn bring_to_front(&mut self, id: &ElementId) -> Result<(), EditorError> {
        let z = self.next_z_index();
        self.update_element(id, &PartialElement { z_index: Some(z), ..PartialElement::default() })
    }

    /// Lower an element beneath everything else.
    pub fn send_to_back(&mut self, id: &ElementId) -> Result<(), EditorError> {
        let min = self.elements.iter().map(|e| e.z_index).min().unwrap_or(0);
        self.update_element(id, &PartialElement { z_index: Some(min - 1), ..PartialElement::default() })
    }

    /// Swap z-indices with the next element above, if any.
    pub fn move_forward(&mut self, id: &ElementId) -> Result<(), EditorError> {
        self.swap_neighbor(id, true)
    }

    /// Swap z-indices with the next element below, if any.
    pub fn move_backward(&mut self, id: &ElementId) -> Result<(), EditorError> {
        self.swap_neighbor(id, false)
    }

    // --- Selection ---

    /// Select an element, replacing any prior selection. Returns `false`
    /// (leaving the selection untouched) for an unknown id.
    pub fn select(&mut self, id: &ElementId) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        self.selected_id = Some(*id);
        true
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selected_id = None;
    }

    // --- Clipboard ---

    /// Store a value copy of an element in the clipboard slot. Later
    /// mutations of the original do not affect the copy.
    pub fn copy(&mut self, id: &ElementId) -> bool {
        match self.element(id) {
            Some(el) => {
                self.clipboard = Some(el.clone());
                true
            }
            None => false,
        }
    }

    /// Insert a clone of the clipboard element with a fresh id, offset by
    /// the paste delta, on top of the stack. Selects the clone.
    pub fn paste(&mut self) -> Option<ElementId> {
        let source = self.clipboard.clone()?;
        self.commit_checkpoint();
        let el = source.clone_offset(PASTE_OFFSET_PX, PASTE_OFFSET_PX, self.next_z_index());
        let id = el.id;
        self.elements.push(el);
        self.selected_id = Some(id);
        Some(id)
    }

    /// Copy-and-paste a specific element in one step, without touching the
    /// shared clipboard slot.
    pub fn duplicate(&mut self, id: &ElementId) -> Option<ElementId> {
        let source = self.element(id)?.clone();
        self.commit_checkpoint();
        let el = source.clone_offset(PASTE_OFFSET_PX, PASTE_OFFSET_PX, self.next_z_index());
        let new_id = el.id;
        self.elements.push(el);
        self.selected_id = Some(new_id);
        Some(new_id)
    }

    // --- History ---

    /// Restore the previous snapshot. No-op (returns `false`) when the undo
    /// stack is empty.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.elements) {
            Some(snapshot) => {
                self.elements = snapshot;
                self.prune_selection();
                true
            }
            None => false,
        }
    }

    /// Restore the next snapshot. No-op (returns `false`) when the redo
    /// stack is empty.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.elements) {
            Some(snapshot) => {
                self.elements = snapshot;
                self.prune_selection();
                true
            }
            None => false,
        }
    }

    // --- Session boundaries ---

    /// Replace the whole session with a loaded design: new element list and
    /// config, empty history, no selection. The clipboard survives.
    pub fn load_design(&mut self, elements: Vec<LabelElement>, config: CanvasConfig) {
        debug!(count = elements.len(), "load design");
        self.elements = elements;
        for el in &mut self.elements {
            el.clamp_min_size();
            el.normalize_rotation();
        }
        self.config = config;
        self.history.clear();
        self.selected_id = None;
    }

    /// UI zoom, clamped to the supported range. Not a document mutation: no
    /// history entry, stored geometry unaffected.
    pub fn set_zoom(&mut self, percent: f64) {
        self.config.zoom_percent = percent.clamp(ZOOM_MIN_PERCENT, ZOOM_MAX_PERCENT);
    }

    /// Switch target DPI, re-deriving the canvas pixel grid.
    pub fn set_dpi(&mut self, dpi: Dpi) {
        self.config.set_dpi(dpi);
    }

    // --- Internals ---

    fn commit_checkpoint(&mut self) {
        self.history.commit(self.elements.clone());
    }

    fn check_update(&self, id: &ElementId, partial: &PartialElement) -> Result<(), EditorError> {
        let el = self.element(id).ok_or(EditorError::UnknownElement(*id))?;
        if let Some(ref props) = partial.props {
            if props.kind() != el.kind() {
                return Err(EditorError::KindMismatch { from: el.kind(), to: props.kind() });
            }
            validate_props(props)?;
        }
        Ok(())
    }

    fn apply_unchecked(&mut self, id: &ElementId, partial: &PartialElement) {
        if let Some(el) = self.elements.iter_mut().find(|e| e.id == *id) {
            partial.apply(el);
        }
    }

    fn prune_selection(&mut self) {
        if let Some(id) = self.selected_id {
            if self.element(&id).is_none() {
                self.selected_id = None;
            }
        }
    }

    fn swap_neighbor(&mut self, id: &ElementId, upward: bool) -> Result<(), EditorError> {
        let el = self.element(id).ok_or(EditorError::UnknownElement(*id))?;
        let (el_z, el_id) = (el.z_index, el.id);

        // Nearest element in the requested direction by (z, id) order.
        let candidates = self.elements.iter().filter(|e| e.id != el_id);
        let neighbor = if upward {
            candidates
                .filter(|e| (e.z_index, e.id) > (el_z, el_id))
                .min_by_key(|e| (e.z_index, e.id))
        } else {
            candidates
                .filter(|e| (e.z_index, e.id) < (el_z, el_id))
                .max_by_key(|e| (e.z_index, e.id))
        }
        .map(|e| (e.id, e.z_index));

        let Some((other_id, other_z)) = neighbor else {
            return Ok(());
        };

        self.commit_checkpoint();
        if let Some(e) = self.elements.iter_mut().find(|e| e.id == other_id) {
            e.z_index = el_z;
        }
        if let Some(e) = self.elements.iter_mut().find(|e| e.id == el_id) {
            e.z_index = other_z;
        }
        Ok(())
    }
}
