//! Tool/placement controller: maps toolbar actions to element creation.
//!
//! Two states: `Idle` and `Placement(kind)`. Tools that need a canvas click
//! (currently only text) enter placement mode and create on the next click;
//! Escape cancels without creating. All other tools create immediately at the
//! canvas center and never enter placement. The image tool's upload happens
//! at the host boundary (see [`crate::persist::ImageStore`]); only a
//! successful upload reaches [`ToolController::finish_image_upload`], so a
//! failed upload never leaves a partial element behind.

#[cfg(test)]
#[path = "tool_test.rs"]
mod tool_test;

use crate::element::{ElementId, ElementProps, ShapeKind};
use crate::geometry::Point;
use crate::store::EditorStore;

/// Element kinds that are created by clicking a canvas position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    Text,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolState {
    /// No pending placement; canvas clicks select and drag.
    #[default]
    Idle,
    /// The next canvas click creates an element of this kind.
    Placement(PlacementKind),
}

/// The toolbar-to-store dispatcher.
#[derive(Debug, Default)]
pub struct ToolController {
    state: ToolState,
}

impl ToolController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ToolState {
        self.state
    }

    /// Whether a placement is pending (the canvas UI shows a crosshair).
    #[must_use]
    pub fn is_placing(&self) -> bool {
        matches!(self.state, ToolState::Placement(_))
    }

    /// Text tool: arm placement mode for the next canvas click.
    pub fn activate_text(&mut self) {
        self.state = ToolState::Placement(PlacementKind::Text);
    }

    /// Barcode tool: create immediately at the canvas center.
    pub fn activate_barcode(&mut self, store: &mut EditorStore) -> ElementId {
        store.add_element_centered(ElementProps::barcode_default())
    }

    /// Shape tool: create immediately at the canvas center.
    pub fn activate_shape(&mut self, store: &mut EditorStore, kind: ShapeKind) -> ElementId {
        store.add_element_centered(ElementProps::shape_default(kind))
    }

    /// Image tool, after the upload collaborator succeeded: create the
    /// element for the uploaded source at the canvas center.
    pub fn finish_image_upload(&mut self, store: &mut EditorStore, src: String) -> ElementId {
        store.add_element_centered(ElementProps::image_default(src))
    }

    /// A canvas click while placement is armed creates the pending element
    /// (offset from the click point) and returns to idle. Returns `None`
    /// when idle, leaving the click to selection handling.
    pub fn canvas_click(&mut self, store: &mut EditorStore, pt: Point) -> Option<ElementId> {
        let ToolState::Placement(kind) = self.state else {
            return None;
        };
        self.state = ToolState::Idle;
        let props = match kind {
            PlacementKind::Text => ElementProps::text_default(),
        };
        Some(store.add_element_at_click(props, pt))
    }

    /// Escape: leave placement mode without creating anything.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }
}
