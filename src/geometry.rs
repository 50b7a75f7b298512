//! Geometry engine: coordinate mapping, hit-testing, and resize math.
//!
//! All functions here are pure over element geometry. Hit-testing and resize
//! both operate on the unrotated bounding box even though rendering applies
//! the element's rotation; a rotated element's clickable bounds therefore
//! diverge from its visual bounds. This mirrors the shipped editor's behavior
//! and is kept deliberately (flagged for product clarification rather than
//! "fixed" here).

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::consts::{HANDLE_HIT_FACTOR, HANDLE_RADIUS_PX, MIN_ELEMENT_SIZE_PX, NUDGE_STEP_PX, NUDGE_STEP_SHIFT_PX};
use crate::element::{ElementId, LabelElement};

/// A point in either screen or canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Mapping between the DOM element's rendered size and the canvas's logical
/// pixel grid.
///
/// The canvas is laid out in CSS at `rendered_width` while its backing store
/// is `canvas_width_px` wide; the same scale factor applies to both axes.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    /// Logical canvas width in pixels (from the canvas config).
    pub canvas_width_px: f64,
    /// Width at which the canvas element is rendered on screen, in CSS pixels.
    pub rendered_width: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(canvas_width_px: f64, rendered_width: f64) -> Self {
        Self { canvas_width_px, rendered_width }
    }

    /// Screen pixels to canvas pixels. Falls back to 1:1 before the first
    /// layout pass reports a rendered size.
    #[must_use]
    pub fn scale(&self) -> f64 {
        if self.rendered_width > 0.0 {
            self.canvas_width_px / self.rendered_width
        } else {
            1.0
        }
    }

    /// Convert a screen-space point (relative to the canvas element's
    /// top-left) to canvas pixel coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        let s = self.scale();
        Point { x: screen.x * s, y: screen.y * s }
    }
}

/// One of the four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Handle {
    /// All handles in render order.
    pub const ALL: [Self; 4] = [Self::Nw, Self::Ne, Self::Sw, Self::Se];

    /// Whether dragging this handle moves the west (left) edge.
    #[must_use]
    pub fn moves_west_edge(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }

    /// Whether dragging this handle moves the north (top) edge.
    #[must_use]
    pub fn moves_north_edge(self) -> bool {
        matches!(self, Self::Nw | Self::Ne)
    }
}

/// Center position of a handle on the element's unrotated bounding box.
#[must_use]
pub fn handle_position(el: &LabelElement, handle: Handle) -> Point {
    match handle {
        Handle::Nw => Point::new(el.x, el.y),
        Handle::Ne => Point::new(el.x + el.width, el.y),
        Handle::Sw => Point::new(el.x, el.y + el.height),
        Handle::Se => Point::new(el.x + el.width, el.y + el.height),
    }
}

/// Which handle of `el` (if any) lies under `pt`.
///
/// A handle is hit when the Euclidean distance to its center is within
/// twice the visual handle radius. Handle hits take priority over body hits,
/// so the caller checks this before falling back to [`hit_test`].
#[must_use]
pub fn handle_at(el: &LabelElement, pt: Point) -> Option<Handle> {
    let slop = HANDLE_RADIUS_PX * HANDLE_HIT_FACTOR;
    Handle::ALL.into_iter().find(|&h| {
        let center = handle_position(el, h);
        let dx = pt.x - center.x;
        let dy = pt.y - center.y;
        (dx * dx + dy * dy).sqrt() <= slop
    })
}

/// The topmost visible element whose bounding box contains `pt`, or `None`.
///
/// Elements are scanned from highest `(z_index, id)` down, matching the
/// renderer's paint order in reverse; invisible elements are skipped. A miss
/// means the caller should deselect.
#[must_use]
pub fn hit_test(elements: &[LabelElement], pt: Point) -> Option<ElementId> {
    let mut ordered: Vec<&LabelElement> = elements.iter().filter(|e| e.visible).collect();
    ordered.sort_by(|a, b| b.z_index.cmp(&a.z_index).then_with(|| b.id.cmp(&a.id)));
    ordered.into_iter().find(|e| e.contains(pt.x, pt.y)).map(|e| e.id)
}

/// Apply one incremental resize step for `handle` with cursor delta
/// `(dx, dy)` since the last sampled point.
///
/// Width/height are clamped to the minimum element size; when a clamp fires,
/// x/y are adjusted only for handles that moved the clamped edge, so the
/// anchored opposite corner stays fixed. (`se` with a huge negative delta
/// leaves x/y untouched.)
pub fn apply_resize(el: &mut LabelElement, handle: Handle, dx: f64, dy: f64) {
    let right = el.x + el.width;
    let bottom = el.y + el.height;

    match handle {
        Handle::Nw => {
            el.x += dx;
            el.y += dy;
            el.width -= dx;
            el.height -= dy;
        }
        Handle::Ne => {
            el.y += dy;
            el.width += dx;
            el.height -= dy;
        }
        Handle::Sw => {
            el.x += dx;
            el.width -= dx;
            el.height += dy;
        }
        Handle::Se => {
            el.width += dx;
            el.height += dy;
        }
    }

    if el.width < MIN_ELEMENT_SIZE_PX {
        if handle.moves_west_edge() {
            el.x = right - MIN_ELEMENT_SIZE_PX;
        }
        el.width = MIN_ELEMENT_SIZE_PX;
    }
    if el.height < MIN_ELEMENT_SIZE_PX {
        if handle.moves_north_edge() {
            el.y = bottom - MIN_ELEMENT_SIZE_PX;
        }
        el.height = MIN_ELEMENT_SIZE_PX;
    }
}

/// Arrow-key nudge distance: 1 px, or 10 px with Shift held. Unclamped;
/// elements may be nudged off-canvas.
#[must_use]
pub fn nudge_step(shift: bool) -> f64 {
    if shift { NUDGE_STEP_SHIFT_PX } else { NUDGE_STEP_PX }
}
