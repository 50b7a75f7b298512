//! Shared numeric constants for the label canvas engine.

// ── Geometry ────────────────────────────────────────────────────

/// Minimum element width/height in canvas pixels. Mutations that would go
/// below this are clamped, never rejected.
pub const MIN_ELEMENT_SIZE_PX: f64 = 10.0;

/// Visual radius of a corner resize handle at 1:1 zoom, in canvas pixels.
pub const HANDLE_RADIUS_PX: f64 = 6.0;

/// A point is "on" a handle within this multiple of the visual radius.
pub const HANDLE_HIT_FACTOR: f64 = 2.0;

// ── Editing ─────────────────────────────────────────────────────

/// Offset applied to a pasted element so it does not cover its source.
pub const PASTE_OFFSET_PX: f64 = 20.0;

/// Arrow-key nudge distance in canvas pixels.
pub const NUDGE_STEP_PX: f64 = 1.0;

/// Arrow-key nudge distance with Shift held.
pub const NUDGE_STEP_SHIFT_PX: f64 = 10.0;

/// Maximum length of a text element's content, in characters.
pub const TEXT_MAX_CHARS: usize = 255;

// ── Rendering ───────────────────────────────────────────────────

/// Selection outline dash segment length in canvas pixels.
pub const SELECTION_DASH_PX: f64 = 4.0;

/// Quiet-zone padding around a rendered barcode, in canvas pixels.
pub const BARCODE_QUIET_ZONE_PX: f64 = 6.0;
