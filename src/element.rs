//! Element model: the typed drawable primitives that make up a label design.
//!
//! This module defines `LabelElement` (shared geometry fields), the tagged
//! `ElementProps` union over the four element kinds (text, image, barcode,
//! shape), per-kind defaults used by the tool controller, and a sparse-update
//! type (`PartialElement`) for incremental edits from the properties panel.
//!
//! Every mutation path funnels through [`LabelElement::clamp_min_size`] so the
//! `width >= 10 && height >= 10` invariant holds at all times. Rotation is
//! stored in degrees and normalized into `[0, 360)`.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::MIN_ELEMENT_SIZE_PX;

/// Unique identifier for a label element.
pub type ElementId = Uuid;

/// The kind of a label element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A run of styled text.
    Text,
    /// A raster image referenced by URL.
    Image,
    /// A 1D or 2D barcode symbol.
    Barcode,
    /// A filled/stroked primitive shape.
    Shape,
}

/// Horizontal text alignment within the element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Font weight exposed by the editor UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Supported barcode symbologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbology {
    #[serde(rename = "CODE128")]
    Code128,
    #[serde(rename = "CODE39")]
    Code39,
    #[serde(rename = "EAN13")]
    Ean13,
    #[serde(rename = "EAN8")]
    Ean8,
    #[serde(rename = "UPC-A")]
    UpcA,
    #[serde(rename = "UPC-E")]
    UpcE,
    #[serde(rename = "QRCODE")]
    Qrcode,
    #[serde(rename = "AZTEC")]
    Aztec,
}

impl Symbology {
    /// Whether this symbology renders as a 2D matrix rather than linear bars.
    #[must_use]
    pub fn is_matrix(self) -> bool {
        matches!(self, Self::Qrcode | Self::Aztec)
    }
}

/// Primitive shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
}

/// Kind-specific payload of a label element.
///
/// Tagged so that serialization round-trips the variant and so every dispatch
/// site (rendering, validation, properties panel) matches exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementProps {
    Text {
        /// Text content, at most 255 characters.
        content: String,
        /// CSS font family name.
        font_family: String,
        /// Font size in points.
        font_size_pt: f64,
        /// Normal or bold.
        weight: FontWeight,
        /// CSS color string.
        color: String,
        /// Horizontal alignment within the element box.
        align: TextAlign,
    },
    Image {
        /// Source reference (URL or storage handle).
        src: String,
        /// Opacity percentage in `[0, 100]`.
        opacity: f64,
        /// Keep width/height ratio fixed while resizing.
        lock_aspect: bool,
    },
    Barcode {
        /// Symbology used to encode the value.
        symbology: Symbology,
        /// Encoded value; must satisfy the symbology's pattern.
        value: String,
        /// Draw the value as human-readable text under the symbol.
        show_text: bool,
        /// Font size in points for the human-readable caption.
        text_size_pt: f64,
    },
    Shape {
        /// Rectangle, circle, or line.
        kind: ShapeKind,
        /// CSS fill color.
        fill: String,
        /// Fill opacity percentage in `[0, 100]`.
        fill_opacity: f64,
        /// CSS border color.
        border_color: String,
        /// Border stroke width in pixels.
        border_width: f64,
    },
}

impl ElementProps {
    /// Default payload for a new text element: 14 pt black left-aligned.
    #[must_use]
    pub fn text_default() -> Self {
        Self::Text {
            content: "New Text".to_owned(),
            font_family: "Arial".to_owned(),
            font_size_pt: 14.0,
            weight: FontWeight::Normal,
            color: "#000000".to_owned(),
            align: TextAlign::Left,
        }
    }

    /// Default payload for a new image element with the given source.
    #[must_use]
    pub fn image_default(src: String) -> Self {
        Self::Image { src, opacity: 100.0, lock_aspect: false }
    }

    /// Default payload for a new barcode element: CODE128 with caption.
    #[must_use]
    pub fn barcode_default() -> Self {
        Self::Barcode {
            symbology: Symbology::Code128,
            value: "123456789012".to_owned(),
            show_text: true,
            text_size_pt: 10.0,
        }
    }

    /// Default payload for a new shape element of the given kind.
    #[must_use]
    pub fn shape_default(kind: ShapeKind) -> Self {
        Self::Shape {
            kind,
            fill: "#CCCCCC".to_owned(),
            fill_opacity: 100.0,
            border_color: "#000000".to_owned(),
            border_width: 1.0,
        }
    }

    /// The element kind this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text { .. } => ElementKind::Text,
            Self::Image { .. } => ElementKind::Image,
            Self::Barcode { .. } => ElementKind::Barcode,
            Self::Shape { .. } => ElementKind::Shape,
        }
    }

    /// Default box size in canvas pixels for a freshly created element.
    #[must_use]
    pub fn default_size(&self) -> (f64, f64) {
        match self {
            Self::Text { .. } => (200.0, 40.0),
            Self::Image { .. } => (150.0, 150.0),
            Self::Barcode { .. } => (200.0, 80.0),
            Self::Shape { kind: ShapeKind::Line, .. } => (100.0, 10.0),
            Self::Shape { .. } => (100.0, 100.0),
        }
    }
}

/// A single placeable element on the label canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelElement {
    /// Unique identifier, stable for the element's lifetime.
    pub id: ElementId,
    /// Left edge of the bounding box in canvas pixels.
    pub x: f64,
    /// Top edge of the bounding box in canvas pixels.
    pub y: f64,
    /// Width of the bounding box in canvas pixels; always `>= 10`.
    pub width: f64,
    /// Height of the bounding box in canvas pixels; always `>= 10`.
    pub height: f64,
    /// Clockwise rotation in degrees around the element center, `[0, 360)`.
    /// Applied only when rendering; hit-testing uses the unrotated box.
    pub rotation: f64,
    /// Stacking order; lower values are drawn beneath higher values.
    pub z_index: i64,
    /// Hidden elements are skipped by rendering and hit-testing.
    pub visible: bool,
    /// Kind-specific payload.
    pub props: ElementProps,
}

impl LabelElement {
    /// Create an element at the given top-left with the payload's default
    /// size. The id is freshly generated.
    #[must_use]
    pub fn new(x: f64, y: f64, z_index: i64, props: ElementProps) -> Self {
        let (width, height) = props.default_size();
        let mut el = Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            z_index,
            visible: true,
            props,
        };
        el.clamp_min_size();
        el
    }

    /// The element kind, derived from its payload.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.props.kind()
    }

    /// Center of the unrotated bounding box.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the unrotated bounding box contains the point.
    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Clamp width/height up to the minimum element size. Position is left
    /// untouched; edge-anchored adjustment is the resize engine's job.
    pub fn clamp_min_size(&mut self) {
        self.width = self.width.max(MIN_ELEMENT_SIZE_PX);
        self.height = self.height.max(MIN_ELEMENT_SIZE_PX);
    }

    /// Normalize `rotation` into `[0, 360)`.
    pub fn normalize_rotation(&mut self) {
        self.rotation = self.rotation.rem_euclid(360.0);
    }

    /// Value-clone with a fresh id, offset by `(dx, dy)`. Used by paste and
    /// duplicate.
    #[must_use]
    pub fn clone_offset(&self, dx: f64, dy: f64, z_index: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: self.x + dx,
            y: self.y + dy,
            z_index,
            ..self.clone()
        }
    }
}

/// Sparse update for a label element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialElement {
    /// New x position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New y position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New width, if being updated. Clamped to the minimum size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New height, if being updated. Clamped to the minimum size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New rotation in degrees, if being updated. Normalized to `[0, 360)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// New z-index, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// New visibility flag, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Replacement payload, if being updated. Must keep the element's kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<ElementProps>,
}

impl PartialElement {
    /// A partial that only moves the element.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    /// A partial that replaces the payload.
    #[must_use]
    pub fn with_props(props: ElementProps) -> Self {
        Self { props: Some(props), ..Self::default() }
    }

    /// Apply the present fields to `el`, then re-establish the size and
    /// rotation invariants.
    pub fn apply(&self, el: &mut LabelElement) {
        if let Some(x) = self.x {
            el.x = x;
        }
        if let Some(y) = self.y {
            el.y = y;
        }
        if let Some(w) = self.width {
            el.width = w;
        }
        if let Some(h) = self.height {
            el.height = h;
        }
        if let Some(r) = self.rotation {
            el.rotation = r;
        }
        if let Some(z) = self.z_index {
            el.z_index = z;
        }
        if let Some(v) = self.visible {
            el.visible = v;
        }
        if let Some(ref props) = self.props {
            el.props = props.clone();
        }
        el.clamp_min_size();
        el.normalize_rotation();
    }
}
