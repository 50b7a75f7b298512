//! Rendering: draws the label scene to a 2D canvas context.
//!
//! This module is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. It is a read-only consumer of the
//! editor store: white label background, elements ascending by `(z_index,
//! id)` with each element's rotation transform applied, then the selection
//! chrome (dashed outline plus four corner handles). Invisible elements are
//! skipped entirely.
//!
//! Image bitmaps load asynchronously; [`ImageCache`] keys them by source
//! reference and invokes the host's callback when a bitmap arrives so the
//! host can schedule a repaint.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::barcode::{self, SymbolPattern};
use crate::consts::{BARCODE_QUIET_ZONE_PX, HANDLE_RADIUS_PX, SELECTION_DASH_PX};
use crate::element::{ElementProps, FontWeight, LabelElement, ShapeKind, Symbology, TextAlign};
use crate::geometry::{self, Handle};
use crate::store::EditorStore;

/// Points per inch, for font point-to-pixel conversion at label DPI.
const POINTS_PER_INCH: f64 = 72.0;

/// Horizontal text inset from the element edge.
const TEXT_PAD_PX: f64 = 4.0;

/// Cache of image bitmaps keyed by source reference.
///
/// A miss kicks off an asynchronous load; once the bitmap arrives the
/// registered host callback fires and the next repaint picks it up.
#[derive(Default)]
pub struct ImageCache {
    images: HashMap<String, HtmlImageElement>,
    on_load: Option<js_sys::Function>,
}

impl ImageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Host callback invoked when any bitmap finishes loading.
    pub fn set_on_load(&mut self, callback: js_sys::Function) {
        self.on_load = Some(callback);
    }

    /// The bitmap for `src`, if it has finished loading. Starts the load on
    /// first sight of a source reference.
    fn resolve(&mut self, src: &str) -> Option<HtmlImageElement> {
        if let Some(img) = self.images.get(src) {
            return img.complete().then(|| img.clone());
        }
        let img = HtmlImageElement::new().ok()?;
        if let Some(ref callback) = self.on_load {
            img.set_onload(Some(callback));
        }
        img.set_src(src);
        let ready = img.complete().then(|| img.clone());
        self.images.insert(src.to_owned(), img);
        ready
    }
}

/// Draw the full scene: background, elements in z-order, selection chrome.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(ctx: &CanvasRenderingContext2d, store: &EditorStore, images: &mut ImageCache) -> Result<(), JsValue> {
    let config = store.config();
    let dpi = config.dpi.dots_per_inch();

    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, config.width_px, config.height_px);
    ctx.set_fill_style_str("#FFFFFF");
    ctx.fill_rect(0.0, 0.0, config.width_px, config.height_px);

    for el in store.sorted_elements() {
        if !el.visible {
            continue;
        }
        draw_element(ctx, el, dpi, images)?;
    }

    if let Some(sel) = store.selected_element() {
        if sel.visible {
            draw_selection(ctx, sel)?;
        }
    }

    Ok(())
}

// =============================================================
// Element dispatch
// =============================================================

fn draw_element(
    ctx: &CanvasRenderingContext2d,
    el: &LabelElement,
    dpi: f64,
    images: &mut ImageCache,
) -> Result<(), JsValue> {
    ctx.save();
    translate_and_rotate(ctx, el)?;
    let result = match &el.props {
        ElementProps::Text { content, font_family, font_size_pt, weight, color, align } => {
            draw_text(ctx, el, content, font_family, *font_size_pt, *weight, color, *align, dpi)
        }
        ElementProps::Image { src, opacity, .. } => draw_image(ctx, el, images, src, *opacity),
        ElementProps::Barcode { symbology, value, show_text, text_size_pt } => {
            draw_barcode(ctx, el, *symbology, value, *show_text, *text_size_pt, dpi)
        }
        ElementProps::Shape { kind, fill, fill_opacity, border_color, border_width } => {
            draw_shape(ctx, el, *kind, fill, *fill_opacity, border_color, *border_width)
        }
    };
    ctx.restore();
    result
}

// =============================================================
// Text
// =============================================================

#[allow(clippy::too_many_arguments)]
fn draw_text(
    ctx: &CanvasRenderingContext2d,
    el: &LabelElement,
    content: &str,
    font_family: &str,
    font_size_pt: f64,
    weight: FontWeight,
    color: &str,
    align: TextAlign,
    dpi: f64,
) -> Result<(), JsValue> {
    if content.is_empty() {
        return Ok(());
    }

    let size_px = pt_to_px(font_size_pt, dpi);
    let weight_css = match weight {
        FontWeight::Normal => "normal",
        FontWeight::Bold => "bold",
    };
    ctx.set_font(&format!("{weight_css} {size_px:.1}px {font_family}"));
    ctx.set_fill_style_str(color);
    ctx.set_text_baseline("middle");

    let hw = el.width / 2.0;
    // Canvas2D has no justify; it falls back to left like the source editor.
    let (css_align, x) = match align {
        TextAlign::Left | TextAlign::Justify => ("left", -hw + TEXT_PAD_PX),
        TextAlign::Center => ("center", 0.0),
        TextAlign::Right => ("right", hw - TEXT_PAD_PX),
    };
    ctx.set_text_align(css_align);

    let max_w = (el.width - TEXT_PAD_PX * 2.0).max(1.0);
    let fitted = fit_text_with_ellipsis(ctx, content, max_w);
    ctx.fill_text(&fitted, x, 0.0)?;
    Ok(())
}

fn fit_text_with_ellipsis(ctx: &CanvasRenderingContext2d, text: &str, max_w: f64) -> String {
    if measured_text_width(ctx, text) <= max_w {
        return text.to_owned();
    }
    let ellipsis = "...";
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate = format!("{}{}", chars.iter().collect::<String>().trim_end(), ellipsis);
        if measured_text_width(ctx, &candidate) <= max_w {
            return candidate;
        }
    }
    ellipsis.to_owned()
}

fn measured_text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    match ctx.measure_text(text) {
        Ok(metrics) => metrics.width(),
        Err(_) => f64::INFINITY,
    }
}

// =============================================================
// Image
// =============================================================

fn draw_image(
    ctx: &CanvasRenderingContext2d,
    el: &LabelElement,
    images: &mut ImageCache,
    src: &str,
    opacity: f64,
) -> Result<(), JsValue> {
    let hw = el.width / 2.0;
    let hh = el.height / 2.0;

    match images.resolve(src) {
        Some(img) => {
            ctx.set_global_alpha((opacity / 100.0).clamp(0.0, 1.0));
            ctx.draw_image_with_html_image_element_and_dw_and_dh(&img, -hw, -hh, el.width, el.height)?;
            ctx.set_global_alpha(1.0);
        }
        None => {
            // Bitmap still loading: placeholder box.
            ctx.set_fill_style_str("#F0F0F0");
            ctx.fill_rect(-hw, -hh, el.width, el.height);
            ctx.set_stroke_style_str("#BBBBBB");
            ctx.set_line_width(1.0);
            ctx.stroke_rect(-hw, -hh, el.width, el.height);
        }
    }
    Ok(())
}

// =============================================================
// Barcode
// =============================================================

fn draw_barcode(
    ctx: &CanvasRenderingContext2d,
    el: &LabelElement,
    symbology: Symbology,
    value: &str,
    show_text: bool,
    text_size_pt: f64,
    dpi: f64,
) -> Result<(), JsValue> {
    let hw = el.width / 2.0;
    let hh = el.height / 2.0;

    let caption_px = if show_text { pt_to_px(text_size_pt, dpi) * 1.4 } else { 0.0 };
    let symbol_h = (el.height - caption_px - BARCODE_QUIET_ZONE_PX).max(1.0);

    ctx.set_fill_style_str("#000000");
    match barcode::encode_preview(symbology, value) {
        Some(SymbolPattern::Linear(bars)) => {
            #[allow(clippy::cast_precision_loss)]
            let module_w = (el.width - BARCODE_QUIET_ZONE_PX * 2.0) / bars.len() as f64;
            let mut x = -hw + BARCODE_QUIET_ZONE_PX;
            for bar in bars {
                if bar {
                    ctx.fill_rect(x, -hh, module_w, symbol_h);
                }
                x += module_w;
            }
        }
        Some(SymbolPattern::Matrix { size, cells }) => {
            #[allow(clippy::cast_precision_loss)]
            let cell = (el.width.min(symbol_h) - BARCODE_QUIET_ZONE_PX * 2.0).max(1.0) / size as f64;
            #[allow(clippy::cast_precision_loss)]
            let extent = cell * size as f64;
            let left = -extent / 2.0;
            let top = -hh + (symbol_h - extent) / 2.0;
            for (i, dark) in cells.iter().enumerate() {
                if *dark {
                    #[allow(clippy::cast_precision_loss)]
                    let cx = left + (i % size) as f64 * cell;
                    #[allow(clippy::cast_precision_loss)]
                    let cy = top + (i / size) as f64 * cell;
                    ctx.fill_rect(cx, cy, cell, cell);
                }
            }
        }
        None => {
            // Unencodable value: keep the element visible as an empty frame.
            ctx.set_stroke_style_str("#BBBBBB");
            ctx.set_line_width(1.0);
            ctx.stroke_rect(-hw, -hh, el.width, el.height);
        }
    }

    if show_text {
        ctx.set_fill_style_str("#000000");
        ctx.set_text_align("center");
        ctx.set_text_baseline("bottom");
        ctx.set_font(&format!("{:.1}px monospace", pt_to_px(text_size_pt, dpi)));
        let fitted = fit_text_with_ellipsis(ctx, value, el.width - TEXT_PAD_PX * 2.0);
        ctx.fill_text(&fitted, 0.0, hh)?;
    }
    Ok(())
}

// =============================================================
// Shapes
// =============================================================

fn draw_shape(
    ctx: &CanvasRenderingContext2d,
    el: &LabelElement,
    kind: ShapeKind,
    fill: &str,
    fill_opacity: f64,
    border_color: &str,
    border_width: f64,
) -> Result<(), JsValue> {
    let hw = el.width / 2.0;
    let hh = el.height / 2.0;

    match kind {
        ShapeKind::Rectangle => {
            ctx.set_global_alpha((fill_opacity / 100.0).clamp(0.0, 1.0));
            ctx.set_fill_style_str(fill);
            ctx.fill_rect(-hw, -hh, el.width, el.height);
            ctx.set_global_alpha(1.0);
            if border_width > 0.0 {
                ctx.set_stroke_style_str(border_color);
                ctx.set_line_width(border_width);
                ctx.stroke_rect(-hw, -hh, el.width, el.height);
            }
        }
        ShapeKind::Circle => {
            ctx.begin_path();
            ctx.ellipse(0.0, 0.0, hw, hh, 0.0, 0.0, 2.0 * PI)?;
            ctx.set_global_alpha((fill_opacity / 100.0).clamp(0.0, 1.0));
            ctx.set_fill_style_str(fill);
            ctx.fill();
            ctx.set_global_alpha(1.0);
            if border_width > 0.0 {
                ctx.set_stroke_style_str(border_color);
                ctx.set_line_width(border_width);
                ctx.stroke();
            }
        }
        ShapeKind::Line => {
            ctx.set_stroke_style_str(border_color);
            ctx.set_line_width(border_width.max(1.0));
            ctx.begin_path();
            ctx.move_to(-hw, 0.0);
            ctx.line_to(hw, 0.0);
            ctx.stroke();
        }
    }
    Ok(())
}

// =============================================================
// Selection chrome
// =============================================================

fn draw_selection(ctx: &CanvasRenderingContext2d, el: &LabelElement) -> Result<(), JsValue> {
    ctx.save();

    // Dashed bounding box, drawn unrotated: handles and hit-testing operate
    // on the unrotated box, so the chrome shows what is actually clickable.
    ctx.set_stroke_style_str("#1E90FF");
    ctx.set_line_width(1.0);
    let dash_array = js_sys::Array::new();
    dash_array.push(&SELECTION_DASH_PX.into());
    dash_array.push(&SELECTION_DASH_PX.into());
    ctx.set_line_dash(&dash_array)?;
    ctx.stroke_rect(el.x, el.y, el.width, el.height);
    ctx.set_line_dash(&js_sys::Array::new())?;

    ctx.set_fill_style_str("#FFFFFF");
    for handle in Handle::ALL {
        let pos = geometry::handle_position(el, handle);
        ctx.begin_path();
        ctx.arc(pos.x, pos.y, HANDLE_RADIUS_PX, 0.0, 2.0 * PI)?;
        ctx.fill();
        ctx.stroke();
    }

    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Translate to the element's center and rotate by its rotation angle.
/// Rotation applies only here; hit-testing stays bounding-box based.
fn translate_and_rotate(ctx: &CanvasRenderingContext2d, el: &LabelElement) -> Result<(), JsValue> {
    let (cx, cy) = el.center();
    ctx.translate(cx, cy)?;
    ctx.rotate(el.rotation.to_radians())?;
    Ok(())
}

/// Font points to canvas pixels at the label's DPI.
fn pt_to_px(pt: f64, dpi: f64) -> f64 {
    pt * dpi / POINTS_PER_INCH
}
