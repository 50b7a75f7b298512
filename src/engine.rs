//! Input engine: translates pointer/keyboard events into store mutations.
//!
//! `EngineCore` holds everything that does not touch the browser, so the
//! whole event flow is testable natively. `Engine` wraps it together with the
//! `HtmlCanvasElement` and the image cache for the WebAssembly host.
//!
//! Handlers return [`Action`] values instead of firing DOM events; the host
//! observes creations/updates for persistence and schedules a repaint on
//! [`Action::RenderNeeded`]. Drag and resize are stateful across events:
//! pointer-down establishes a gesture and a reference point, each
//! pointer-move applies the incremental delta and re-seeds the reference,
//! pointer-up (or leaving the canvas) ends the gesture.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlCanvasElement;

use crate::element::{ElementId, ShapeKind};
use crate::geometry::{self, Handle, Point, Viewport};
use crate::render::{self, ImageCache};
use crate::store::EditorStore;
use crate::tool::ToolController;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the platform clipboard/history chord modifier is held.
    #[must_use]
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key, holding the name the browser reports (`"Escape"`,
/// `"ArrowLeft"`, `"z"`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A new element exists; the host should persist it.
    ElementCreated(ElementId),
    /// An element's geometry or properties changed.
    ElementUpdated(ElementId),
    /// An element was removed.
    ElementDeleted(ElementId),
    /// The single selection changed (possibly to nothing).
    SelectionChanged(Option<ElementId>),
    /// Placement mode was entered or left; the host updates the cursor and
    /// toolbar affordance.
    PlacementChanged(bool),
    /// The scene must be repainted.
    RenderNeeded,
}

/// Active pointer gesture, carried between events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Waiting for the next pointer-down.
    Idle,
    /// Moving an element; `last` is the canvas-space reference point that
    /// each move event's delta is measured from and then re-seeded to.
    Dragging { id: ElementId, last: Point },
    /// Resizing an element by one corner handle, same incremental scheme.
    Resizing { id: ElementId, handle: Handle, last: Point },
}

impl Default for Gesture {
    fn default() -> Self {
        Self::Idle
    }
}

/// Core engine state: store, tool controller, gesture machine, viewport
/// mapping. Everything here runs natively for tests.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub store: EditorStore,
    pub tool: ToolController,
    gesture: Gesture,
    rendered_width: f64,
}

impl EngineCore {
    #[must_use]
    pub fn new(store: EditorStore) -> Self {
        Self { store, ..Self::default() }
    }

    /// Report the canvas element's rendered CSS width so screen coordinates
    /// can be mapped onto the logical pixel grid.
    pub fn set_rendered_width(&mut self, width: f64) {
        self.rendered_width = width;
    }

    #[must_use]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.store.config().width_px, self.rendered_width)
    }

    /// Map a screen-space point (relative to the canvas element) to canvas
    /// pixels.
    #[must_use]
    pub fn to_canvas(&self, screen: Point) -> Point {
        self.viewport().screen_to_canvas(screen)
    }

    // --- Toolbar surface ---

    /// Arm text placement mode.
    pub fn use_text_tool(&mut self) -> Vec<Action> {
        self.tool.activate_text();
        vec![Action::PlacementChanged(true)]
    }

    /// Create a barcode element at the canvas center.
    pub fn use_barcode_tool(&mut self) -> Vec<Action> {
        let id = self.tool.activate_barcode(&mut self.store);
        vec![Action::ElementCreated(id), Action::SelectionChanged(Some(id)), Action::RenderNeeded]
    }

    /// Create a shape element at the canvas center.
    pub fn use_shape_tool(&mut self, kind: ShapeKind) -> Vec<Action> {
        let id = self.tool.activate_shape(&mut self.store, kind);
        vec![Action::ElementCreated(id), Action::SelectionChanged(Some(id)), Action::RenderNeeded]
    }

    /// The image upload collaborator succeeded; create the element for the
    /// stored source. (On upload failure the host never calls this, so no
    /// partial element is created.)
    pub fn image_uploaded(&mut self, src: String) -> Vec<Action> {
        let id = self.tool.finish_image_upload(&mut self.store, src);
        vec![Action::ElementCreated(id), Action::SelectionChanged(Some(id)), Action::RenderNeeded]
    }

    // --- Pointer events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let pt = self.to_canvas(screen_pt);

        // Placement mode consumes the click.
        if self.tool.is_placing() {
            if let Some(id) = self.tool.canvas_click(&mut self.store, pt) {
                return vec![
                    Action::ElementCreated(id),
                    Action::SelectionChanged(Some(id)),
                    Action::PlacementChanged(false),
                    Action::RenderNeeded,
                ];
            }
        }

        // Handles of the selected element win over body hits and deselection.
        if let Some(sel) = self.store.selected_element() {
            if let Some(handle) = geometry::handle_at(sel, pt) {
                let id = sel.id;
                if self.store.begin_transform(&id).is_ok() {
                    self.gesture = Gesture::Resizing { id, handle, last: pt };
                }
                return Vec::new();
            }
        }

        match geometry::hit_test(self.store.elements(), pt) {
            Some(id) => {
                let changed = self.store.selected_id() != Some(id);
                self.store.select(&id);
                if self.store.begin_transform(&id).is_ok() {
                    self.gesture = Gesture::Dragging { id, last: pt };
                }
                let mut actions = Vec::new();
                if changed {
                    actions.push(Action::SelectionChanged(Some(id)));
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            None => {
                if self.store.selected_id().is_some() {
                    self.store.deselect();
                    vec![Action::SelectionChanged(None), Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let pt = self.to_canvas(screen_pt);
        match self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Dragging { id, last } => {
                let moved = self.store.element(&id).map(|el| (el.x, el.y));
                if let Some((x, y)) = moved {
                    let partial =
                        crate::element::PartialElement::at(x + (pt.x - last.x), y + (pt.y - last.y));
                    let _ = self.store.update_element_transient(&id, &partial);
                }
                self.gesture = Gesture::Dragging { id, last: pt };
                vec![Action::RenderNeeded]
            }
            Gesture::Resizing { id, handle, last } => {
                if let Some(el) = self.store.element(&id) {
                    let mut resized = el.clone();
                    geometry::apply_resize(&mut resized, handle, pt.x - last.x, pt.y - last.y);
                    let partial = crate::element::PartialElement {
                        x: Some(resized.x),
                        y: Some(resized.y),
                        width: Some(resized.width),
                        height: Some(resized.height),
                        ..crate::element::PartialElement::default()
                    };
                    let _ = self.store.update_element_transient(&id, &partial);
                }
                self.gesture = Gesture::Resizing { id, handle, last: pt };
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.end_gesture()
    }

    /// Leaving the canvas ends any active gesture, like pointer-up.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.end_gesture()
    }

    fn end_gesture(&mut self) -> Vec<Action> {
        let finished = match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging { id, .. } | Gesture::Resizing { id, .. } => Some(id),
        };
        self.gesture = Gesture::Idle;
        match finished {
            Some(id) => vec![Action::ElementUpdated(id)],
            None => Vec::new(),
        }
    }

    // --- Keyboard events ---

    #[allow(clippy::too_many_lines)]
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let step = geometry::nudge_step(modifiers.shift);

        if modifiers.command() {
            return self.on_command_key(key, modifiers);
        }

        match key.0.as_str() {
            "Escape" => {
                if self.tool.is_placing() {
                    self.tool.cancel();
                    vec![Action::PlacementChanged(false)]
                } else if self.store.selected_id().is_some() {
                    self.store.deselect();
                    vec![Action::SelectionChanged(None), Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            "Delete" | "Backspace" => match self.store.selected_id() {
                Some(id) => {
                    if self.store.delete_element(&id).is_ok() {
                        vec![
                            Action::ElementDeleted(id),
                            Action::SelectionChanged(None),
                            Action::RenderNeeded,
                        ]
                    } else {
                        Vec::new()
                    }
                }
                None => Vec::new(),
            },
            "ArrowLeft" => self.nudge(-step, 0.0),
            "ArrowRight" => self.nudge(step, 0.0),
            "ArrowUp" => self.nudge(0.0, -step),
            "ArrowDown" => self.nudge(0.0, step),
            _ => Vec::new(),
        }
    }

    fn on_command_key(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        match key.0.to_ascii_lowercase().as_str() {
            "c" => {
                if let Some(id) = self.store.selected_id() {
                    self.store.copy(&id);
                }
                Vec::new()
            }
            "v" => match self.store.paste() {
                Some(id) => vec![
                    Action::ElementCreated(id),
                    Action::SelectionChanged(Some(id)),
                    Action::RenderNeeded,
                ],
                None => Vec::new(),
            },
            "d" => {
                let selected = self.store.selected_id();
                match selected.and_then(|id| self.store.duplicate(&id)) {
                    Some(id) => vec![
                        Action::ElementCreated(id),
                        Action::SelectionChanged(Some(id)),
                        Action::RenderNeeded,
                    ],
                    None => Vec::new(),
                }
            }
            "z" if modifiers.shift => self.apply_history(EditorStore::redo),
            "z" => self.apply_history(EditorStore::undo),
            "y" => self.apply_history(EditorStore::redo),
            _ => Vec::new(),
        }
    }

    fn apply_history(&mut self, op: fn(&mut EditorStore) -> bool) -> Vec<Action> {
        if op(&mut self.store) {
            vec![Action::SelectionChanged(self.store.selected_id()), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    fn nudge(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        if self.store.nudge_selected(dx, dy) {
            let id = self.store.selected_id();
            match id {
                Some(id) => vec![Action::ElementUpdated(id), Action::RenderNeeded],
                None => Vec::new(),
            }
        } else {
            Vec::new()
        }
    }
}

/// The full editor engine for the browser host: `EngineCore` plus the canvas
/// element and the image bitmap cache.
pub struct Engine {
    canvas: HtmlCanvasElement,
    images: ImageCache,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, store: EditorStore) -> Self {
        Self { canvas, images: ImageCache::new(), core: EngineCore::new(store) }
    }

    /// Register a host callback invoked when an image bitmap finishes
    /// loading asynchronously; the host re-renders in response.
    pub fn set_image_load_callback(&mut self, callback: js_sys::Function) {
        self.images.set_on_load(callback);
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a Canvas2D call
    /// fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()?;
        render::draw(&ctx, &self.core.store, &mut self.images)
    }
}
