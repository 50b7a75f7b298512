//! Interactive canvas engine for the label designer.
//!
//! This crate owns the full editing lifecycle of a label design canvas:
//! translating raw pointer/keyboard input into typed element mutations,
//! maintaining selection, clipboard, and undo/redo history, mapping screen
//! coordinates onto the DPI-dependent pixel grid, and rendering the scene.
//! It compiles natively for tests and to WebAssembly for the browser host,
//! which is responsible only for wiring DOM events to [`engine::Engine`] and
//! persisting the resulting [`engine::Action`]s through the collaborators in
//! [`persist`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Input engine and testable [`engine::EngineCore`] |
//! | [`store`] | Editor store: config, elements, selection, history, clipboard |
//! | [`element`] | Element model: typed primitives and sparse updates |
//! | [`geometry`] | Coordinate mapping, hit-testing, resize math |
//! | [`history`] | Undo/redo snapshot stacks |
//! | [`tool`] | Toolbar dispatch and placement mode |
//! | [`validate`] | Barcode/text property validation |
//! | [`error`] | Editor-level error type |
//! | [`barcode`] | Barcode preview encoding |
//! | [`render`] | Scene rendering to a 2D canvas context |
//! | [`persist`] | Persistence and image storage collaborator contracts |
//! | [`consts`] | Shared numeric constants (minimum sizes, handle radius, etc.) |

pub mod barcode;
pub mod consts;
pub mod element;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod history;
pub mod persist;
pub mod render;
pub mod store;
pub mod tool;
pub mod validate;
