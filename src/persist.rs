//! Persistence collaborators: the narrow contracts the editor core consumes.
//!
//! The core never defines a wire format; it hands collaborators a
//! [`DesignSnapshot`] that round-trips every element and config field
//! losslessly through serde, and takes the same shape back on load. Loading
//! replaces the session wholesale (elements, config, history, selection);
//! saving reads state without mutating it, so a failed save loses nothing.
//!
//! [`autosave_tick`] is the fixed-interval background hook: it reads the
//! current state and persists it, logging failures instead of surfacing
//! them.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::element::LabelElement;
use crate::store::{CanvasConfig, EditorStore};

/// Unique identifier for a stored design.
pub type DesignId = Uuid;

/// A collaborator-side failure. The editor's own state is unchanged whenever
/// one of these surfaces, so the user can retry without data loss.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    #[error("design {0} not found")]
    NotFound(DesignId),
    #[error("image upload failed: {0}")]
    UploadFailed(String),
    #[error("persistence backend error: {0}")]
    Backend(String),
}

/// Descriptive fields stored alongside a design.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignMeta {
    pub name: String,
}

/// The complete serializable state of one design: element list plus canvas
/// configuration. This is also the shape the export/rendering pipeline
/// consumes; elements may lie outside the canvas bounds and the consumer
/// must cope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSnapshot {
    pub elements: Vec<LabelElement>,
    pub canvas: CanvasConfig,
}

impl DesignSnapshot {
    /// Capture the store's current state.
    #[must_use]
    pub fn of(store: &EditorStore) -> Self {
        Self { elements: store.elements().to_vec(), canvas: *store.config() }
    }
}

/// Request/response persistence contract.
pub trait DesignStore {
    /// Fetch a design by id.
    ///
    /// # Errors
    ///
    /// [`PersistError::NotFound`] for unknown ids, [`PersistError::Backend`]
    /// for transport failures.
    fn load(&self, id: &DesignId) -> Result<DesignSnapshot, PersistError>;

    /// Persist a snapshot, returning the design's id.
    ///
    /// # Errors
    ///
    /// [`PersistError::Backend`] for transport failures.
    fn save(&self, snapshot: &DesignSnapshot, meta: &DesignMeta) -> Result<DesignId, PersistError>;
}

/// Image storage contract, called by the host before an image element is
/// created. Returns the stored source reference.
pub trait ImageStore {
    /// # Errors
    ///
    /// [`PersistError::UploadFailed`] when the upload cannot complete.
    fn upload(&self, filename: &str, bytes: &[u8]) -> Result<String, PersistError>;
}

/// Replace the session with a loaded design. History and selection reset.
///
/// # Errors
///
/// Propagates the backend's load error; the store is untouched on failure.
pub fn load_into(store: &mut EditorStore, backend: &dyn DesignStore, id: &DesignId) -> Result<(), PersistError> {
    let snapshot = backend.load(id)?;
    store.load_design(snapshot.elements, snapshot.canvas);
    Ok(())
}

/// Persist the current state. The store is never mutated, success or not.
///
/// # Errors
///
/// Propagates the backend's save error.
pub fn save_from(store: &EditorStore, backend: &dyn DesignStore, meta: &DesignMeta) -> Result<DesignId, PersistError> {
    backend.save(&DesignSnapshot::of(store), meta)
}

/// One auto-save interval firing: persist the current state, logging any
/// failure. Returns whether the save succeeded.
pub fn autosave_tick(store: &EditorStore, backend: &dyn DesignStore, meta: &DesignMeta) -> bool {
    match save_from(store, backend, meta) {
        Ok(id) => {
            debug!(design = %id, "autosaved");
            true
        }
        Err(err) => {
            warn!(error = %err, "autosave failed");
            false
        }
    }
}

/// In-memory [`DesignStore`] used by tests and local demos.
#[derive(Debug, Default)]
pub struct MemoryDesignStore {
    designs: RefCell<HashMap<DesignId, (DesignMeta, DesignSnapshot)>>,
}

impl MemoryDesignStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored designs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.designs.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.designs.borrow().is_empty()
    }
}

impl DesignStore for MemoryDesignStore {
    fn load(&self, id: &DesignId) -> Result<DesignSnapshot, PersistError> {
        self.designs
            .borrow()
            .get(id)
            .map(|(_, snapshot)| snapshot.clone())
            .ok_or(PersistError::NotFound(*id))
    }

    fn save(&self, snapshot: &DesignSnapshot, meta: &DesignMeta) -> Result<DesignId, PersistError> {
        let id = Uuid::new_v4();
        self.designs.borrow_mut().insert(id, (meta.clone(), snapshot.clone()));
        Ok(id)
    }
}
