//! Error taxonomy for editor store operations.

use thiserror::Error;

use crate::element::{ElementId, ElementKind};
use crate::validate::ValidationError;

/// A rejected editor store operation. The store's state is unchanged when
/// any of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The target element does not exist (stale id from the host).
    #[error("no element with id {0}")]
    UnknownElement(ElementId),

    /// A payload update tried to switch the element's kind.
    #[error("cannot replace {from:?} properties with {to:?} properties")]
    KindMismatch { from: ElementKind, to: ElementKind },

    /// The update carried an invalid property value.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
