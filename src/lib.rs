//! Form designer engine.
//!
//! Forms are ordered sequences of elements edited by drag and drop. Raw drag
//! tokens go through the gesture classifier, which produces a structured
//! intent; the applier turns that intent into operations on the design store,
//! which owns the document and publishes each new version as an immutable
//! snapshot.

pub mod cli;
pub mod designer;
pub mod element;
pub mod error;
pub mod form;
pub mod gesture;
pub mod persistence;
pub mod report;
pub mod script;
pub mod trace;

pub use designer::document::DesignDocument;
pub use designer::session::{DesignerSession, GestureOutcome};
pub use designer::store::{DesignStore, SharedDesignStore, Snapshot};
pub use element::element_model::{Attributes, ElementId, ElementInstance, ElementTypeTag};
pub use element::registry::{ElementBehavior, ElementRegistry};
pub use error::{DesignerError, Result};
pub use gesture::gesture_model::{DragIntent, DragToken, DropHalf};
