use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use crate::designer::document::DesignDocument;
use crate::element::element_model::{Attributes, ElementId, ElementInstance};
use crate::error::{DesignerError, Result};

/// Immutable published version of a document.
pub type Snapshot = Arc<DesignDocument>;

/// Sole owner of one `DesignDocument`.
///
/// Every mutation edits a private clone and publishes it by swapping the
/// `Arc` only once the edit succeeded. A failed or abandoned call therefore
/// leaves the previous version in place, and snapshots handed out earlier
/// never change under their readers.
#[derive(Debug, Clone, Default)]
pub struct DesignStore {
    current: Snapshot,
    version: u64,
}

impl DesignStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded sequence. Fails on duplicate ids.
    pub fn with_elements(elements: Vec<ElementInstance>) -> Result<Self> {
        let mut store = Self::new();
        store.replace_elements(elements)?;
        Ok(store)
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.current)
    }

    /// Read access without taking a snapshot.
    pub fn document(&self) -> &DesignDocument {
        &self.current
    }

    /// Bumped once per successful mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Insert at `index` clamped to `[0, len]`.
    pub fn insert(&mut self, index: usize, instance: ElementInstance) -> Result<Snapshot> {
        if self.current.contains(&instance.id) {
            return Err(DesignerError::DuplicateId(instance.id));
        }
        self.publish(|doc| {
            let at = index.min(doc.elements.len());
            trace!(id = %instance.id, at, "insert");
            doc.elements.insert(at, instance);
            Ok(())
        })
    }

    /// Remove by identity. Absent ids are a no-op.
    pub fn remove(&mut self, id: &ElementId) -> Result<Snapshot> {
        if !self.current.contains(id) {
            return Ok(self.snapshot());
        }
        self.publish(|doc| {
            doc.elements.retain(|el| &el.id != id);
            if doc.selected.as_ref() == Some(id) {
                doc.selected = None;
            }
            Ok(())
        })
    }

    /// Take the element out, then re-insert it at `to_index` clamped against
    /// the length *after* removal.
    pub fn move_element(&mut self, id: &ElementId, to_index: usize) -> Result<Snapshot> {
        self.publish(|doc| {
            let from = doc
                .index_of(id)
                .ok_or_else(|| DesignerError::NotFound(id.clone()))?;
            let element = doc.elements.remove(from);
            let at = to_index.min(doc.elements.len());
            trace!(%id, from, at, "move");
            doc.elements.insert(at, element);
            Ok(())
        })
    }

    /// Replace the attributes of one element, leaving everything else as is.
    pub fn update_attributes(&mut self, id: &ElementId, attributes: Attributes) -> Result<Snapshot> {
        self.publish(|doc| {
            let element = doc
                .elements
                .iter_mut()
                .find(|el| &el.id == id)
                .ok_or_else(|| DesignerError::NotFound(id.clone()))?;
            element.attributes = attributes;
            Ok(())
        })
    }

    /// Set or clear the selection. `None` is always accepted.
    pub fn select(&mut self, id: Option<ElementId>) -> Result<Snapshot> {
        if let Some(id) = &id {
            if !self.current.contains(id) {
                return Err(DesignerError::NotFound(id.clone()));
            }
        }
        if self.current.selected == id {
            return Ok(self.snapshot());
        }
        self.publish(|doc| {
            doc.selected = id;
            Ok(())
        })
    }

    /// Swap in a whole new sequence (document load). Clears the selection.
    pub fn replace_elements(&mut self, elements: Vec<ElementInstance>) -> Result<Snapshot> {
        let duplicate = {
            let mut seen = HashSet::new();
            elements
                .iter()
                .find(|el| !seen.insert(&el.id))
                .map(|el| el.id.clone())
        };
        if let Some(dup) = duplicate {
            return Err(DesignerError::DuplicateId(dup));
        }
        self.publish(|doc| {
            doc.elements = elements;
            doc.selected = None;
            Ok(())
        })
    }

    fn publish<F>(&mut self, edit: F) -> Result<Snapshot>
    where
        F: FnOnce(&mut DesignDocument) -> Result<()>,
    {
        let mut next = DesignDocument::clone(&self.current);
        edit(&mut next)?;
        debug_assert!(next.is_consistent(), "store produced an inconsistent document");
        self.current = Arc::new(next);
        self.version += 1;
        Ok(self.snapshot())
    }
}

// ============================================================================
// Shared wrapper for hosts that render on another thread
// ============================================================================

/// One mutual-exclusion boundary around a store.
#[derive(Debug, Clone, Default)]
pub struct SharedDesignStore {
    inner: Arc<Mutex<DesignStore>>,
}

impl SharedDesignStore {
    pub fn new(store: DesignStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run one mutation (or several) under the lock.
    pub fn update<T>(&self, f: impl FnOnce(&mut DesignStore) -> T) -> T {
        f(&mut self.lock())
    }

    /// The cross-thread read path.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, DesignStore> {
        // A panic mid-mutation never published anything, so the guarded
        // store is still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
