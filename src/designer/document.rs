use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::element::element_model::{ElementId, ElementInstance};

/// Ordered elements of one form plus the selection pointer.
///
/// Sequence order is the only notion of position: it is both the render order
/// and the submission column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    pub elements: Vec<ElementInstance>,
    pub selected: Option<ElementId>,
}

impl DesignDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|el| &el.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: &ElementId) -> Option<&ElementInstance> {
        self.elements.iter().find(|el| &el.id == id)
    }

    pub fn selected_element(&self) -> Option<&ElementInstance> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn ids(&self) -> Vec<&ElementId> {
        self.elements.iter().map(|el| &el.id).collect()
    }

    /// Ids are pairwise distinct and the selection points at a live element.
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        let unique = self.elements.iter().all(|el| seen.insert(&el.id));
        let selection_live = self
            .selected
            .as_ref()
            .map(|id| seen.contains(id))
            .unwrap_or(true);
        unique && selection_live
    }
}
