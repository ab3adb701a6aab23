use serde::{Deserialize, Serialize};

use crate::element::element_model::{ElementId, ElementTypeTag};

/// Which half of an existing element the pointer was released over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropHalf {
    Top,
    Bottom,
}

/// Payload the presentation layer attaches to draggables and drop zones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragToken {
    /// Palette button that creates a new element of this type
    PaletteButton { element_type: ElementTypeTag },

    /// Empty space of the designer canvas (append)
    DropArea,

    /// Drag handle of an element already on the canvas
    Element { element_id: ElementId },

    /// Upper or lower drop zone of an element already on the canvas
    ElementHalf { element_id: ElementId, half: DropHalf },
}

impl DragToken {
    pub fn palette(element_type: ElementTypeTag) -> Self {
        DragToken::PaletteButton { element_type }
    }

    pub fn element(element_id: impl Into<ElementId>) -> Self {
        DragToken::Element {
            element_id: element_id.into(),
        }
    }

    pub fn top_of(element_id: impl Into<ElementId>) -> Self {
        DragToken::ElementHalf {
            element_id: element_id.into(),
            half: DropHalf::Top,
        }
    }

    pub fn bottom_of(element_id: impl Into<ElementId>) -> Self {
        DragToken::ElementHalf {
            element_id: element_id.into(),
            half: DropHalf::Bottom,
        }
    }
}

/// Structured meaning of one finished gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum DragIntent {
    InsertFromPalette {
        element_type: ElementTypeTag,
        at_index: usize,
    },
    MoveExisting {
        element_id: ElementId,
        to_index: usize,
    },
    NoOp,
}

impl DragIntent {
    pub fn is_noop(&self) -> bool {
        matches!(self, DragIntent::NoOp)
    }
}
