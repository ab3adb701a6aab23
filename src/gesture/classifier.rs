use tracing::{debug, trace};

use crate::designer::document::DesignDocument;
use crate::gesture::gesture_model::{DragIntent, DragToken, DropHalf};

/// Tracks one gesture from drag start to drag end.
///
/// Holds nothing beyond the gesture in flight: every `on_drag_end` and
/// `on_drag_cancel` resets it.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    dragged: Option<DragToken>,
    over: Option<DragToken>,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_drag_start(&mut self, dragged: DragToken) {
        trace!(?dragged, "drag start");
        self.dragged = Some(dragged);
        self.over = None;
    }

    /// Latest target wins. `None` means the pointer left every drop zone.
    pub fn on_drag_over(&mut self, target: Option<DragToken>) {
        self.over = target;
    }

    pub fn on_drag_end(
        &mut self,
        dragged: Option<&DragToken>,
        target: Option<&DragToken>,
        document: &DesignDocument,
    ) -> DragIntent {
        let intent = classify(dragged, target, document);
        debug!(?dragged, ?target, ?intent, "drag end");
        self.reset();
        intent
    }

    /// End the gesture with whatever start/over recorded.
    pub fn on_drop(&mut self, document: &DesignDocument) -> DragIntent {
        let dragged = self.dragged.take();
        let over = self.over.take();
        self.on_drag_end(dragged.as_ref(), over.as_ref(), document)
    }

    pub fn on_drag_cancel(&mut self) -> DragIntent {
        trace!("drag cancelled");
        self.reset();
        DragIntent::NoOp
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn dragged(&self) -> Option<&DragToken> {
        self.dragged.as_ref()
    }

    /// Drop zone to highlight while dragging, if any.
    pub fn hovered(&self) -> Option<&DragToken> {
        self.over.as_ref()
    }

    fn reset(&mut self) {
        self.dragged = None;
        self.over = None;
    }
}

/// Map a finished gesture to an intent. Never fails: anything that is not
/// one of the recognised shapes is `NoOp`.
pub fn classify(
    dragged: Option<&DragToken>,
    target: Option<&DragToken>,
    document: &DesignDocument,
) -> DragIntent {
    let (Some(dragged), Some(target)) = (dragged, target) else {
        return DragIntent::NoOp;
    };

    match (dragged, target) {
        (DragToken::PaletteButton { element_type }, DragToken::DropArea) => {
            DragIntent::InsertFromPalette {
                element_type: element_type.clone(),
                at_index: document.len(),
            }
        }

        (DragToken::PaletteButton { element_type }, DragToken::ElementHalf { element_id, half }) => {
            match document.index_of(element_id) {
                Some(index) => DragIntent::InsertFromPalette {
                    element_type: element_type.clone(),
                    at_index: drop_index(index, *half),
                },
                None => DragIntent::NoOp,
            }
        }

        (
            DragToken::Element { element_id: active },
            DragToken::ElementHalf { element_id: over, half },
        ) if active != over => match document.index_of(over) {
            Some(index) => DragIntent::MoveExisting {
                element_id: active.clone(),
                to_index: drop_index(index, *half),
            },
            None => DragIntent::NoOp,
        },

        _ => DragIntent::NoOp,
    }
}

/// Top half drops before the target, bottom half after it.
fn drop_index(target_index: usize, half: DropHalf) -> usize {
    match half {
        DropHalf::Top => target_index,
        DropHalf::Bottom => target_index + 1,
    }
}
