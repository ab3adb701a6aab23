use tracing::info;

use crate::designer::store::DesignStore;
use crate::element::element_model::{ElementId, IdGenerator};
use crate::element::registry::ElementRegistry;
use crate::error::Result;
use crate::gesture::gesture_model::DragIntent;

/// What an intent did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Inserted(ElementId),
    Moved(ElementId),
    Nothing,
}

/// Turn an intent into store operations.
///
/// `NotFound` means the element vanished between classification and here;
/// the store is untouched and callers drop the gesture.
pub fn apply(
    intent: &DragIntent,
    registry: &ElementRegistry,
    store: &mut DesignStore,
    ids: &mut dyn IdGenerator,
) -> Result<Applied> {
    match intent {
        DragIntent::InsertFromPalette {
            element_type,
            at_index,
        } => {
            let instance = registry.construct(element_type, ids.next_id())?;
            let id = instance.id.clone();
            store.insert(*at_index, instance)?;
            info!(%id, %element_type, at_index, "element inserted");
            Ok(Applied::Inserted(id))
        }

        DragIntent::MoveExisting {
            element_id,
            to_index,
        } => {
            store.move_element(element_id, *to_index)?;
            info!(id = %element_id, to_index, "element moved");
            Ok(Applied::Moved(element_id.clone()))
        }

        DragIntent::NoOp => Ok(Applied::Nothing),
    }
}
