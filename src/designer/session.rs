use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::designer::store::{DesignStore, Snapshot};
use crate::element::element_model::{Attributes, ElementId, IdGenerator, UuidIds};
use crate::element::registry::ElementRegistry;
use crate::error::{DesignerError, Result};
use crate::gesture::applier::{Applied, apply};
use crate::gesture::classifier::GestureClassifier;
use crate::gesture::gesture_model::{DragIntent, DragToken};
use crate::persistence::repository::FormRepository;
use crate::persistence::wire::fingerprint;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::GestureTraceEvent;

/// Visible result of one finished gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    Inserted(ElementId),
    Moved(ElementId),
    NoOp,
    /// The gesture referenced an element that is gone; nothing changed
    Dropped(String),
}

impl fmt::Display for GestureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureOutcome::Inserted(id) => write!(f, "inserted {}", id),
            GestureOutcome::Moved(id) => write!(f, "moved {}", id),
            GestureOutcome::NoOp => write!(f, "no-op"),
            GestureOutcome::Dropped(reason) => write!(f, "dropped: {}", reason),
        }
    }
}

/// One user editing one form.
///
/// Owns the document store and routes every UI entry point (palette drops,
/// reordering, deletion, property edits, selection) through it.
pub struct DesignerSession {
    form_id: String,
    registry: Arc<ElementRegistry>,
    store: DesignStore,
    classifier: GestureClassifier,
    ids: Box<dyn IdGenerator>,
    tracer: TraceLogger,
    gestures: u64,
    saved_fingerprint: Option<String>,
}

impl DesignerSession {
    pub fn new(form_id: impl Into<String>, registry: Arc<ElementRegistry>) -> Self {
        Self {
            form_id: form_id.into(),
            registry,
            store: DesignStore::new(),
            classifier: GestureClassifier::new(),
            ids: Box::new(UuidIds),
            tracer: TraceLogger::disabled(),
            gestures: 0,
            saved_fingerprint: None,
        }
    }

    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn with_store(mut self, store: DesignStore) -> Self {
        self.store = store;
        self
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    // ---- Gestures ----

    pub fn drag_start(&mut self, dragged: DragToken) {
        self.classifier.on_drag_start(dragged);
    }

    pub fn drag_over(&mut self, target: Option<DragToken>) {
        self.classifier.on_drag_over(target);
    }

    /// Finish a gesture with explicit tokens.
    pub fn drag_end(&mut self, dragged: Option<&DragToken>, target: Option<&DragToken>) -> Result<GestureOutcome> {
        let intent = self
            .classifier
            .on_drag_end(dragged, target, self.store.document());
        self.complete(dragged, target, intent)
    }

    /// Finish a gesture with the tokens recorded by start/over.
    pub fn drop_tracked(&mut self) -> Result<GestureOutcome> {
        let dragged = self.classifier.dragged().cloned();
        let target = self.classifier.hovered().cloned();
        self.drag_end(dragged.as_ref(), target.as_ref())
    }

    /// Abandon the gesture in flight. Without one this is a silent no-op.
    pub fn drag_cancel(&mut self) -> GestureOutcome {
        if !self.classifier.is_dragging() {
            return GestureOutcome::NoOp;
        }
        let dragged = self.classifier.dragged().cloned();
        let intent = self.classifier.on_drag_cancel();
        self.gestures += 1;
        self.tracer.log(
            &GestureTraceEvent::now(&self.form_id, self.gestures)
                .with_tokens(dragged.as_ref(), None)
                .with_intent(&intent)
                .with_outcome("cancelled"),
        );
        GestureOutcome::NoOp
    }

    fn complete(
        &mut self,
        dragged: Option<&DragToken>,
        target: Option<&DragToken>,
        intent: DragIntent,
    ) -> Result<GestureOutcome> {
        self.gestures += 1;
        let event = GestureTraceEvent::now(&self.form_id, self.gestures)
            .with_tokens(dragged, target)
            .with_intent(&intent);

        let outcome = match apply(&intent, &self.registry, &mut self.store, self.ids.as_mut()) {
            Ok(Applied::Inserted(id)) => GestureOutcome::Inserted(id),
            Ok(Applied::Moved(id)) => GestureOutcome::Moved(id),
            Ok(Applied::Nothing) => GestureOutcome::NoOp,
            Err(e) if e.is_not_found() => {
                warn!(form_id = %self.form_id, error = %e, "gesture dropped");
                GestureOutcome::Dropped(e.to_string())
            }
            Err(e) => {
                self.tracer.log(&event.with_error(&e));
                return Err(e);
            }
        };

        self.tracer.log(&event.with_outcome(&outcome));
        Ok(outcome)
    }

    // ---- Selection and editing ----

    pub fn select(&mut self, id: &ElementId) -> Result<Snapshot> {
        self.store.select(Some(id.clone()))
    }

    /// Clicking the empty canvas.
    pub fn deselect(&mut self) -> Result<Snapshot> {
        self.store.select(None)
    }

    pub fn remove_element(&mut self, id: &ElementId) -> Result<Snapshot> {
        debug!(form_id = %self.form_id, %id, "remove element");
        self.store.remove(id)
    }

    /// Apply a property edit after checking it against the element type's schema.
    pub fn update_attributes(&mut self, id: &ElementId, attributes: Attributes) -> Result<Snapshot> {
        let element_type = self
            .store
            .document()
            .get(id)
            .map(|el| el.element_type.clone())
            .ok_or_else(|| DesignerError::NotFound(id.clone()))?;

        self.registry
            .get(&element_type)?
            .validate_attributes(&attributes)
            .map_err(|reason| DesignerError::InvalidAttributes {
                id: id.clone(),
                reason,
            })?;

        self.store.update_attributes(id, attributes)
    }

    /// Merge `changes` into the element's current attributes.
    pub fn edit_attributes(&mut self, id: &ElementId, changes: Attributes) -> Result<Snapshot> {
        let mut merged = self
            .store
            .document()
            .get(id)
            .map(|el| el.attributes.clone())
            .ok_or_else(|| DesignerError::NotFound(id.clone()))?;
        merged.extend(changes);
        self.update_attributes(id, merged)
    }

    // ---- Persistence ----

    pub fn load(&mut self, repo: &dyn FormRepository) -> Result<Snapshot> {
        let elements = repo.load_document(&self.form_id)?;
        for el in &elements {
            self.registry.get(&el.element_type)?;
        }
        let fp = fingerprint(&elements)?;
        let snapshot = self.store.replace_elements(elements)?;
        self.saved_fingerprint = Some(fp);
        info!(form_id = %self.form_id, elements = snapshot.len(), "form loaded");
        Ok(snapshot)
    }

    pub fn save(&mut self, repo: &dyn FormRepository) -> Result<()> {
        let snapshot = self.store.snapshot();
        repo.save_document(&self.form_id, &snapshot.elements)?;
        self.saved_fingerprint = Some(fingerprint(&snapshot.elements)?);
        Ok(())
    }

    /// Content differs from what was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        let current = fingerprint(&self.store.document().elements).ok();
        match (&self.saved_fingerprint, current) {
            (Some(saved), Some(now)) => saved != &now,
            (None, _) => !self.store.is_empty(),
            (Some(_), None) => true,
        }
    }
}

impl fmt::Debug for DesignerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesignerSession")
            .field("form_id", &self.form_id)
            .field("elements", &self.store.len())
            .field("version", &self.store.version())
            .finish()
    }
}
