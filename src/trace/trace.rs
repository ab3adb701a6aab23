use serde::Serialize;

use crate::form::form_model::now_ms;
use crate::gesture::gesture_model::{DragIntent, DragToken};

/// One line of the gesture trace.
#[derive(Debug, Clone, Serialize)]
pub struct GestureTraceEvent {
    pub timestamp_ms: u64,
    pub form_id: String,

    /// Gesture counter within the session
    pub step: u64,

    pub dragged: Option<DragToken>,
    pub target: Option<DragToken>,

    pub intent: Option<DragIntent>,
    pub outcome: Option<String>,
    pub error: Option<String>,
}

impl GestureTraceEvent {
    pub fn now(form_id: &str, step: u64) -> Self {
        Self {
            timestamp_ms: now_ms(),
            form_id: form_id.to_string(),
            step,
            dragged: None,
            target: None,
            intent: None,
            outcome: None,
            error: None,
        }
    }

    pub fn with_tokens(mut self, dragged: Option<&DragToken>, target: Option<&DragToken>) -> Self {
        self.dragged = dragged.cloned();
        self.target = target.cloned();
        self
    }

    pub fn with_intent(mut self, intent: &DragIntent) -> Self {
        self.intent = Some(intent.clone());
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
