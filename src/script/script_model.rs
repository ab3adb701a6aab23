use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::element_model::{Attributes, ElementInstance};
use crate::gesture::gesture_model::DragToken;

/// A replayable designer session. Written by hand (or by a UI recorder)
/// in YAML and replayed without a browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignScript {
    /// Human-readable name
    pub name: String,

    /// Starting sequence; empty form when omitted
    #[serde(default)]
    pub elements: Vec<ElementInstance>,

    /// Ordered steps
    pub steps: Vec<DesignStep>,
}

/// A single step in a design script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DesignStep {
    /// Pick up a palette button or an element handle
    DragStart { token: DragToken },

    /// Pointer moved over a drop zone (or off all of them)
    DragOver {
        #[serde(default)]
        token: Option<DragToken>,
    },

    /// Release with explicit tokens
    DragEnd {
        #[serde(default)]
        dragged: Option<DragToken>,
        #[serde(default)]
        target: Option<DragToken>,
    },

    /// Release over whatever drag_start / drag_over recorded
    Drop,

    /// Escape pressed or pointer lost
    DragCancel,

    /// Click an element, or the empty canvas when `id` is omitted
    Select {
        #[serde(default)]
        id: Option<String>,
    },

    /// Delete button of an element
    Remove { id: String },

    /// Properties sidebar edit, merged into the current attributes
    UpdateAttributes { id: String, attributes: Attributes },

    /// Check the document
    Expect { expectations: Vec<Expectation> },
}

/// A single check against the current document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// Element ids in exactly this order
    Order { ids: Vec<String> },

    /// Number of elements
    Length { expected: usize },

    /// Selected element id (omit for "nothing selected")
    Selected {
        #[serde(default)]
        id: Option<String>,
    },

    /// One attribute of one element
    Attribute {
        id: String,
        key: String,
        expected: Value,
    },

    /// Outcome of the most recent gesture, e.g. "inserted el-1", "no-op"
    LastOutcome { expected: String },
}

/// Result of evaluating a single expectation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectationResult {
    /// Step the expectation belongs to (0-indexed)
    pub step_index: usize,

    pub expectation: Expectation,

    pub passed: bool,

    /// What was found instead
    pub actual: Option<String>,
}

/// Result of replaying a complete script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptResult {
    pub script_name: String,

    /// All steps ran and every expectation held
    pub passed: bool,

    pub steps_run: usize,

    pub expectation_results: Vec<ExpectationResult>,

    /// Set when a step failed outright
    pub error: Option<String>,
}
