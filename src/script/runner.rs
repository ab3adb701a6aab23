use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::designer::session::{DesignerSession, GestureOutcome};
use crate::designer::store::DesignStore;
use crate::element::element_model::{ElementId, SequentialIds};
use crate::element::registry::ElementRegistry;
use crate::error::{DesignerError, Result};
use crate::script::script_model::{
    DesignScript, DesignStep, Expectation, ExpectationResult, ScriptResult,
};

/// Replays a DesignScript step-by-step against a fresh DesignerSession.
pub struct ScriptRunner;

impl ScriptRunner {
    /// Run a complete script.
    ///
    /// Palette drops get sequential ids (`el-1`, `el-2`, ...) continuing past
    /// any ids in the starting sequence.
    pub fn run(script: &DesignScript, registry: Arc<ElementRegistry>) -> ScriptResult {
        let mut results = Vec::new();

        let store = match DesignStore::with_elements(script.elements.clone()) {
            Ok(store) => store,
            Err(e) => {
                return ScriptResult {
                    script_name: script.name.clone(),
                    passed: false,
                    steps_run: 0,
                    expectation_results: results,
                    error: Some(format!("Invalid starting elements: {}", e)),
                };
            }
        };

        let mut session = DesignerSession::new(script.name.clone(), registry)
            .with_store(store)
            .with_ids(SequentialIds::after(&script.elements));
        let mut last_outcome: Option<GestureOutcome> = None;

        for (i, step) in script.steps.iter().enumerate() {
            debug!(script = %script.name, step = i, ?step, "running step");
            match Self::execute_step(step, i, &mut session, &mut last_outcome, &mut results) {
                Ok(()) => {}
                Err(e) => {
                    return ScriptResult {
                        script_name: script.name.clone(),
                        passed: false,
                        steps_run: i + 1,
                        expectation_results: results,
                        error: Some(format!("Step {} failed: {}", i, e)),
                    };
                }
            }
        }

        let passed = results.iter().all(|r| r.passed);
        ScriptResult {
            script_name: script.name.clone(),
            passed,
            steps_run: script.steps.len(),
            expectation_results: results,
            error: None,
        }
    }

    fn execute_step(
        step: &DesignStep,
        step_index: usize,
        session: &mut DesignerSession,
        last_outcome: &mut Option<GestureOutcome>,
        results: &mut Vec<ExpectationResult>,
    ) -> Result<()> {
        match step {
            DesignStep::DragStart { token } => session.drag_start(token.clone()),

            DesignStep::DragOver { token } => session.drag_over(token.clone()),

            DesignStep::DragEnd { dragged, target } => {
                *last_outcome = Some(session.drag_end(dragged.as_ref(), target.as_ref())?);
            }

            DesignStep::Drop => *last_outcome = Some(session.drop_tracked()?),

            DesignStep::DragCancel => *last_outcome = Some(session.drag_cancel()),

            DesignStep::Select { id } => {
                match id {
                    Some(id) => session.select(&ElementId::new(id.as_str()))?,
                    None => session.deselect()?,
                };
            }

            DesignStep::Remove { id } => {
                session.remove_element(&ElementId::new(id.as_str()))?;
            }

            DesignStep::UpdateAttributes { id, attributes } => {
                session.edit_attributes(&ElementId::new(id.as_str()), attributes.clone())?;
            }

            DesignStep::Expect { expectations } => {
                for expectation in expectations {
                    results.push(Self::evaluate(
                        expectation,
                        step_index,
                        session,
                        last_outcome.as_ref(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn evaluate(
        expectation: &Expectation,
        step_index: usize,
        session: &DesignerSession,
        last_outcome: Option<&GestureOutcome>,
    ) -> ExpectationResult {
        let doc = session.snapshot();

        let (passed, actual) = match expectation {
            Expectation::Order { ids } => {
                let actual: Vec<&str> = doc.elements.iter().map(|el| el.id.as_str()).collect();
                (actual == *ids, format!("{:?}", actual))
            }

            Expectation::Length { expected } => (doc.len() == *expected, doc.len().to_string()),

            Expectation::Selected { id } => {
                let actual = doc.selected.as_ref().map(|s| s.as_str().to_string());
                (actual == *id, format!("{:?}", actual))
            }

            Expectation::Attribute { id, key, expected } => {
                let actual = doc
                    .get(&ElementId::new(id.as_str()))
                    .and_then(|el| el.attribute(key));
                (
                    actual == Some(expected),
                    actual
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "(missing)".to_string()),
                )
            }

            Expectation::LastOutcome { expected } => {
                let actual = last_outcome
                    .map(|o| o.to_string())
                    .unwrap_or_else(|| "(no gesture yet)".to_string());
                (actual == *expected, actual)
            }
        };

        ExpectationResult {
            step_index,
            expectation: expectation.clone(),
            passed,
            actual: if passed { None } else { Some(actual) },
        }
    }
}

/// Load one script file, or every `*.yaml` / `*.yml` in a directory (sorted).
pub fn load_scripts(path: &str) -> Result<Vec<DesignScript>> {
    let path = Path::new(path);

    if path.is_dir() {
        let entries = std::fs::read_dir(path).map_err(|e| DesignerError::io(path, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let p = entry.map_err(|e| DesignerError::io(path, e))?.path();
            if matches!(p.extension().and_then(|e| e.to_str()), Some("yaml") | Some("yml")) {
                files.push(p);
            }
        }
        files.sort();
        files.iter().map(|f| load_script_file(f)).collect()
    } else {
        Ok(vec![load_script_file(path)?])
    }
}

fn load_script_file(path: &Path) -> Result<DesignScript> {
    let content = std::fs::read_to_string(path).map_err(|e| DesignerError::io(path, e))?;
    serde_yaml::from_str(&content).map_err(|e| DesignerError::Yaml {
        context: path.display().to_string(),
        source: e,
    })
}
