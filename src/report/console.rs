use crate::designer::document::DesignDocument;
use crate::element::registry::{ElementRegistry, RenderContext};
use crate::script::script_model::{Expectation, ScriptResult};

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format script results for terminal output.
///
/// Produces output like:
/// ```text
/// === Design Scripts: scripts/ ===
///
/// ✓ PASS  Reorder fields (6 steps, 2 expectations)
/// ✗ FAIL  Palette drop (3 steps, 1 expectations)
///     [FAIL] Step 2: Order — actual ["el-1"]
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(suite_name: &str, results: &[ScriptResult]) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Design Scripts: {} ===\n\n", suite_name));

    for result in results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} expectations)\n",
            marker,
            result.script_name,
            result.steps_run,
            result.expectation_results.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for er in result.expectation_results.iter().filter(|r| !r.passed) {
            out.push_str(&format!(
                "    [FAIL] Step {}: {} — actual {}\n",
                er.step_index,
                expectation_name(&er.expectation),
                er.actual.as_deref().unwrap_or("?")
            ));
        }
    }

    let passed = results.iter().filter(|r| r.passed).count();
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total) ===\n",
        passed,
        results.len() - passed,
        results.len()
    ));

    out
}

fn expectation_name(expectation: &Expectation) -> &'static str {
    match expectation {
        Expectation::Order { .. } => "Order",
        Expectation::Length { .. } => "Length",
        Expectation::Selected { .. } => "Selected",
        Expectation::Attribute { .. } => "Attribute",
        Expectation::LastOutcome { .. } => "LastOutcome",
    }
}

/// Render a document the way the designer canvas shows it, one block per
/// element, with the selected one marked.
pub fn format_document(doc: &DesignDocument, registry: &ElementRegistry) -> String {
    if doc.is_empty() {
        return "(empty form — drop elements here)\n".to_string();
    }

    let mut out = String::new();
    for (index, el) in doc.elements.iter().enumerate() {
        let marker = if doc.selected.as_ref() == Some(&el.id) { ">" } else { " " };
        out.push_str(&format!("{} {:>2}. [{}] {}\n", marker, index, el.element_type, el.id));

        match registry.get(&el.element_type) {
            Ok(behavior) => {
                for line in behavior.render(el, RenderContext::Designer).lines {
                    out.push_str(&format!("       {}\n", line));
                }
            }
            Err(e) => out.push_str(&format!("       ({})\n", e)),
        }
    }
    out
}
