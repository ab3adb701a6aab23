use std::collections::BTreeMap;

use serde::Serialize;

use crate::element::element_model::{ElementId, ElementInstance, ElementTypeTag};
use crate::element::registry::ElementRegistry;
use crate::error::Result;

/// One column of the submissions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub id: ElementId,
    pub label: String,
    pub required: bool,
    pub element_type: ElementTypeTag,
}

/// Columns in element order. Elements of unregistered types are skipped.
pub fn columns(elements: &[ElementInstance], registry: &ElementRegistry) -> Vec<Column> {
    elements
        .iter()
        .filter(|el| registry.contains(&el.element_type))
        .map(|el| Column {
            id: el.id.clone(),
            label: el.str_attribute("label").unwrap_or(el.id.as_str()).to_string(),
            required: el.bool_attribute("required"),
            element_type: el.element_type.clone(),
        })
        .collect()
}

/// Run every element's validator over a submission.
///
/// Returns the ids that failed, in element order; empty means valid.
pub fn validate_submission(
    elements: &[ElementInstance],
    values: &BTreeMap<String, String>,
    registry: &ElementRegistry,
) -> Result<Vec<ElementId>> {
    let mut invalid = Vec::new();
    for el in elements {
        let behavior = registry.get(&el.element_type)?;
        let submitted = values.get(el.id.as_str()).map(String::as_str);
        if !behavior.validate(el, submitted) {
            invalid.push(el.id.clone());
        }
    }
    Ok(invalid)
}
