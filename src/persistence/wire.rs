use std::collections::HashSet;

use sha1::{Digest, Sha1};

use crate::element::element_model::ElementInstance;
use crate::error::{DesignerError, Result};

/// Serialize a sequence as a JSON array of `{id, type, attributes}` records.
/// Array order is the element order.
pub fn to_wire(elements: &[ElementInstance]) -> Result<String> {
    serde_json::to_string(elements).map_err(|e| DesignerError::json("serialize form content", e))
}

/// Parse a JSON array back into a sequence. Empty content is an empty form.
pub fn from_wire(content: &str) -> Result<Vec<ElementInstance>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let elements: Vec<ElementInstance> =
        serde_json::from_str(content).map_err(|e| DesignerError::json("parse form content", e))?;

    let mut seen = HashSet::new();
    for el in &elements {
        if !seen.insert(&el.id) {
            return Err(DesignerError::DuplicateId(el.id.clone()));
        }
    }

    Ok(elements)
}

/// SHA-1 of the wire form, used to tell whether content changed since the
/// last save.
pub fn fingerprint(elements: &[ElementInstance]) -> Result<String> {
    let wire = to_wire(elements)?;
    let mut hasher = Sha1::new();
    hasher.update(wire.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
