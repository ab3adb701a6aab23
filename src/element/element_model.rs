use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type-specific configuration of one element (label, placeholder, ...).
pub type Attributes = Map<String, Value>;

/// Identifies a field kind. The set is open: whatever the registry holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementTypeTag(String);

impl ElementTypeTag {
    pub const TEXT_FIELD: &'static str = "TextField";

    pub fn new(tag: impl Into<String>) -> Self {
        ElementTypeTag(tag.into())
    }

    pub fn text_field() -> Self {
        ElementTypeTag::new(Self::TEXT_FIELD)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        ElementId(id.into())
    }

    /// Fresh random id (UUID v4, simple form).
    pub fn generate() -> Self {
        ElementId(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        ElementId::new(id)
    }
}

/// One configured field placed on a form.
///
/// Wire shape is `{ "id", "type", "attributes" }`. Documents saved by older
/// builds carry `extraAttributes` instead, which is still accepted on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInstance {
    pub id: ElementId,

    #[serde(rename = "type")]
    pub element_type: ElementTypeTag,

    #[serde(default, alias = "extraAttributes")]
    pub attributes: Attributes,
}

impl ElementInstance {
    pub fn new(id: ElementId, element_type: ElementTypeTag, attributes: Attributes) -> Self {
        Self {
            id,
            element_type,
            attributes,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn str_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn bool_attribute(&self, key: &str) -> bool {
        self.attributes
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

// ============================================================================
// Id generation
// ============================================================================

/// Source of fresh element ids for palette drops.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> ElementId;
}

/// Random UUIDs. The default for interactive sessions.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> ElementId {
        ElementId::generate()
    }
}

/// Predictable `el-1`, `el-2`, ... ids, so scripts can name what they create.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub const DEFAULT_PREFIX: &'static str = "el-";

    pub fn new() -> Self {
        Self {
            prefix: Self::DEFAULT_PREFIX.to_string(),
            next: 1,
        }
    }

    /// Continue past the highest `el-<n>` already present in `elements`.
    pub fn after(elements: &[ElementInstance]) -> Self {
        let mut ids = Self::new();
        let highest = elements
            .iter()
            .filter_map(|el| el.id.as_str().strip_prefix(&ids.prefix))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        ids.next = highest + 1;
        ids
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> ElementId {
        let id = ElementId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
