#![allow(dead_code)]

use std::sync::Arc;

use form_designer::designer::document::DesignDocument;
use form_designer::designer::store::DesignStore;
use form_designer::element::element_model::{ElementId, ElementInstance, ElementTypeTag};
use form_designer::element::registry::{ElementBehavior, ElementRegistry};
use form_designer::element::text_field::TextField;

pub fn registry() -> Arc<ElementRegistry> {
    Arc::new(ElementRegistry::builtin())
}

/// A TextField instance with default attributes.
pub fn text_field(id: &str) -> ElementInstance {
    TextField.construct(ElementId::new(id))
}

pub fn store_with(ids: &[&str]) -> DesignStore {
    DesignStore::with_elements(ids.iter().map(|id| text_field(id)).collect())
        .expect("fixture ids are unique")
}

pub fn order(doc: &DesignDocument) -> Vec<String> {
    doc.elements.iter().map(|el| el.id.as_str().to_string()).collect()
}

pub fn text_field_tag() -> ElementTypeTag {
    ElementTypeTag::text_field()
}
