use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use tracing::debug;

use crate::element::element_model::{Attributes, ElementId, ElementInstance, ElementTypeTag};
use crate::element::text_field::TextField;
use crate::error::{DesignerError, Result};

/// Where a fragment is going to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderContext {
    /// Inside the designer canvas
    Designer,
    /// On the public submission page
    Form,
    /// In the properties sidebar of the selected element
    Properties,
    /// As a draggable button in the palette sidebar
    PaletteButton,
}

/// Presentation-neutral output of a render call.
#[derive(Debug, Clone, PartialEq)]
pub struct UiFragment {
    pub context: RenderContext,
    pub lines: Vec<String>,
}

impl UiFragment {
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Capability bundle of one field type.
pub trait ElementBehavior: Send + Sync {
    fn element_type(&self) -> ElementTypeTag;

    /// Label of the palette button
    fn palette_label(&self) -> &str;

    fn default_attributes(&self) -> Attributes;

    fn construct(&self, id: ElementId) -> ElementInstance {
        ElementInstance::new(id, self.element_type(), self.default_attributes())
    }

    /// Check a candidate attribute set against this type's schema.
    fn validate_attributes(&self, attributes: &Attributes) -> std::result::Result<(), String>;

    /// Check a submitted value for one instance of this type.
    fn validate(&self, instance: &ElementInstance, submitted: Option<&str>) -> bool;

    fn render(&self, instance: &ElementInstance, context: RenderContext) -> UiFragment;
}

/// Maps type tags to behavior bundles, in registration (palette) order.
#[derive(Default, Clone)]
pub struct ElementRegistry {
    behaviors: IndexMap<ElementTypeTag, Arc<dyn ElementBehavior>>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in field type.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(TextField);
        registry
    }

    /// Register a bundle under its own type tag, replacing any previous one.
    pub fn register(&mut self, behavior: impl ElementBehavior + 'static) {
        let tag = behavior.element_type();
        debug!(element_type = %tag, "registering element type");
        self.behaviors.insert(tag, Arc::new(behavior));
    }

    pub fn get(&self, element_type: &ElementTypeTag) -> Result<&dyn ElementBehavior> {
        self.behaviors
            .get(element_type)
            .map(|b| &**b)
            .ok_or_else(|| DesignerError::UnknownType(element_type.clone()))
    }

    pub fn contains(&self, element_type: &ElementTypeTag) -> bool {
        self.behaviors.contains_key(element_type)
    }

    pub fn construct(&self, element_type: &ElementTypeTag, id: ElementId) -> Result<ElementInstance> {
        Ok(self.get(element_type)?.construct(id))
    }

    /// `(tag, button label)` pairs in palette order.
    pub fn palette(&self) -> impl Iterator<Item = (&ElementTypeTag, &str)> {
        self.behaviors
            .iter()
            .map(|(tag, behavior)| (tag, behavior.palette_label()))
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("types", &self.behaviors.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Process-wide registry
// ============================================================================

static GLOBAL: OnceLock<Arc<ElementRegistry>> = OnceLock::new();

/// Install the process-wide registry. Fails (handing the registry back) once
/// a registry is in place, so nothing re-registers while serving.
pub fn install(registry: ElementRegistry) -> std::result::Result<(), ElementRegistry> {
    let shared = Arc::new(registry);
    GLOBAL.set(shared).map_err(|rejected| {
        Arc::try_unwrap(rejected).unwrap_or_else(|arc| (*arc).clone())
    })
}

/// The process-wide registry, populated with the built-in types on first use
/// if nothing was installed before.
pub fn global() -> Arc<ElementRegistry> {
    GLOBAL
        .get_or_init(|| Arc::new(ElementRegistry::builtin()))
        .clone()
}
