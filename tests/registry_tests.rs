use form_designer::element::element_model::{Attributes, ElementId, ElementInstance, ElementTypeTag};
use form_designer::element::registry::{
    ElementBehavior, ElementRegistry, RenderContext, UiFragment, global, install,
};
use form_designer::element::text_field::TextField;
use form_designer::error::DesignerError;
use serde_json::json;

use crate::common::fixtures::text_field;

mod common;

/// Minimal second type to prove the registry is open.
struct Checkbox;

impl ElementBehavior for Checkbox {
    fn element_type(&self) -> ElementTypeTag {
        ElementTypeTag::new("Checkbox")
    }

    fn palette_label(&self) -> &str {
        "Checkbox"
    }

    fn default_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("label".into(), json!("Accept terms"));
        attrs
    }

    fn validate_attributes(&self, _attributes: &Attributes) -> Result<(), String> {
        Ok(())
    }

    fn validate(&self, _instance: &ElementInstance, submitted: Option<&str>) -> bool {
        matches!(submitted, None | Some("true") | Some("false"))
    }

    fn render(&self, instance: &ElementInstance, context: RenderContext) -> UiFragment {
        UiFragment {
            context,
            lines: vec![format!("[ ] {}", instance.str_attribute("label").unwrap_or_default())],
        }
    }
}

// =========================================================================
// Registry
// =========================================================================

#[test]
fn builtin_registry_knows_text_field() {
    let registry = ElementRegistry::builtin();
    assert!(registry.contains(&ElementTypeTag::text_field()));
    assert_eq!(registry.len(), 1);

    let palette: Vec<_> = registry.palette().collect();
    assert_eq!(palette, vec![(&ElementTypeTag::text_field(), "Text Field")]);
}

#[test]
fn unknown_type_is_reported() {
    let registry = ElementRegistry::builtin();
    let tag = ElementTypeTag::new("Slider");
    assert!(matches!(registry.get(&tag), Err(DesignerError::UnknownType(t)) if t == tag));
    assert!(registry.construct(&tag, "x".into()).is_err());
}

#[test]
fn registered_types_construct_and_keep_palette_order() {
    let mut registry = ElementRegistry::builtin();
    registry.register(Checkbox);

    let el = registry
        .construct(&ElementTypeTag::new("Checkbox"), ElementId::new("c1"))
        .unwrap();
    assert_eq!(el.id.as_str(), "c1");
    assert_eq!(el.str_attribute("label"), Some("Accept terms"));

    let labels: Vec<&str> = registry.palette().map(|(_, label)| label).collect();
    assert_eq!(labels, ["Text Field", "Checkbox"]);
}

#[test]
fn constructed_instances_are_independent() {
    let registry = ElementRegistry::builtin();
    let mut a = registry.construct(&ElementTypeTag::text_field(), "a".into()).unwrap();
    let b = registry.construct(&ElementTypeTag::text_field(), "b".into()).unwrap();
    a.attributes.insert("label".into(), json!("Changed"));
    assert_eq!(b.str_attribute("label"), Some("Text field"), "Defaults are not shared");
}

#[test]
fn global_registry_is_installed_once() {
    let first = global();
    assert!(first.contains(&ElementTypeTag::text_field()));

    let rejected = install(ElementRegistry::new());
    assert!(rejected.is_err(), "Registry is read-only once in use");
    assert!(global().contains(&ElementTypeTag::text_field()));
}

// =========================================================================
// TextField bundle
// =========================================================================

#[test]
fn text_field_defaults() {
    let el = text_field("t");
    assert_eq!(el.element_type.as_str(), "TextField");
    assert_eq!(el.str_attribute("label"), Some("Text field"));
    assert_eq!(el.str_attribute("helperText"), Some("Helper Text"));
    assert_eq!(el.str_attribute("placeholder"), Some("Value here..."));
    assert!(!el.bool_attribute("required"));
    assert!(TextField.validate_attributes(&el.attributes).is_ok(), "Defaults satisfy the schema");
}

#[test]
fn text_field_schema_limits() {
    let base = text_field("t").attributes;

    let with = |key: &str, value: serde_json::Value| {
        let mut attrs = base.clone();
        attrs.insert(key.into(), value);
        TextField.validate_attributes(&attrs)
    };

    assert!(with("label", json!("ab")).is_ok(), "2 chars is the minimum");
    assert!(with("label", json!("a")).is_err(), "1 char label");
    assert!(with("label", json!("x".repeat(51))).is_err(), "51 char label");
    assert!(with("helperText", json!("h".repeat(200))).is_ok());
    assert!(with("helperText", json!("h".repeat(201))).is_err());
    assert!(with("placeholder", json!("p".repeat(51))).is_err());
    assert!(with("required", json!("yes")).is_err(), "required must be boolean");
    assert!(with("label", json!(42)).is_err(), "label must be a string");
    assert!(with("colour", json!("red")).is_err(), "unknown keys are rejected");
}

#[test]
fn text_field_submission_validation() {
    let optional = text_field("t");
    assert!(TextField.validate(&optional, None));
    assert!(TextField.validate(&optional, Some("")));

    let mut required = text_field("r");
    required.attributes.insert("required".into(), json!(true));
    assert!(!TextField.validate(&required, None));
    assert!(!TextField.validate(&required, Some("   ")));
    assert!(TextField.validate(&required, Some("hello")));
}

#[test]
fn text_field_designer_render_marks_required() {
    let mut el = text_field("r");
    el.attributes.insert("required".into(), json!(true));
    el.attributes.insert("label".into(), json!("Name"));

    let fragment = TextField.render(&el, RenderContext::Designer);
    assert_eq!(fragment.lines[0], "Name*");
    assert_eq!(fragment.lines[1], "[ Value here... ]");
    assert_eq!(fragment.lines[2], "Helper Text");
}
