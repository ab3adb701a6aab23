use serde_json::{Value, json};

use crate::element::element_model::{Attributes, ElementInstance, ElementTypeTag};
use crate::element::registry::{ElementBehavior, RenderContext, UiFragment};

pub const LABEL: &str = "label";
pub const HELPER_TEXT: &str = "helperText";
pub const REQUIRED: &str = "required";
pub const PLACEHOLDER: &str = "placeholder";

const LABEL_MIN: usize = 2;
const LABEL_MAX: usize = 50;
const HELPER_TEXT_MAX: usize = 200;
const PLACEHOLDER_MAX: usize = 50;

/// Single-line text input.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextField;

impl ElementBehavior for TextField {
    fn element_type(&self) -> ElementTypeTag {
        ElementTypeTag::text_field()
    }

    fn palette_label(&self) -> &str {
        "Text Field"
    }

    fn default_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert(LABEL.into(), json!("Text field"));
        attrs.insert(HELPER_TEXT.into(), json!("Helper Text"));
        attrs.insert(REQUIRED.into(), json!(false));
        attrs.insert(PLACEHOLDER.into(), json!("Value here..."));
        attrs
    }

    fn validate_attributes(&self, attributes: &Attributes) -> Result<(), String> {
        for key in attributes.keys() {
            if !matches!(key.as_str(), LABEL | HELPER_TEXT | REQUIRED | PLACEHOLDER) {
                return Err(format!("unknown attribute '{}'", key));
            }
        }

        let label = string_field(attributes, LABEL)?;
        let label_len = label.chars().count();
        if !(LABEL_MIN..=LABEL_MAX).contains(&label_len) {
            return Err(format!(
                "label must be {}..={} characters, got {}",
                LABEL_MIN, LABEL_MAX, label_len
            ));
        }

        let helper = string_field(attributes, HELPER_TEXT)?;
        if helper.chars().count() > HELPER_TEXT_MAX {
            return Err(format!("helperText must be at most {} characters", HELPER_TEXT_MAX));
        }

        let placeholder = string_field(attributes, PLACEHOLDER)?;
        if placeholder.chars().count() > PLACEHOLDER_MAX {
            return Err(format!("placeholder must be at most {} characters", PLACEHOLDER_MAX));
        }

        match attributes.get(REQUIRED) {
            None | Some(Value::Bool(_)) => Ok(()),
            Some(other) => Err(format!("required must be a boolean, got {}", other)),
        }
    }

    fn validate(&self, instance: &ElementInstance, submitted: Option<&str>) -> bool {
        if !instance.bool_attribute(REQUIRED) {
            return true;
        }
        submitted.map(|v| !v.trim().is_empty()).unwrap_or(false)
    }

    fn render(&self, instance: &ElementInstance, context: RenderContext) -> UiFragment {
        let label = instance.str_attribute(LABEL).unwrap_or_default();
        let marker = if instance.bool_attribute(REQUIRED) { "*" } else { "" };
        let placeholder = instance.str_attribute(PLACEHOLDER).unwrap_or_default();
        let helper = instance.str_attribute(HELPER_TEXT).unwrap_or_default();

        let mut lines = Vec::new();
        match context {
            RenderContext::PaletteButton => lines.push(format!("[{}]", self.palette_label())),
            RenderContext::Designer | RenderContext::Form => {
                lines.push(format!("{}{}", label, marker));
                lines.push(format!("[ {} ]", placeholder));
                if !helper.is_empty() {
                    lines.push(helper.to_string());
                }
            }
            RenderContext::Properties => {
                lines.push(format!("Label: {}", label));
                lines.push(format!("Placeholder: {}", placeholder));
                lines.push(format!("Helper Text: {}", helper));
                lines.push(format!("Required: {}", instance.bool_attribute(REQUIRED)));
            }
        }

        UiFragment { context, lines }
    }
}

/// Missing string fields count as empty; wrong types are rejected.
fn string_field<'a>(attributes: &'a Attributes, key: &str) -> Result<&'a str, String> {
    match attributes.get(key) {
        None => Ok(""),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(format!("{} must be a string, got {}", key, other)),
    }
}
