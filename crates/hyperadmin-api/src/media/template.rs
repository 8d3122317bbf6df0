// Collection+JSON write templates
//
// The server advertises the editable shape of a resource as a template
// (`{"data": [{name, value, prompt, required}]}`), embedded either in a
// Collection+JSON collection or in a HAL document. The client sends the
// same shape back, wrapped in `{"template": ...}`, to create or update.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One field of a write template.
///
/// Structured fields travel under `object` instead of `value`; the server
/// never sends both for the same entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl AttributeEntry {
    /// A plain scalar entry, as produced when serializing a form.
    pub fn scalar(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            object: None,
            prompt: None,
            required: false,
        }
    }

    /// A structured entry carrying a nested object.
    pub fn structured(name: impl Into<String>, object: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            value: None,
            object: Some(object),
            prompt: None,
            required: false,
        }
    }

    /// The scalar value rendered as text, or `None` when absent or null.
    ///
    /// Strings are returned verbatim; numbers and booleans use their JSON
    /// rendering. Arrays and objects are not scalars and yield `None`.
    pub fn text_value(&self) -> Option<String> {
        self.value.as_ref().and_then(scalar_text)
    }
}

/// Render a JSON scalar as display text.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// The server-advertised editable shape of a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteTemplate {
    #[serde(default)]
    pub data: Vec<AttributeEntry>,
}

impl WriteTemplate {
    pub fn new(data: Vec<AttributeEntry>) -> Self {
        Self { data }
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&AttributeEntry> {
        self.data.iter().find(|e| e.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Wrap into the request body shape expected by POST/PUT.
    pub fn into_envelope(self) -> TemplateEnvelope {
        TemplateEnvelope { template: self }
    }
}

/// Request body for template-driven writes: `{"template": {"data": [...]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEnvelope {
    pub template: WriteTemplate,
}
