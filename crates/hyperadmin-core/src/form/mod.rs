// ── Form synthesis ──
//
// Builds editable/read-only field sets from the two media formats and
// serializes them back into write templates. A `FormModel` is produced
// fresh for every fetched document and replaced wholesale on the next one.

pub mod codec;

use hyperadmin_api::{AttributeEntry, LinkMap, ReadRepresentation, WriteTemplate};
use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::error::CoreError;
use crate::relation::Relation;

// ── Types ────────────────────────────────────────────────────────────

/// One input of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub value: String,
    pub editable: bool,
    pub required: bool,
    pub placeholder: Option<String>,
}

impl FieldDescriptor {
    fn readonly(name: impl Into<String>, value: String) -> Self {
        Self {
            name: name.into(),
            value,
            editable: false,
            required: false,
            placeholder: None,
        }
    }

    fn from_entry(entry: &AttributeEntry) -> Self {
        Self {
            name: entry.name.clone(),
            value: entry_text(entry).unwrap_or_default(),
            editable: true,
            required: entry.required,
            placeholder: entry.prompt.clone().filter(|p| !p.is_empty()),
        }
    }

    /// Promote a read-only field with a template entry.
    fn promote(&mut self, entry: &AttributeEntry) {
        self.editable = true;
        self.required = entry.required;
        if let Some(prompt) = entry.prompt.as_ref().filter(|p| !p.is_empty()) {
            self.placeholder = Some(prompt.clone());
        }
        if let Some(value) = entry_text(entry).filter(|v| !v.is_empty()) {
            self.value = value;
        }
    }
}

/// Actions a form surfaces, derived from relation presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FormAction {
    Create,
    Edit,
    Delete,
}

/// Where a form is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FormSlot {
    NewUser,
    Primary,
    Restricted,
}

/// An ordered field set plus the URL and actions it submits to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormModel {
    pub action_url: Option<String>,
    pub actions: Vec<FormAction>,
    fields: Vec<FieldDescriptor>,
}

impl FormModel {
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has_action(&self, action: FormAction) -> bool {
        self.actions.contains(&action)
    }

    /// Set an edited value. Only editable fields accept values.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), CoreError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| CoreError::UnknownField { name: name.into() })?;
        if !field.editable {
            return Err(CoreError::FieldNotEditable { name: name.into() });
        }
        field.value = value.into();
        Ok(())
    }

    /// Attach the action URL and surfaced actions advertised by `links`.
    ///
    /// `user:edit` wins over `user:delete` as the action URL; both share it.
    pub fn with_link_actions(mut self, links: &LinkMap) -> Self {
        let delete = links.get(Relation::UserDelete.as_ref());
        let edit = links.get(Relation::UserEdit.as_ref());
        self.actions.clear();
        if edit.is_some() {
            self.actions.push(FormAction::Edit);
        }
        if delete.is_some() {
            self.actions.push(FormAction::Delete);
        }
        self.action_url = edit.or(delete).map(str::to_owned);
        self
    }

    fn apply_template(&mut self, template: &WriteTemplate) {
        for entry in &template.data {
            match self.fields.iter_mut().find(|f| f.name == entry.name) {
                Some(existing) => existing.promote(entry),
                None => self.fields.push(FieldDescriptor::from_entry(entry)),
            }
        }
    }
}

fn entry_text(entry: &AttributeEntry) -> Option<String> {
    match (&entry.value, &entry.object) {
        (Some(value), _) => codec::display_text(&entry.name, value),
        (None, Some(object)) => {
            codec::structured(&entry.name).and_then(|codec| (codec.encode)(object))
        }
        (None, None) => None,
    }
}

// ── Synthesis ────────────────────────────────────────────────────────

/// One editable field per template entry, in template order.
///
/// Repeated names collapse into the first field.
pub fn synthesize_from_template(template: &WriteTemplate) -> FormModel {
    let mut form = FormModel::default();
    form.apply_template(template);
    form
}

/// Merge a read representation with an optional write template.
///
/// Every attribute not in `excluded` becomes a read-only field, in
/// document order. Template entries then promote matching fields in place
/// or are appended as new editable fields. Links never become fields.
pub fn synthesize_from_representation_and_template(
    repr: &ReadRepresentation,
    template: Option<&WriteTemplate>,
    excluded: &[&str],
) -> FormModel {
    let mut form = FormModel::default();
    for (name, value) in &repr.attributes {
        if excluded.contains(&name.as_str()) {
            continue;
        }
        let text = codec::display_text(name, value).unwrap_or_default();
        form.fields.push(FieldDescriptor::readonly(name.clone(), text));
    }
    if let Some(template) = template {
        form.apply_template(template);
    }
    form
}

// ── Serialization ────────────────────────────────────────────────────

/// One template entry per field, in field order.
pub fn serialize(form: &FormModel) -> WriteTemplate {
    let data = form
        .fields
        .iter()
        .map(|field| match codec::structured(&field.name) {
            Some(codec) => AttributeEntry::structured(field.name.clone(), (codec.decode)(&field.value)),
            None => AttributeEntry::scalar(field.name.clone(), field.value.clone()),
        })
        .collect();
    WriteTemplate::new(data)
}
