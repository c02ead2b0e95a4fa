//! Domain types for the form builder state tree.

use crate::api::resource::{de_id, FormResource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Known field kinds, with a catch-all for server-defined extensions.
///
/// Kind-specific attributes that the typed fields on `Field` do not cover
/// live in the field's `options` extension map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Checkbox,
    Select,
    #[serde(untagged)]
    Custom(String),
}

impl Default for FieldKind {
    fn default() -> FieldKind {
        FieldKind::Text
    }
}

/// One input definition: stable id, display position, and options.
///
/// This is also the wire shape of a field; unknown attributes sent by the
/// server are preserved in `options` across a save round-trip.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub key: String,
    pub name: String,
    pub position: usize,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<Value>,
    #[serde(default, flatten)]
    pub options: Map<String, Value>,
}

/// Caller-supplied attributes for a field about to be added to a form. The
/// store fills in the generated id and next position.
#[derive(Clone, Debug, Default)]
pub struct NewField {
    pub key: String,
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub initial_value: Option<Value>,
    pub options: Map<String, Value>,
}

/// A named, ordered collection of input fields with a value bag.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Form {
    pub id: String,
    pub name: String,
    pub fields: Vec<Field>,
    pub value: Map<String, Value>,
    pub deleted_fields: Vec<String>,
    pub active_field: Option<String>,
}

impl Form {
    /// Build a form from its server representation, deriving the initial
    /// value bag from each field's declared initial value and starting with
    /// an empty deleted-fields list.
    pub fn from_resource(resource: FormResource) -> Form {
        let value = derive_value(&resource.fields);
        Form {
            id: resource.id,
            name: resource.name,
            fields: resource.fields,
            value,
            deleted_fields: vec![],
            active_field: None,
        }
    }

    /// Re-run the load-time derivation on an already-loaded form: the value
    /// bag is rebuilt from field initial values and the deleted-fields list
    /// is cleared, discarding in-progress edits.
    pub fn reinitialized(&self) -> Form {
        let mut form = self.clone();
        form.value = derive_value(&form.fields);
        form.deleted_fields.clear();
        form
    }
}

fn derive_value(fields: &[Field]) -> Map<String, Value> {
    let mut value = Map::new();
    for field in fields {
        if let Some(initial) = &field.initial_value {
            value.insert(field.key.clone(), initial.clone());
        }
    }
    value
}

/// The whole state tree: every known form, its last-persisted copy, and the
/// load/focus flags. Created once at application start and replaced
/// wholesale on every transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormCollection {
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
    pub forms: HashMap<String, Form>,
    pub saved_forms: HashMap<String, Form>,
    pub active_form: Option<String>,
}

impl FormCollection {
    /// Return the in-progress copy of a form, if loaded.
    pub fn form(&self, form_id: &str) -> Option<&Form> {
        self.forms.get(form_id)
    }

    /// Whether a form's in-progress edits differ from the last
    /// server-confirmed copy.
    pub fn has_unsaved_changes(&self, form_id: &str) -> bool {
        match (self.forms.get(form_id), self.saved_forms.get(form_id)) {
            (Some(current), Some(saved)) => current != saved,
            (Some(_), None) => true,
            _ => false,
        }
    }
}
