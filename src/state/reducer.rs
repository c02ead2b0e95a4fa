//! Pure state-transition function.
//!
//! `reduce` maps (current tree, action) to the next tree without mutating its
//! input; callers replace the tree wholesale with the returned copy. Lookups
//! that miss are hard errors rather than silent no-ops.

use super::action::{Action, FormAction};
use super::collection::{Field, FieldKind, Form, FormCollection};
use super::error::StateError;
use serde_json::Value;

/// Fold one action into the state tree, returning the next tree.
///
pub fn reduce(state: &FormCollection, action: Action) -> Result<FormCollection, StateError> {
    let mut next = state.clone();
    match action {
        Action::Load => {
            next.loading = true;
        }
        Action::LoadSuccess { forms } => {
            next.loading = false;
            next.loaded = true;
            next.error = None;
            next.saved_forms = forms.clone();
            next.forms = forms;
        }
        Action::LoadFail { error } => {
            next.loading = false;
            next.loaded = false;
            next.error = Some(error);
        }
        Action::SetActiveForm { form_id } => {
            next.active_form = form_id;
        }
        Action::UpdateSavedForm { form_id, form } => {
            next.saved_forms.insert(form_id, form);
        }
        Action::UpdateForm { form_id, form } => {
            next.forms.insert(form_id, form);
        }
        Action::Form { form_id, action } => {
            let current = next
                .forms
                .get(&form_id)
                .ok_or_else(|| StateError::FormNotFound {
                    form_id: form_id.clone(),
                })?;
            let updated = reduce_form(current, action)?;
            next.forms.insert(form_id, updated);
        }
    }
    Ok(next)
}

/// Fold a per-form action into one form.
///
fn reduce_form(form: &Form, action: FormAction) -> Result<Form, StateError> {
    let mut next = form.clone();
    match action {
        FormAction::Rename { name } => {
            next.name = name;
        }
        FormAction::SetValue { value } => {
            next.value = value;
        }
        FormAction::SetFieldOption {
            field_id,
            option,
            value,
        } => {
            let field = next
                .fields
                .iter_mut()
                .find(|f| f.id == field_id)
                .ok_or(StateError::FieldNotFound { field_id })?;
            set_option(field, &option, value)?;
        }
        FormAction::SetActiveField { field_id } => {
            next.active_field = field_id;
        }
        FormAction::AddField { field } => {
            next.fields.push(field);
        }
        FormAction::SwapFields {
            position_a,
            position_b,
        } => {
            let a = index_at(&next.fields, position_a)?;
            let b = index_at(&next.fields, position_b)?;
            next.fields[a].position = position_b;
            next.fields[b].position = position_a;
        }
        FormAction::RemoveField { field_id } => {
            let index = next
                .fields
                .iter()
                .position(|f| f.id == field_id)
                .ok_or_else(|| StateError::FieldNotFound {
                    field_id: field_id.clone(),
                })?;
            let removed = next.fields.remove(index);
            for field in &mut next.fields {
                if field.position > removed.position {
                    field.position -= 1;
                }
            }
            next.deleted_fields.push(field_id);
        }
    }
    Ok(next)
}

/// Index of the single field at a display position. Callers must pass a
/// currently-occupied position; anything else is an error.
fn index_at(fields: &[Field], position: usize) -> Result<usize, StateError> {
    let mut found = None;
    for (index, field) in fields.iter().enumerate() {
        if field.position == position {
            if found.is_some() {
                return Err(StateError::PositionNotOccupied { position });
            }
            found = Some(index);
        }
    }
    found.ok_or(StateError::PositionNotOccupied { position })
}

/// Update one named option on a field. Typed attributes are updated in
/// place with type checking; anything else lands in the extension map.
fn set_option(field: &mut Field, option: &str, value: Value) -> Result<(), StateError> {
    let invalid = || StateError::InvalidOptionValue {
        option: option.to_string(),
    };
    match option {
        "name" => field.name = value.as_str().ok_or_else(invalid)?.to_owned(),
        "key" => field.key = value.as_str().ok_or_else(invalid)?.to_owned(),
        "required" => field.required = value.as_bool().ok_or_else(invalid)?,
        "initialValue" => {
            field.initial_value = if value.is_null() { None } else { Some(value) };
        }
        "type" => {
            field.kind = serde_json::from_value::<FieldKind>(value).map_err(|_| invalid())?;
        }
        // position is owned by add/swap/remove; rewriting it here would
        // break the contiguity invariant
        "position" => return Err(invalid()),
        _ => {
            field.options.insert(option.to_owned(), value);
        }
    }
    Ok(())
}
