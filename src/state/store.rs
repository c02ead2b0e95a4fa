//! Typed application-state container.
//!
//! `FormStore` threads the state tree through the transition function: every
//! dispatch locks the tree, reduces, and replaces it wholesale. It also hosts
//! the synchronous producers that need to read the tree before building their
//! action (next field position, focus hand-offs).

use super::action::{Action, FormAction};
use super::collection::{Field, Form, FormCollection, NewField};
use super::error::StateError;
use super::reducer::reduce;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Holds the state tree and is the single point of mutation.
///
#[derive(Clone)]
pub struct FormStore {
    state: Arc<Mutex<FormCollection>>,
}

impl FormStore {
    /// Return a new store with an empty collection.
    ///
    pub fn new() -> FormStore {
        FormStore::with_state(FormCollection::default())
    }

    /// Return a new store seeded with the given tree.
    ///
    pub fn with_state(state: FormCollection) -> FormStore {
        FormStore {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Fold one action into the tree.
    ///
    pub async fn dispatch(&self, action: Action) -> Result<(), StateError> {
        let mut state = self.state.lock().await;
        debug!("Dispatching action '{}'...", action.name());
        *state = reduce(&state, action)?;
        Ok(())
    }

    /// Return a copy of the whole tree.
    ///
    pub async fn snapshot(&self) -> FormCollection {
        self.state.lock().await.clone()
    }

    /// Return a copy of one in-progress form, if loaded.
    ///
    pub async fn form(&self, form_id: &str) -> Option<Form> {
        self.state.lock().await.form(form_id).cloned()
    }

    /// Whether a form's edits differ from the last server-confirmed copy.
    ///
    pub async fn has_unsaved_changes(&self, form_id: &str) -> bool {
        self.state.lock().await.has_unsaved_changes(form_id)
    }

    /// Append a field to a form: next position is the current field count,
    /// the id is freshly generated, and the caller-supplied attributes are
    /// merged in. Returns the field as added.
    ///
    /// Position computation and dispatch happen under one lock so a
    /// concurrent add cannot produce a duplicate position.
    pub async fn add_field(&self, form_id: &str, new_field: NewField) -> Result<Field, StateError> {
        let mut state = self.state.lock().await;
        let position = state
            .form(form_id)
            .ok_or_else(|| StateError::FormNotFound {
                form_id: form_id.to_string(),
            })?
            .fields
            .len();
        let field = Field {
            id: Uuid::new_v4().to_string(),
            key: new_field.key,
            name: new_field.name,
            position,
            kind: new_field.kind,
            required: new_field.required,
            initial_value: new_field.initial_value,
            options: new_field.options,
        };
        debug!(
            "Adding field '{}' to form {} at position {}",
            field.key, form_id, position
        );
        *state = reduce(
            &state,
            Action::Form {
                form_id: form_id.to_string(),
                action: FormAction::AddField {
                    field: field.clone(),
                },
            },
        )?;
        Ok(field)
    }

    /// Move UI focus to a field, clearing any form-level focus first.
    /// Form-level and field-level focus are mutually exclusive.
    ///
    pub async fn update_active_field(
        &self,
        form_id: &str,
        field_id: Option<String>,
    ) -> Result<(), StateError> {
        let mut state = self.state.lock().await;
        let next = reduce(&state, Action::SetActiveForm { form_id: None })?;
        *state = reduce(
            &next,
            Action::Form {
                form_id: form_id.to_string(),
                action: FormAction::SetActiveField { field_id },
            },
        )?;
        Ok(())
    }

    /// Remove a field by id, then clear field focus.
    ///
    pub async fn remove_field(&self, form_id: &str, field_id: &str) -> Result<(), StateError> {
        let mut state = self.state.lock().await;
        let next = reduce(
            &state,
            Action::Form {
                form_id: form_id.to_string(),
                action: FormAction::RemoveField {
                    field_id: field_id.to_string(),
                },
            },
        )?;
        let next = reduce(&next, Action::SetActiveForm { form_id: None })?;
        *state = reduce(
            &next,
            Action::Form {
                form_id: form_id.to_string(),
                action: FormAction::SetActiveField { field_id: None },
            },
        )?;
        Ok(())
    }
}

impl Default for FormStore {
    fn default() -> FormStore {
        FormStore::new()
    }
}
