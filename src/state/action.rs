//! Action vocabulary for the state tree.
//!
//! Synchronous producers are plain data constructors: building one of these
//! enums is the whole action. Per-form edits are wrapped in
//! `Action::Form` and delegated to the nested per-form transition.

use super::collection::{Field, Form};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Top-level actions over the whole collection.
///
#[derive(Clone, Debug)]
pub enum Action {
    /// A load has begun
    Load,
    /// A server payload replaces `forms` and `saved_forms`
    LoadSuccess { forms: HashMap<String, Form> },
    /// A load failed; the rendered error is kept on the tree
    LoadFail { error: String },
    /// Change which form holds UI focus
    SetActiveForm { form_id: Option<String> },
    /// Replace one last-persisted copy after a successful save
    UpdateSavedForm { form_id: String, form: Form },
    /// Replace one in-progress form
    UpdateForm { form_id: String, form: Form },
    /// A per-form edit
    Form { form_id: String, action: FormAction },
}

/// Edits scoped to a single form.
///
#[derive(Clone, Debug)]
pub enum FormAction {
    Rename { name: String },
    SetValue { value: Map<String, Value> },
    SetFieldOption {
        field_id: String,
        option: String,
        value: Value,
    },
    SetActiveField { field_id: Option<String> },
    AddField { field: Field },
    SwapFields {
        position_a: usize,
        position_b: usize,
    },
    RemoveField { field_id: String },
}

impl Action {
    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Load => "Load",
            Action::LoadSuccess { .. } => "LoadSuccess",
            Action::LoadFail { .. } => "LoadFail",
            Action::SetActiveForm { .. } => "SetActiveForm",
            Action::UpdateSavedForm { .. } => "UpdateSavedForm",
            Action::UpdateForm { .. } => "UpdateForm",
            Action::Form { action, .. } => action.name(),
        }
    }
}

impl FormAction {
    pub fn name(&self) -> &'static str {
        match self {
            FormAction::Rename { .. } => "Rename",
            FormAction::SetValue { .. } => "SetValue",
            FormAction::SetFieldOption { .. } => "SetFieldOption",
            FormAction::SetActiveField { .. } => "SetActiveField",
            FormAction::AddField { .. } => "AddField",
            FormAction::SwapFields { .. } => "SwapFields",
            FormAction::RemoveField { .. } => "RemoveField",
        }
    }
}
