//! State transition-specific error types.

/// Errors that can occur while folding an action into the state tree.
///
/// Lookups that the original UI silently ignored are explicit here so
/// callers must handle absence.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Form not present in the collection
    #[error("Form not found: {form_id}")]
    FormNotFound { form_id: String },

    /// Field not present on the form
    #[error("Field not found: {field_id}")]
    FieldNotFound { field_id: String },

    /// Swap target position not occupied by exactly one field
    #[error("No field at position {position}")]
    PositionNotOccupied { position: usize },

    /// Option value has the wrong type for a typed field attribute
    #[error("Invalid value for option '{option}'")]
    InvalidOptionValue { option: String },
}
