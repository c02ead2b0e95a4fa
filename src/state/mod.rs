//! State management module.
//!
//! This module contains the state container for the form builder:
//! - Domain types (`FormCollection`, `Form`, `Field`)
//! - The action vocabulary (`Action`, `FormAction`)
//! - The pure transition function (`reduce`)
//! - `FormStore`, the container threading the tree through dispatches
//! - State error handling

mod action;
mod collection;
mod error;
mod reducer;
mod store;

pub use action::{Action, FormAction};
pub use collection::{Field, FieldKind, Form, FormCollection, NewField};
pub use error::StateError;
pub use reducer::reduce;
pub use store::FormStore;
