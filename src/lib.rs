//! Client-side state container for a dynamic form builder.
//!
//! The crate is organized around three cooperating pieces:
//! - `state`: the typed state tree (`FormCollection`), a pure transition
//!   function folding `Action`s into it, and `FormStore`, the container that
//!   threads the tree through dispatches.
//! - `api`: the REST client (`FormsApi`) for loading, saving, and deleting
//!   forms on the server.
//! - `events`: asynchronous action producers that perform one network call
//!   and dispatch follow-up actions, plus the UI-facing signal channel for
//!   navigation and widget resets.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod state;

pub use api::FormsApi;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use events::network::{Event, Handler};
pub use events::ui::{Route, UiEvent, UiEventSender};
pub use state::{Action, FieldKind, Form, FormAction, FormCollection, FormStore, NewField};
