//! Event handling module.
//!
//! This module contains the asynchronous action producers and the channel
//! over which they signal the embedding UI:
//! - Network events: forms API interactions that dispatch follow-up actions
//! - UI events: navigation intents and widget resets (routing and rendering
//!   themselves stay outside this crate)

pub mod network;
pub mod ui;
