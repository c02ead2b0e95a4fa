//! UI-facing signals emitted by producers.
//!
//! Routing and rendering are delegated to the embedding application; the
//! producers only emit intents over this channel.

/// Pages the embedding application can be asked to navigate to.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// The forms list page
    FormList,
    /// The edit page for one form
    FormEditor { form_id: String },
}

/// Specify different UI event types.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// Ask the embedding router to navigate
    Navigate(Route),
    /// Clear the new-form input widget's values
    ResetNewFormInput,
}

pub type UiEventSender = std::sync::mpsc::Sender<UiEvent>;
pub type UiEventReceiver = std::sync::mpsc::Receiver<UiEvent>;

/// Return a connected sender/receiver pair for UI events.
///
pub fn channel() -> (UiEventSender, UiEventReceiver) {
    std::sync::mpsc::channel()
}
