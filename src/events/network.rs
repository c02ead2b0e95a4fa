//! Asynchronous action producers.
//!
//! Each producer performs one network request and then dispatches one or
//! more follow-up actions based on the outcome. Every request races the
//! handler's cancellation token, so dropping the owning component aborts
//! in-flight work.

use crate::api::resource::{FormPayload, SaveFormBody};
use crate::api::{ApiError, FormsApi};
use crate::error::AppResult;
use crate::events::ui::{Route, UiEvent, UiEventSender};
use crate::state::{Action, Form, FormStore, StateError};
use log::*;
use std::collections::HashMap;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    LoadForms,
    LoadForm { id: String },
    AddForm,
    SaveForm { id: String },
    DeleteForm { id: String },
    SubmitNewForm { data: serde_json::Value },
}

/// Default name for forms created through `Event::AddForm`.
const NEW_FORM_NAME: &str = "New Form";

/// Specify struct for managing state with network events.
///
pub struct Handler<'a> {
    store: &'a FormStore,
    api: &'a FormsApi,
    ui: UiEventSender,
    cancel: CancellationToken,
}

impl<'a> Handler<'a> {
    /// Return new instance with references to the store and API client.
    ///
    pub fn new(
        store: &'a FormStore,
        api: &'a FormsApi,
        ui: UiEventSender,
        cancel: CancellationToken,
    ) -> Self {
        Handler {
            store,
            api,
            ui,
            cancel,
        }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&mut self, event: Event) -> AppResult<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::LoadForms => self.load_forms().await?,
            Event::LoadForm { id } => self.load_form(id).await?,
            Event::AddForm => self.add_form().await?,
            Event::SaveForm { id } => self.save_form(id).await?,
            Event::DeleteForm { id } => self.delete_form(id).await?,
            Event::SubmitNewForm { data } => self.submit_new_form(data).await?,
        }
        Ok(())
    }

    /// Race a request against the cancellation token.
    ///
    async fn guarded<T>(
        &self,
        request: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled),
            result = request => result,
        }
    }

    /// Hand an event to the embedding UI. A dropped receiver only means the
    /// embedder stopped listening, so it is logged rather than raised.
    fn send_ui(&self, event: UiEvent) {
        if self.ui.send(event).is_err() {
            warn!("UI event receiver dropped; discarding event");
        }
    }

    /// Fetch every form and replace the collection with the post-processed
    /// payload.
    ///
    async fn load_forms(&mut self) -> AppResult<()> {
        info!("Loading all forms...");
        self.store.dispatch(Action::Load).await?;
        match self.guarded(self.api.list_forms()).await {
            Ok(resources) => {
                let forms = received_forms(resources.into_iter().map(Form::from_resource));
                info!("Loaded {} forms.", forms.len());
                self.store.dispatch(Action::LoadSuccess { forms }).await?;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load forms: {}", e);
                self.store
                    .dispatch(Action::LoadFail {
                        error: e.to_string(),
                    })
                    .await?;
                Err(e.into())
            }
        }
    }

    /// Fetch one form, serving it from the local collection when present
    /// instead of issuing a network call.
    ///
    async fn load_form(&mut self, id: String) -> AppResult<()> {
        if let Some(cached) = self.store.form(&id).await {
            debug!("Serving form {} from cache", id);
            let forms = received_forms([cached.reinitialized()]);
            self.store.dispatch(Action::LoadSuccess { forms }).await?;
            return Ok(());
        }

        info!("Loading form {}...", id);
        self.store.dispatch(Action::Load).await?;
        match self.guarded(self.api.get_form(&id)).await {
            Ok(resource) => {
                let forms = received_forms([Form::from_resource(resource)]);
                self.store.dispatch(Action::LoadSuccess { forms }).await?;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load form {}: {}", id, e);
                self.store
                    .dispatch(Action::LoadFail {
                        error: e.to_string(),
                    })
                    .await?;
                Err(e.into())
            }
        }
    }

    /// Create a default-named form, focus it, and navigate to its editor.
    ///
    async fn add_form(&mut self) -> AppResult<()> {
        info!("Creating a new form...");
        let resource = self.guarded(self.api.create_form(NEW_FORM_NAME)).await?;
        let form = Form::from_resource(resource);
        let form_id = form.id.clone();
        info!("Created form {}.", form_id);

        self.store
            .dispatch(Action::SetActiveForm {
                form_id: Some(form_id.clone()),
            })
            .await?;
        self.store
            .dispatch(Action::UpdateForm {
                form_id: form_id.clone(),
                form,
            })
            .await?;
        self.send_ui(UiEvent::Navigate(Route::FormEditor { form_id }));
        Ok(())
    }

    /// Persist a form's name, fields, and deleted field ids, then mark the
    /// current copy as saved. The value bag and focus state never leave the
    /// client.
    ///
    async fn save_form(&mut self, id: String) -> AppResult<()> {
        let form = self
            .store
            .form(&id)
            .await
            .ok_or_else(|| StateError::FormNotFound {
                form_id: id.clone(),
            })?;
        info!("Saving form {}...", id);

        let body = SaveFormBody {
            form: FormPayload {
                name: form.name.clone(),
                fields: form.fields.clone(),
            },
            deleted_fields: form.deleted_fields.clone(),
        };
        self.guarded(self.api.save_form(&id, &body)).await?;
        info!("Form {} saved.", id);

        self.store
            .dispatch(Action::UpdateSavedForm { form_id: id, form })
            .await?;
        Ok(())
    }

    /// Delete a form on the server and navigate back to the list.
    ///
    async fn delete_form(&mut self, id: String) -> AppResult<()> {
        info!("Deleting form {}...", id);
        self.guarded(self.api.delete_form(&id)).await?;
        info!("Form {} deleted.", id);
        self.send_ui(UiEvent::Navigate(Route::FormList));
        Ok(())
    }

    /// Create a form from caller-supplied data, then reload the whole list.
    /// The new-form input widget is reset as soon as the submission starts.
    ///
    async fn submit_new_form(&mut self, data: serde_json::Value) -> AppResult<()> {
        info!("Submitting new form...");
        self.send_ui(UiEvent::ResetNewFormInput);
        self.guarded(self.api.create_form_from(&data)).await?;
        self.load_forms().await
    }
}

/// Key post-processed forms by id, the shape `Action::LoadSuccess` carries.
fn received_forms(forms: impl IntoIterator<Item = Form>) -> HashMap<String, Form> {
    forms.into_iter().map(|f| (f.id.clone(), f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resource::FormResource;
    use crate::error::AppError;
    use crate::events::ui;
    use crate::state::FormAction;
    use anyhow::Result;
    use httpmock::MockServer;
    use serde_json::json;
    use std::time::Duration;

    fn api_for(server: &MockServer) -> FormsApi {
        FormsApi::new(&server.base_url(), Duration::from_secs(5))
    }

    async fn seeded_store(value: serde_json::Value) -> FormStore {
        let resource: FormResource = serde_json::from_value(value).unwrap();
        let forms = received_forms([Form::from_resource(resource)]);
        let store = FormStore::new();
        store.dispatch(Action::LoadSuccess { forms }).await.unwrap();
        store
    }

    #[tokio::test]
    async fn load_forms_derives_values() -> Result<()> {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/forms");
                then.status(200).json_body(json!([{
                    "id": 1,
                    "name": "A",
                    "fields": [
                        { "id": "f1", "key": "k", "name": "K", "position": 0, "initialValue": "v" }
                    ]
                }]));
            })
            .await;

        let store = FormStore::new();
        let api = api_for(&server);
        let (tx, _rx) = ui::channel();
        let mut handler = Handler::new(&store, &api, tx, CancellationToken::new());
        handler.handle(Event::LoadForms).await?;

        let state = store.snapshot().await;
        assert!(state.loaded);
        assert!(!state.loading);
        assert_eq!(
            state.forms["1"].value,
            json!({ "k": "v" }).as_object().unwrap().clone()
        );
        assert!(state.forms["1"].deleted_fields.is_empty());
        assert_eq!(state.forms, state.saved_forms);
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn load_forms_failure_records_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/forms");
            then.status(500).json_body(json!({ "message": "boom" }));
        });

        let store = FormStore::new();
        let api = api_for(&server);
        let (tx, _rx) = ui::channel();
        let mut handler = Handler::new(&store, &api, tx, CancellationToken::new());
        let err = handler.handle(Event::LoadForms).await.unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::Http { status: 500, .. })));

        let state = store.snapshot().await;
        assert!(!state.loading);
        assert!(!state.loaded);
        assert!(state.error.as_deref().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn load_form_cached_skips_network() -> Result<()> {
        let store = seeded_store(json!({
            "id": "1",
            "name": "A",
            "fields": [
                { "id": "f1", "key": "k", "name": "K", "position": 0, "initialValue": "v" }
            ]
        }))
        .await;
        // dirty the value bag so the re-derivation is observable
        store
            .dispatch(Action::Form {
                form_id: "1".to_string(),
                action: FormAction::SetValue {
                    value: json!({ "k": "edited" }).as_object().unwrap().clone(),
                },
            })
            .await?;

        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/forms/1");
                then.status(200).json_body(json!({ "id": "1", "name": "X", "fields": [] }));
            })
            .await;

        let api = api_for(&server);
        let (tx, _rx) = ui::channel();
        let mut handler = Handler::new(&store, &api, tx, CancellationToken::new());
        handler
            .handle(Event::LoadForm {
                id: "1".to_string(),
            })
            .await?;

        assert_eq!(mock.hits_async().await, 0);
        let state = store.snapshot().await;
        assert_eq!(state.forms["1"].value["k"], json!("v"));
        assert_eq!(state.forms["1"].name, "A");
        Ok(())
    }

    #[tokio::test]
    async fn load_form_fetches_when_missing() -> Result<()> {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/forms/7");
                then.status(200).json_body(json!({
                    "id": 7,
                    "name": "Intake",
                    "fields": [
                        { "id": "f1", "key": "age", "name": "Age", "position": 0, "initialValue": 18 }
                    ]
                }));
            })
            .await;

        let store = FormStore::new();
        let api = api_for(&server);
        let (tx, _rx) = ui::channel();
        let mut handler = Handler::new(&store, &api, tx, CancellationToken::new());
        handler
            .handle(Event::LoadForm {
                id: "7".to_string(),
            })
            .await?;

        let state = store.snapshot().await;
        assert_eq!(state.forms["7"].value["age"], json!(18));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn add_form_focuses_and_navigates() -> Result<()> {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/forms")
                    .json_body(json!({ "name": "New Form" }));
                then.status(201)
                    .json_body(json!({ "id": 11, "name": "New Form", "fields": [] }));
            })
            .await;

        let store = FormStore::new();
        let api = api_for(&server);
        let (tx, rx) = ui::channel();
        let mut handler = Handler::new(&store, &api, tx, CancellationToken::new());
        handler.handle(Event::AddForm).await?;

        let state = store.snapshot().await;
        assert_eq!(state.active_form.as_deref(), Some("11"));
        assert_eq!(state.forms["11"].name, "New Form");
        assert_eq!(
            rx.try_recv().unwrap(),
            UiEvent::Navigate(Route::FormEditor {
                form_id: "11".to_string()
            })
        );
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn save_form_submits_only_durable_parts() -> Result<()> {
        let store = seeded_store(json!({
            "id": "1",
            "name": "A",
            "fields": [
                { "id": "f1", "key": "k", "name": "K", "position": 0, "initialValue": "v" },
                { "id": "f2", "key": "m", "name": "M", "position": 1 }
            ]
        }))
        .await;
        // in-progress edits: a typed value and a removed field, plus focus
        store
            .dispatch(Action::Form {
                form_id: "1".to_string(),
                action: FormAction::SetValue {
                    value: json!({ "k": "typed" }).as_object().unwrap().clone(),
                },
            })
            .await?;
        store.remove_field("1", "f2").await?;
        assert!(store.has_unsaved_changes("1").await);

        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("PUT").path("/forms/1").json_body(json!({
                    "form": {
                        "name": "A",
                        "fields": [{
                            "id": "f1",
                            "key": "k",
                            "name": "K",
                            "position": 0,
                            "type": "text",
                            "required": false,
                            "initialValue": "v"
                        }]
                    },
                    "deletedFields": ["f2"]
                }));
                then.status(200).json_body(json!({ "ok": true }));
            })
            .await;

        let api = api_for(&server);
        let (tx, _rx) = ui::channel();
        let mut handler = Handler::new(&store, &api, tx, CancellationToken::new());
        handler
            .handle(Event::SaveForm {
                id: "1".to_string(),
            })
            .await?;

        mock.assert_async().await;
        assert!(!store.has_unsaved_changes("1").await);
        Ok(())
    }

    #[tokio::test]
    async fn delete_form_navigates_to_list() -> Result<()> {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("DELETE").path("/forms/1");
                then.status(204);
            })
            .await;

        let store = seeded_store(json!({ "id": "1", "name": "A", "fields": [] })).await;
        let api = api_for(&server);
        let (tx, rx) = ui::channel();
        let mut handler = Handler::new(&store, &api, tx, CancellationToken::new());
        handler
            .handle(Event::DeleteForm {
                id: "1".to_string(),
            })
            .await?;

        assert_eq!(rx.try_recv().unwrap(), UiEvent::Navigate(Route::FormList));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn submit_new_form_resets_widget_and_reloads() -> Result<()> {
        let server = MockServer::start();
        let create = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/forms")
                    .json_body(json!({ "name": "Survey", "description": "Q3" }));
                then.status(201)
                    .json_body(json!({ "id": 5, "name": "Survey", "fields": [] }));
            })
            .await;
        let list = server
            .mock_async(|when, then| {
                when.method("GET").path("/forms");
                then.status(200)
                    .json_body(json!([{ "id": 5, "name": "Survey", "fields": [] }]));
            })
            .await;

        let store = FormStore::new();
        let api = api_for(&server);
        let (tx, rx) = ui::channel();
        let mut handler = Handler::new(&store, &api, tx, CancellationToken::new());
        handler
            .handle(Event::SubmitNewForm {
                data: json!({ "name": "Survey", "description": "Q3" }),
            })
            .await?;

        assert_eq!(rx.try_recv().unwrap(), UiEvent::ResetNewFormInput);
        let state = store.snapshot().await;
        assert!(state.loaded);
        assert!(state.forms.contains_key("5"));
        create.assert_async().await;
        list.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn cancelled_token_aborts_request() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/forms");
                then.status(200).json_body(json!([]));
            })
            .await;

        let store = FormStore::new();
        let api = api_for(&server);
        let (tx, _rx) = ui::channel();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut handler = Handler::new(&store, &api, tx, cancel);
        let err = handler.handle(Event::LoadForms).await.unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::Cancelled)));
        assert_eq!(mock.hits_async().await, 0);

        let state = store.snapshot().await;
        assert!(state.error.as_deref().unwrap().contains("cancelled"));
    }
}
