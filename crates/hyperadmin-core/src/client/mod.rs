// ── Admin client ──
//
// The orchestrator consumers drive. Owns the transport, relation registry
// and selection machine; every result flows out through the `Presenter`.
// Cheaply cloneable via `Arc<ClientInner>`.

mod cascade;

use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use hyperadmin_api::{
    ApiRequest, ApiResponse, Collection, HttpTransport, ReadRepresentation, Transport,
    WriteTemplate,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::form::{self, FormAction, FormModel, FormSlot};
use crate::model::ListEntry;
use crate::presenter::{Notice, Presenter};
use crate::relation::{Operation, Relation, RelationRegistry};
use crate::selection::{Selection, SelectionState, Ticket};

const NICKNAME: &str = "nickname";

// ── AdminClient ──────────────────────────────────────────────────────

/// Entry point for consumers.
pub struct AdminClient<T: Transport = HttpTransport> {
    inner: Arc<ClientInner<T>>,
}

impl<T: Transport> Clone for AdminClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ClientInner<T> {
    config: ClientConfig,
    entry_url: String,
    transport: T,
    registry: RelationRegistry,
    selection: Selection,
    presenter: Arc<dyn Presenter>,
    users: ArcSwap<Vec<ListEntry>>,
    new_user_form: ArcSwapOption<FormModel>,
}

impl AdminClient<HttpTransport> {
    /// Build a client talking HTTP to `config.api_url`.
    pub fn new(config: ClientConfig, presenter: Arc<dyn Presenter>) -> Result<Self, CoreError> {
        let transport = HttpTransport::new(config.api_url.clone(), &config.transport_config())?;
        Self::with_transport(config, transport, presenter)
    }
}

impl<T: Transport> AdminClient<T> {
    /// Build a client over an arbitrary transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: T,
        presenter: Arc<dyn Presenter>,
    ) -> Result<Self, CoreError> {
        let entry_url = config.entry_url()?.to_string();
        let registry = RelationRegistry::new(config.unregistered_relations);
        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                entry_url,
                transport,
                registry,
                selection: Selection::new(),
                presenter,
                users: ArcSwap::from_pointee(Vec::new()),
                new_user_form: ArcSwapOption::empty(),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &RelationRegistry {
        &self.inner.registry
    }

    /// Subscribe to selection changes.
    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.inner.selection.subscribe()
    }

    pub fn selection(&self) -> SelectionState {
        self.inner.selection.snapshot()
    }

    /// The user list as last rendered.
    pub fn users(&self) -> Arc<Vec<ListEntry>> {
        self.inner.users.load_full()
    }

    /// The new-user form built from the users collection template.
    pub fn new_user_form(&self) -> Option<FormModel> {
        self.inner
            .new_user_form
            .load_full()
            .map(|form| FormModel::clone(&form))
    }

    // ── Intents ──────────────────────────────────────────────────────

    /// Execute an operation intent.
    ///
    /// Branch reads (`ReadRestricted`, `ReadHistory`, `ReadMessage`) apply
    /// to the current selection.
    pub async fn execute(&self, operation: Operation) -> Result<(), CoreError> {
        debug!(?operation, "executing operation");
        match operation {
            Operation::ListUsers { url } => self.load_users(Some(&url)).await,
            Operation::ReadUser { url } => self.select(&url).await,
            Operation::ReadRestricted { url } => {
                let ticket = self.current_ticket()?;
                self.restricted_branch(&ticket, &url).await
            }
            Operation::ReadHistory { url } => {
                let ticket = self.current_ticket()?;
                self.history_branch(&ticket, &url).await
            }
            Operation::ReadMessage { url } => {
                let ticket = self.current_ticket()?;
                let (url, result) = self.fetch_message(url).await;
                self.append_message(&ticket, &url, result);
                Ok(())
            }
            Operation::CreateUser { url, template } => self.post_user(&url, template).await,
            Operation::EditUser { url, template } => self.put_user(&url, template).await,
            Operation::DeleteUser { url } => self.remove_user(&url).await,
            Operation::DeleteMessage { url } => self.remove_message(&url).await,
        }
    }

    // ── Users collection ─────────────────────────────────────────────

    /// Fetch the users collection (default: the configured entry point),
    /// render the list, and build the new-user form from its template.
    pub async fn load_users(&self, url: Option<&str>) -> Result<(), CoreError> {
        let url = url.unwrap_or(&self.inner.entry_url);
        self.deselect();

        let collection = match self.fetch_collection(url).await {
            Ok(collection) => collection,
            Err(e) => {
                warn!(url, error = %e, "failed to fetch users collection");
                self.inner.users.store(Arc::new(Vec::new()));
                self.inner.presenter.render_list(&[]);
                self.notify(Notice::error(
                    "Could not fetch the list of users. Please, try again",
                ));
                return Err(e);
            }
        };

        let entries: Vec<ListEntry> = collection
            .items
            .iter()
            .filter_map(|item| {
                item.value(NICKNAME)
                    .map(|nickname| ListEntry::new(item.href.clone(), nickname))
            })
            .collect();
        debug!(url, count = entries.len(), "users collection loaded");
        self.inner.presenter.render_list(&entries);
        self.inner.users.store(Arc::new(entries));

        match &collection.template {
            Some(template) => {
                let mut new_user = form::synthesize_from_template(template);
                new_user.action_url = Some(collection.href.clone());
                new_user.actions = vec![FormAction::Create];
                self.inner.presenter.render_form(&new_user, FormSlot::NewUser);
                self.inner.new_user_form.store(Some(Arc::new(new_user)));
            }
            None => self.inner.new_user_form.store(None),
        }
        Ok(())
    }

    /// Submit a filled new-user form.
    pub async fn create_user(&self, form: &FormModel) -> Result<(), CoreError> {
        let url = form.action_url.clone().ok_or(CoreError::MissingAction)?;
        self.execute(Operation::CreateUser {
            url,
            template: form::serialize(form),
        })
        .await
    }

    /// Submit an edited user form to its `user:edit` target.
    pub async fn edit(&self, form: &FormModel) -> Result<(), CoreError> {
        let url = form.action_url.as_deref().ok_or(CoreError::MissingAction)?;
        if !form.has_action(FormAction::Edit) {
            return Err(CoreError::MissingAction);
        }
        let operation = self
            .inner
            .registry
            .dispatch(Relation::UserEdit, url, Some(form::serialize(form)))
            .ok_or(CoreError::MissingAction)?;
        self.execute(operation).await
    }

    pub async fn delete_user(&self, url: &str) -> Result<(), CoreError> {
        self.execute(Operation::DeleteUser { url: url.to_owned() })
            .await
    }

    pub async fn delete_message(&self, url: &str) -> Result<(), CoreError> {
        self.execute(Operation::DeleteMessage { url: url.to_owned() })
            .await
    }

    async fn post_user(&self, url: &str, template: WriteTemplate) -> Result<(), CoreError> {
        let nickname = template
            .get(NICKNAME)
            .and_then(hyperadmin_api::AttributeEntry::text_value)
            .unwrap_or_default();
        let envelope = template.into_envelope();

        let request = ApiRequest::post_template(url, &envelope)?;
        let response = match self.send(request).await {
            Ok(response) => response,
            Err(e) => {
                self.notify(Notice::error(format!(
                    "Could not create new user: {}",
                    e.user_message()
                )));
                return Err(e);
            }
        };
        self.notify(Notice::info("User successfully added"));

        let Some(location) = response.location else {
            warn!(url, "created user without a Location header");
            return self.load_users(None).await;
        };
        info!(%location, nickname, "user created");
        let entry = ListEntry::new(location.clone(), nickname);
        self.inner.users.rcu(|users| {
            let mut next = Vec::clone(users);
            next.push(entry.clone());
            next
        });
        let users = self.inner.users.load_full();
        self.inner.presenter.render_list(&users);
        self.select(&location).await
    }

    async fn put_user(&self, url: &str, template: WriteTemplate) -> Result<(), CoreError> {
        let envelope = template.into_envelope();
        let request = ApiRequest::put_template(url, &envelope)?;
        match self.send(request).await {
            Ok(_) => {
                info!(url, "user modified");
                self.notify(Notice::info("User information have been modified successfully"));
                Ok(())
            }
            Err(e) => {
                self.notify(Notice::error(format!(
                    "Could not modify user information: {}",
                    e.user_message()
                )));
                Err(e)
            }
        }
    }

    async fn remove_user(&self, url: &str) -> Result<(), CoreError> {
        if let Err(e) = self.send(ApiRequest::delete(url)).await {
            self.notify(Notice::error(
                "The user information could not be deleted from the database",
            ));
            return Err(e);
        }
        info!(url, "user deleted");
        self.notify(Notice::info(
            "The user information has been deleted from the database",
        ));
        self.load_users(None).await
    }

    async fn remove_message(&self, url: &str) -> Result<(), CoreError> {
        if let Err(e) = self.send(ApiRequest::delete(url)).await {
            self.notify(Notice::error("Could not delete a message"));
            return Err(e);
        }
        info!(url, "message deleted");
        self.notify(Notice::info("The message was deleted successfully"));
        match self.inner.selection.current_url() {
            Some(_) => self.reload().await,
            None => Ok(()),
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Re-enter `Loading` for the active user.
    pub async fn reload(&self) -> Result<(), CoreError> {
        let url = self
            .inner
            .selection
            .current_url()
            .ok_or(CoreError::NoSelection)?;
        self.select(&url).await
    }

    /// Drop the selection and clear what was shown for it.
    pub fn deselect(&self) {
        self.inner.selection.deselect();
        self.inner.presenter.clear_selection_ui();
    }

    fn current_ticket(&self) -> Result<Ticket, CoreError> {
        self.inner
            .selection
            .current_ticket()
            .ok_or(CoreError::NoSelection)
    }

    // ── Transport helpers ────────────────────────────────────────────

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, CoreError> {
        Ok(self.inner.transport.request(request).await?)
    }

    async fn fetch_collection(&self, url: &str) -> Result<Collection, CoreError> {
        Ok(self
            .inner
            .transport
            .get_document(url)
            .await?
            .into_collection()?)
    }

    async fn fetch_representation(&self, url: &str) -> Result<ReadRepresentation, CoreError> {
        Ok(self
            .inner
            .transport
            .get_document(url)
            .await?
            .into_representation()?)
    }

    fn notify(&self, notice: Notice) {
        self.inner.presenter.notify(notice);
    }
}
