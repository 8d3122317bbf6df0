// ── Selection cascade ──
//
// Selecting a user fetches the user itself, then the restricted profile
// and the message history side by side. Each stage checks its ticket
// before writing, so a newer selection silently wins over late responses.
// The selection stays `Loading` until both branches have settled; a failed
// branch moves it to `Failed` and then back to `Idle`.
//
//   primary ──┬── restricted-data            (failure: fail + notify + deselect)
//             └── history ── item, item, ... (404: count 0; item failure: notify)

use futures_util::StreamExt;
use futures_util::future::OptionFuture;
use futures_util::stream::FuturesOrdered;
use hyperadmin_api::{ReadRepresentation, Transport};
use tracing::{debug, error, info, warn};

use super::AdminClient;
use crate::error::CoreError;
use crate::form::{self, FormSlot};
use crate::model::MessageSummary;
use crate::presenter::Notice;
use crate::relation::{Operation, Relation};
use crate::selection::Ticket;

/// Attributes of the restricted profile already shown on the primary form.
const RESTRICTED_EXCLUDED: &[&str] = &["nickname"];

impl<T: Transport> AdminClient<T> {
    /// Select a user and run the full cascade for it.
    ///
    /// Returns once every branch has settled. A stale selection (one
    /// superseded while in flight) returns `Ok(())` without touching state.
    pub async fn select(&self, url: &str) -> Result<(), CoreError> {
        self.inner.presenter.clear_selection_ui();
        let ticket = self.inner.selection.begin(url);

        let repr = match self.fetch_representation(url).await {
            Ok(repr) => repr,
            Err(e) => {
                if self.inner.selection.fail(&ticket, e.to_string()) {
                    warn!(url, error = %e, "failed to fetch user");
                    self.notify(Notice::error(
                        "Cannot extract information about this user from the forum service.",
                    ));
                    self.deselect();
                    return Err(e);
                }
                return Ok(());
            }
        };

        let operations = match self.inner.registry.dispatch_links(&repr.links) {
            Ok(operations) => operations,
            Err(e) => {
                if self.inner.selection.fail(&ticket, e.to_string()) {
                    error!(url, error = %e, "unregistered relation");
                    self.deselect();
                }
                return Err(e);
            }
        };

        let primary = form::synthesize_from_representation_and_template(&repr, None, &[])
            .with_link_actions(&repr.links);
        if !self.inner.selection.stage(&ticket, primary.clone()) {
            return Ok(());
        }
        self.inner.presenter.render_form(&primary, FormSlot::Primary);

        let mut restricted_url = None;
        let mut history_url = None;
        for operation in operations {
            match operation {
                Operation::ReadRestricted { url } => restricted_url = Some(url),
                Operation::ReadHistory { url } => history_url = Some(url),
                _ => {}
            }
        }
        if history_url.is_none() && self.inner.selection.set_message_count(&ticket, 0) {
            self.render_messages();
        }

        let restricted: OptionFuture<_> = restricted_url
            .as_deref()
            .map(|url| self.restricted_branch(&ticket, url))
            .into();
        let history: OptionFuture<_> = history_url
            .as_deref()
            .map(|url| self.history_branch(&ticket, url))
            .into();
        let (restricted, history) = tokio::join!(restricted, history);

        restricted.transpose()?;
        history.transpose()?;
        if self.inner.selection.activate(&ticket) {
            info!(url, "user selected");
        }
        Ok(())
    }

    /// Mandatory branch: the restricted profile, editable when the server
    /// advertises `user:edit`.
    pub(super) async fn restricted_branch(
        &self,
        ticket: &Ticket,
        url: &str,
    ) -> Result<(), CoreError> {
        let repr = match self.fetch_representation(url).await {
            Ok(repr) => repr,
            Err(e) => {
                if self.inner.selection.fail(ticket, e.to_string()) {
                    warn!(url, error = %e, "failed to fetch restricted profile");
                    self.notify(Notice::error(
                        "Cannot extract all the information about this user from the server",
                    ));
                    self.deselect();
                    return Err(e);
                }
                return Ok(());
            }
        };

        let template = if repr.links.contains(Relation::UserEdit.as_ref()) {
            repr.template.as_ref()
        } else {
            None
        };
        let restricted =
            form::synthesize_from_representation_and_template(&repr, template, RESTRICTED_EXCLUDED)
                .with_link_actions(&repr.links);
        if self.inner.selection.set_restricted(ticket, restricted.clone()) {
            self.inner
                .presenter
                .render_form(&restricted, FormSlot::Restricted);
        }
        Ok(())
    }

    /// Degradable branch: the history collection and one fetch per item.
    pub(super) async fn history_branch(&self, ticket: &Ticket, url: &str) -> Result<(), CoreError> {
        let collection = match self.fetch_collection(url).await {
            Ok(collection) => collection,
            Err(e) if e.is_not_found() => {
                debug!(url, "user has no messages");
                if self.inner.selection.set_message_count(ticket, 0) {
                    self.render_messages();
                }
                return Ok(());
            }
            Err(e) => {
                if self.inner.selection.fail(ticket, e.to_string()) {
                    warn!(url, error = %e, "failed to fetch message history");
                    self.notify(Notice::error("Cannot retrieve the messages for the user"));
                    self.deselect();
                    return Err(e);
                }
                return Ok(());
            }
        };

        if !self
            .inner
            .selection
            .set_message_count(ticket, collection.items.len())
        {
            return Ok(());
        }
        self.render_messages();

        let mut pending: FuturesOrdered<_> = collection
            .items
            .into_iter()
            .map(|item| self.fetch_message(item.href))
            .collect();
        while let Some((item_url, result)) = pending.next().await {
            if !self.inner.selection.is_current(ticket) {
                debug!(url, "selection changed, dropping remaining messages");
                return Ok(());
            }
            self.append_message(ticket, &item_url, result);
        }
        Ok(())
    }

    pub(super) async fn fetch_message(
        &self,
        url: String,
    ) -> (String, Result<ReadRepresentation, CoreError>) {
        let result = self.fetch_representation(&url).await;
        (url, result)
    }

    /// Append one fetched message, or report the failure without
    /// deselecting.
    pub(super) fn append_message(
        &self,
        ticket: &Ticket,
        url: &str,
        result: Result<ReadRepresentation, CoreError>,
    ) {
        match result {
            Ok(repr) => {
                let summary = MessageSummary {
                    url: repr.self_url().unwrap_or(url).to_owned(),
                    headline: repr.text("headline").unwrap_or_default(),
                    body: repr.text("articleBody").unwrap_or_default(),
                };
                if self.inner.selection.push_message(ticket, summary) {
                    self.render_messages();
                }
            }
            Err(e) => {
                if self.inner.selection.is_current(ticket) {
                    warn!(url, error = %e, "failed to fetch message");
                    self.notify(Notice::error(format!(
                        "Cannot get information from message: {url}"
                    )));
                }
            }
        }
    }

    fn render_messages(&self) {
        if let Some(details) = self.inner.selection.snapshot().details() {
            self.inner.presenter.render_messages(&details.messages);
        }
    }
}
