//! User command handlers.

use serde::Serialize;
use tabled::Tabled;

use hyperadmin_core::{
    AdminClient, FieldDescriptor, FormAction, ListEntry, MessageList, MessageSummary,
};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;
use crate::presenter::{Rendered, TerminalPresenter};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Nickname")]
    nickname: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&ListEntry> for UserRow {
    fn from(e: &ListEntry) -> Self {
        Self {
            nickname: e.label.clone(),
            url: e.url.clone(),
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Editable")]
    editable: String,
}

impl From<&FieldDescriptor> for FieldRow {
    fn from(f: &FieldDescriptor) -> Self {
        let marker = if f.required { "yes (required)" } else { "yes" };
        Self {
            name: f.name.clone(),
            value: f.value.clone(),
            editable: if f.editable { marker } else { "no" }.into(),
        }
    }
}

#[derive(Tabled)]
pub(super) struct MessageRow {
    #[tabled(rename = "Headline")]
    headline: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&MessageSummary> for MessageRow {
    fn from(m: &MessageSummary) -> Self {
        Self {
            headline: m.headline.clone(),
            url: m.url.clone(),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

/// A selected user as printed by `show`, `create` and `edit`.
#[derive(Debug, Serialize)]
struct UserDetail {
    url: String,
    edit_url: Option<String>,
    actions: Vec<FormAction>,
    fields: Vec<FieldDescriptor>,
    messages: MessageList,
}

impl UserDetail {
    fn from_rendered(url: &str, rendered: &Rendered) -> Result<Self, CliError> {
        let primary = rendered
            .primary
            .as_ref()
            .ok_or_else(|| CliError::NotFound { url: url.into() })?;

        let mut fields = primary.fields().to_vec();
        let mut actions = primary.actions.clone();
        if let Some(restricted) = &rendered.restricted {
            fields.extend(
                restricted
                    .fields()
                    .iter()
                    .filter(|f| primary.field(&f.name).is_none())
                    .cloned(),
            );
            for action in &restricted.actions {
                if !actions.contains(action) {
                    actions.push(*action);
                }
            }
        }

        Ok(Self {
            url: url.into(),
            edit_url: rendered.editable_form().and_then(|f| f.action_url.clone()),
            actions,
            fields,
            messages: rendered.messages.clone().unwrap_or_default(),
        })
    }

    fn detail(&self) -> String {
        let rows: Vec<FieldRow> = self.fields.iter().map(FieldRow::from).collect();
        let mut sections = vec![self.url.clone(), output::render_table(&rows)];

        if !self.actions.is_empty() {
            let actions: Vec<&str> = self.actions.iter().map(AsRef::as_ref).collect();
            sections.push(format!("Actions: {}", actions.join(", ")));
        }

        sections.push(format!("Messages: {}", self.messages.count_label()));
        if !self.messages.items.is_empty() {
            let rows: Vec<MessageRow> =
                self.messages.items.iter().map(MessageRow::from).collect();
            sections.push(output::render_table(&rows));
        }
        sections.join("\n")
    }
}

/// Print the selection the client rendered for `url`.
pub(super) fn print_user(
    presenter: &TerminalPresenter,
    url: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let detail = UserDetail::from_rendered(url, &presenter.rendered())?;
    let out = output::render_single(&global.output, &detail, UserDetail::detail, |d| {
        d.url.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &AdminClient,
    presenter: &TerminalPresenter,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            client.load_users(None).await?;
            let users = presenter.rendered().users;
            let out = output::render_list(
                &global.output,
                &users,
                |u| UserRow::from(u),
                |u| u.url.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Show { url } => {
            client.select(&url).await?;
            print_user(presenter, &url, global)
        }

        UsersCommand::Create { set } => {
            client.load_users(None).await?;
            let mut form = presenter
                .rendered()
                .new_user
                .ok_or_else(|| CliError::Unsupported {
                    operation: "users create".into(),
                })?;
            util::apply_assignments(&mut form, set)?;
            util::check_required(&form)?;

            client.create_user(&form).await?;

            // Without a Location header the client reloads the list instead
            // of selecting the new user.
            let state = client.selection();
            match state.url() {
                Some(url) => print_user(presenter, url, global),
                None => Ok(()),
            }
        }

        UsersCommand::Edit { url, set } => {
            client.select(&url).await?;
            let mut form = presenter
                .rendered()
                .editable_form()
                .cloned()
                .ok_or_else(|| CliError::Unsupported {
                    operation: "users edit".into(),
                })?;
            util::apply_assignments(&mut form, set)?;
            util::check_required(&form)?;

            client.edit(&form).await?;
            client.reload().await?;
            print_user(presenter, &url, global)
        }

        UsersCommand::Delete { url } => {
            let prompt = format!("Delete user {url}? This cannot be undone.");
            if !util::confirm(&prompt, "users delete", global.yes)? {
                return Ok(());
            }
            client.delete_user(&url).await?;
            Ok(())
        }
    }
}
