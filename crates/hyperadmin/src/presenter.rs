//! Terminal implementation of the presentation boundary.
//!
//! Notices go to stderr as they arrive. Renders are kept as the latest
//! state per slot; command handlers print that state once the client call
//! has settled.

use std::sync::{Mutex, MutexGuard, PoisonError};

use owo_colors::OwoColorize;
use tracing::trace;

use hyperadmin_core::{FormModel, FormSlot, ListEntry, MessageList, Notice, Presenter};

/// What the client rendered most recently.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub users: Vec<ListEntry>,
    pub new_user: Option<FormModel>,
    pub primary: Option<FormModel>,
    pub restricted: Option<FormModel>,
    pub messages: Option<MessageList>,
}

impl Rendered {
    /// The form that carries the edit action, preferring the restricted
    /// profile.
    pub fn editable_form(&self) -> Option<&FormModel> {
        [self.restricted.as_ref(), self.primary.as_ref()]
            .into_iter()
            .flatten()
            .find(|form| form.has_action(hyperadmin_core::FormAction::Edit))
    }
}

pub struct TerminalPresenter {
    color: bool,
    quiet: bool,
    state: Mutex<Rendered>,
}

impl TerminalPresenter {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self {
            color,
            quiet,
            state: Mutex::new(Rendered::default()),
        }
    }

    pub fn rendered(&self) -> Rendered {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Rendered> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Presenter for TerminalPresenter {
    fn render_list(&self, entries: &[ListEntry]) {
        trace!(count = entries.len(), "render list");
        self.lock().users = entries.to_vec();
    }

    fn render_form(&self, form: &FormModel, slot: FormSlot) {
        trace!(%slot, fields = form.len(), "render form");
        let mut state = self.lock();
        let target = match slot {
            FormSlot::NewUser => &mut state.new_user,
            FormSlot::Primary => &mut state.primary,
            FormSlot::Restricted => &mut state.restricted,
        };
        *target = Some(form.clone());
    }

    fn render_messages(&self, messages: &MessageList) {
        trace!(
            count = %messages.count_label(),
            loaded = messages.items.len(),
            "render messages"
        );
        self.lock().messages = Some(messages.clone());
    }

    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Info(message) if !self.quiet => {
                if self.color {
                    eprintln!("{} {message}", "✓".green());
                } else {
                    eprintln!("✓ {message}");
                }
            }
            Notice::Info(_) => {}
            Notice::Error(message) => {
                if self.color {
                    eprintln!("{} {}", "✗".red(), message.red());
                } else {
                    eprintln!("✗ {message}");
                }
            }
        }
    }

    fn clear_selection_ui(&self) {
        let mut state = self.lock();
        state.primary = None;
        state.restricted = None;
        state.messages = None;
    }
}
