// ── Presentation boundary ──
//
// What the orchestrator needs from whoever draws the UI. Calls are
// synchronous and cheap: implementations render or queue, they never
// call back into the client.

use crate::form::{FormModel, FormSlot};
use crate::model::{ListEntry, MessageList};

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Info(m) | Self::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

pub trait Presenter: Send + Sync {
    /// Replace the user list.
    fn render_list(&self, entries: &[ListEntry]);

    /// Replace the form shown in `slot`.
    fn render_form(&self, form: &FormModel, slot: FormSlot);

    /// Replace the message history of the active user.
    fn render_messages(&self, messages: &MessageList);

    fn notify(&self, notice: Notice);

    /// Drop everything shown for the previous selection.
    fn clear_selection_ui(&self);
}
