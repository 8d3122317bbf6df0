// ── Selection state machine ──
//
// Tracks the single active user. Every entry into `Loading` issues a
// `Ticket`; the orchestrator passes it back with each completion and
// writes are dropped once a newer selection (or a deselect) has bumped
// the generation. State is observable through a `watch` channel; only
// this module writes it.
//
//   Idle ── begin ──> Loading ── stage ──> Loading(staged) ── activate ──> Active
//                        └──────────── fail ──> Failed ── deselect ──> Idle

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::form::FormModel;
use crate::model::{MessageList, MessageSummary};

// ── State ────────────────────────────────────────────────────────────

/// Everything shown for the active user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSelection {
    pub url: String,
    pub primary: FormModel,
    pub restricted: Option<FormModel>,
    pub messages: MessageList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Idle,
    /// Fetching. `staged` holds what has settled so far and only becomes
    /// `Active` once every branch has.
    Loading {
        url: String,
        staged: Option<Box<ActiveSelection>>,
    },
    Active(Box<ActiveSelection>),
    Failed {
        url: String,
        reason: String,
    },
}

impl SelectionState {
    /// URL of the selected user, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Loading { url, .. } | Self::Failed { url, .. } => Some(url.as_str()),
            Self::Active(active) => Some(active.url.as_str()),
        }
    }

    pub fn active(&self) -> Option<&ActiveSelection> {
        match self {
            Self::Active(active) => Some(&**active),
            _ => None,
        }
    }

    /// Data gathered for the selected user: all of it once `Active`, the
    /// settled part while still `Loading`.
    pub fn details(&self) -> Option<&ActiveSelection> {
        match self {
            Self::Active(active) | Self::Loading { staged: Some(active), .. } => Some(&**active),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Short state name, as used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading { .. } => "Loading",
            Self::Active(_) => "Active",
            Self::Failed { .. } => "Failed",
        }
    }
}

/// Proof of which `Loading` entry a completion belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    url: String,
    generation: u64,
}

impl Ticket {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ── Machine ──────────────────────────────────────────────────────────

/// Single-writer owner of [`SelectionState`].
#[derive(Debug)]
pub struct Selection {
    state: watch::Sender<SelectionState>,
    generation: AtomicU64,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SelectionState::Idle);
        Self {
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.state.subscribe()
    }

    /// Current state, cloned.
    pub fn snapshot(&self) -> SelectionState {
        self.state.borrow().clone()
    }

    pub fn current_url(&self) -> Option<String> {
        self.state.borrow().url().map(str::to_owned)
    }

    /// Enter `Loading` for `url`, invalidating every earlier ticket.
    ///
    /// Whatever the previous selection showed is dropped here, before any
    /// request for the new one is issued.
    pub fn begin(&self, url: &str) -> Ticket {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = SelectionState::Loading {
                url: url.to_owned(),
                staged: None,
            };
        });
        debug!(url, generation, "selection loading");
        Ticket {
            url: url.to_owned(),
            generation,
        }
    }

    /// Ticket of the current selection, if there is one.
    pub fn current_ticket(&self) -> Option<Ticket> {
        let state = self.state.borrow();
        state.url().map(|url| Ticket {
            url: url.to_owned(),
            generation: self.generation.load(Ordering::SeqCst),
        })
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Stage the primary form. The state stays `Loading`.
    pub fn stage(&self, ticket: &Ticket, primary: FormModel) -> bool {
        self.write_loading(ticket, |staged| {
            *staged = Some(Box::new(ActiveSelection {
                url: ticket.url.clone(),
                primary,
                restricted: None,
                messages: MessageList::default(),
            }));
        })
    }

    /// `Loading` → `Active`, once every branch has settled. Requires a
    /// staged primary form.
    pub fn activate(&self, ticket: &Ticket) -> bool {
        let written = self.state.send_if_modified(|state| {
            if !self.is_current(ticket) {
                return false;
            }
            match std::mem::take(state) {
                SelectionState::Loading {
                    staged: Some(active),
                    ..
                } => {
                    *state = SelectionState::Active(active);
                    true
                }
                other => {
                    *state = other;
                    false
                }
            }
        });
        if written {
            debug!(url = %ticket.url, generation = ticket.generation, "selection active");
        } else {
            debug!(url = %ticket.url, generation = ticket.generation, "discarding stale completion");
        }
        written
    }

    pub fn set_restricted(&self, ticket: &Ticket, form: FormModel) -> bool {
        self.update_active(ticket, |active| active.restricted = Some(form))
    }

    pub fn set_message_count(&self, ticket: &Ticket, count: usize) -> bool {
        self.update_active(ticket, |active| active.messages.count = Some(count))
    }

    pub fn push_message(&self, ticket: &Ticket, message: MessageSummary) -> bool {
        self.update_active(ticket, |active| active.messages.items.push(message))
    }

    /// `Loading` (or `Active`) → `Failed`. The caller deselects afterwards.
    pub fn fail(&self, ticket: &Ticket, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        self.write_if_current(ticket, |state| {
            *state = SelectionState::Failed {
                url: ticket.url.clone(),
                reason,
            };
        })
    }

    /// Back to `Idle`; outstanding tickets become stale.
    pub fn deselect(&self) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *state = SelectionState::Idle;
        });
    }

    // ── Internals ────────────────────────────────────────────────────

    fn write_if_current(&self, ticket: &Ticket, write: impl FnOnce(&mut SelectionState)) -> bool {
        let written = self.state.send_if_modified(|state| {
            if !self.is_current(ticket) {
                return false;
            }
            write(state);
            true
        });
        if !written {
            debug!(url = %ticket.url, generation = ticket.generation, "discarding stale completion");
        }
        written
    }

    fn write_loading(
        &self,
        ticket: &Ticket,
        write: impl FnOnce(&mut Option<Box<ActiveSelection>>),
    ) -> bool {
        let written = self.state.send_if_modified(|state| match state {
            SelectionState::Loading { staged, .. } if self.is_current(ticket) => {
                write(staged);
                true
            }
            _ => false,
        });
        if !written {
            debug!(url = %ticket.url, generation = ticket.generation, "discarding stale completion");
        }
        written
    }

    /// Update the active selection, or the staged one while still loading.
    fn update_active(&self, ticket: &Ticket, update: impl FnOnce(&mut ActiveSelection)) -> bool {
        let written = self.state.send_if_modified(|state| match state {
            SelectionState::Active(active)
            | SelectionState::Loading {
                staged: Some(active),
                ..
            } if self.is_current(ticket) => {
                update(&mut **active);
                true
            }
            _ => false,
        });
        if !written {
            debug!(url = %ticket.url, generation = ticket.generation, "discarding stale completion");
        }
        written
    }
}
