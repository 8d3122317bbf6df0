// ── Domain value types ──
//
// Plain data handed across the presentation boundary alongside forms.

use serde::Serialize;

/// One row of the user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub url: String,
    pub label: String,
}

impl ListEntry {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }
}

/// A message authored by the selected user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageSummary {
    pub url: String,
    pub headline: String,
    pub body: String,
}

/// Message history of the active selection.
///
/// `count` is what the history collection reported; it is `None` until
/// the collection has been fetched. `items` only grows while the same
/// selection stays active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageList {
    pub count: Option<usize>,
    pub items: Vec<MessageSummary>,
}

impl MessageList {
    /// The "no messages yet" list.
    pub fn empty() -> Self {
        Self {
            count: Some(0),
            items: Vec::new(),
        }
    }

    /// Count as displayed: `??` while unknown.
    pub fn count_label(&self) -> String {
        self.count.map_or_else(|| "??".into(), |c| c.to_string())
    }
}
