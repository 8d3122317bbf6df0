// ── Link-relation dispatch ──
//
// Maps the relation names the forum API emits onto operation intents.
// The vocabulary is a closed enum so every relation has an explicit
// capability; relations this client does not act on resolve to
// `Capability::Declined` instead of being left out. Callers check LinkMap
// presence first: a relation only reaches the registry when the server
// advertised it.

use std::str::FromStr;

use hyperadmin_api::{LinkMap, WriteTemplate};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, warn};

use crate::config::UnregisteredPolicy;
use crate::error::CoreError;

// ── Vocabulary ───────────────────────────────────────────────────────

/// Every link relation the forum API is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
pub enum Relation {
    #[strum(serialize = "self")]
    SelfLink,
    #[strum(serialize = "collection")]
    Collection,
    #[strum(serialize = "curies")]
    Curies,
    #[strum(serialize = "search")]
    Search,
    #[strum(serialize = "author")]
    Author,
    #[strum(serialize = "users-all")]
    UsersAll,
    #[strum(serialize = "messages-all")]
    MessagesAll,
    #[strum(serialize = "messages")]
    Messages,
    #[strum(serialize = "user:messages")]
    UserMessages,
    #[strum(serialize = "user:restricted-data")]
    UserRestrictedData,
    #[strum(serialize = "user:public-data")]
    UserPublicData,
    #[strum(serialize = "user:private-data")]
    UserPrivateData,
    #[strum(serialize = "user:parent")]
    UserParent,
    #[strum(serialize = "user:edit")]
    UserEdit,
    #[strum(serialize = "user:delete")]
    UserDelete,
    #[strum(serialize = "msg:edit")]
    MsgEdit,
    #[strum(serialize = "msg:delete")]
    MsgDelete,
    #[strum(serialize = "msg:reply")]
    MsgReply,
    #[strum(serialize = "msg:author")]
    MsgAuthor,
    #[strum(serialize = "atom-thread:in-reply-to")]
    InReplyTo,
}

/// What dispatching a relation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ListUsers,
    ReadHistory,
    ReadRestricted,
    /// Requires a write template payload.
    EditUser,
    DeleteUser,
    DeleteMessage,
    /// Known relation this client deliberately does not act on.
    Declined(&'static str),
}

// ── Operation intents ────────────────────────────────────────────────

/// A request the orchestrator knows how to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    ListUsers { url: String },
    ReadUser { url: String },
    ReadRestricted { url: String },
    ReadHistory { url: String },
    ReadMessage { url: String },
    CreateUser { url: String, template: WriteTemplate },
    EditUser { url: String, template: WriteTemplate },
    DeleteUser { url: String },
    DeleteMessage { url: String },
}

impl Operation {
    /// Target URL of the operation.
    pub fn url(&self) -> &str {
        match self {
            Self::ListUsers { url }
            | Self::ReadUser { url }
            | Self::ReadRestricted { url }
            | Self::ReadHistory { url }
            | Self::ReadMessage { url }
            | Self::CreateUser { url, .. }
            | Self::EditUser { url, .. }
            | Self::DeleteUser { url }
            | Self::DeleteMessage { url } => url,
        }
    }
}

// ── Registry ─────────────────────────────────────────────────────────

/// Static relation → capability table plus the policy for names outside it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationRegistry {
    policy: UnregisteredPolicy,
}

impl RelationRegistry {
    pub fn new(policy: UnregisteredPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnregisteredPolicy {
        self.policy
    }

    /// Capability registered for a relation.
    ///
    /// `messages` and `user:messages` name the same history resource in the
    /// two media formats and share a handler, as do `users-all` and the
    /// entry point.
    ///
    /// `messages-all` also lands on the user listing. The API does not
    /// document that equivalence; it is an assumption kept because messages
    /// are only ever reached through a user here.
    pub fn capability(rel: Relation) -> Capability {
        match rel {
            Relation::UsersAll | Relation::MessagesAll => Capability::ListUsers,
            Relation::Messages | Relation::UserMessages => Capability::ReadHistory,
            Relation::UserRestrictedData => Capability::ReadRestricted,
            Relation::UserEdit => Capability::EditUser,
            Relation::UserDelete => Capability::DeleteUser,
            Relation::MsgDelete => Capability::DeleteMessage,
            Relation::SelfLink => Capability::Declined("canonical location, not an action"),
            Relation::Collection => Capability::Declined("parent collection is reached via users-all"),
            Relation::Curies => Capability::Declined("relation documentation"),
            Relation::Search => Capability::Declined("search is not supported"),
            Relation::Author | Relation::MsgAuthor => {
                Capability::Declined("author profiles are not rendered")
            }
            Relation::UserPublicData => Capability::Declined("public profile is already shown"),
            Relation::UserPrivateData => {
                Capability::Declined("restricted profile is reached via user:restricted-data")
            }
            Relation::UserParent => Capability::Declined("parent resource is not followed"),
            Relation::MsgEdit | Relation::MsgReply => {
                Capability::Declined("message authoring is not supported")
            }
            Relation::InReplyTo => Capability::Declined("reply threads are not supported"),
        }
    }

    /// Dispatch a known relation to an operation intent.
    ///
    /// Returns `None` for declined relations and for `user:edit` without a
    /// payload.
    #[allow(clippy::unused_self)]
    pub fn dispatch(
        &self,
        rel: Relation,
        url: &str,
        payload: Option<WriteTemplate>,
    ) -> Option<Operation> {
        let url = url.to_owned();
        match Self::capability(rel) {
            Capability::ListUsers => Some(Operation::ListUsers { url }),
            Capability::ReadHistory => Some(Operation::ReadHistory { url }),
            Capability::ReadRestricted => Some(Operation::ReadRestricted { url }),
            Capability::EditUser => payload.map(|template| Operation::EditUser { url, template }),
            Capability::DeleteUser => Some(Operation::DeleteUser { url }),
            Capability::DeleteMessage => Some(Operation::DeleteMessage { url }),
            Capability::Declined(reason) => {
                debug!(rel = rel.as_ref(), reason, "relation declined");
                None
            }
        }
    }

    /// Dispatch a relation by name, applying the unregistered policy to
    /// names outside the vocabulary.
    pub fn dispatch_name(
        &self,
        rel: &str,
        url: &str,
        payload: Option<WriteTemplate>,
    ) -> Result<Option<Operation>, CoreError> {
        match Relation::from_str(rel) {
            Ok(known) => Ok(self.dispatch(known, url, payload)),
            Err(_) => match self.policy {
                UnregisteredPolicy::Fatal => Err(CoreError::UnregisteredRelation {
                    rel: rel.to_owned(),
                }),
                UnregisteredPolicy::LogAndIgnore => {
                    warn!(rel, "ignoring unregistered link relation");
                    Ok(None)
                }
            },
        }
    }

    /// Dispatch every relation present in a link map, in document order.
    pub fn dispatch_links(&self, links: &LinkMap) -> Result<Vec<Operation>, CoreError> {
        let mut operations = Vec::new();
        for (rel, url) in links.iter() {
            if let Some(op) = self.dispatch_name(rel, url, None)? {
                operations.push(op);
            }
        }
        Ok(operations)
    }

    /// All relation names this registry knows about.
    pub fn vocabulary() -> impl Iterator<Item = Relation> {
        Relation::iter()
    }
}
