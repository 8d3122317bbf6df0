// hyperadmin-core: hypermedia traversal and form synthesis between hyperadmin-api and consumers.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod presenter;
pub mod relation;
pub mod selection;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::AdminClient;
pub use config::{ClientConfig, UnregisteredPolicy};
pub use error::CoreError;
pub use form::{FieldDescriptor, FormAction, FormModel, FormSlot};
pub use model::{ListEntry, MessageList, MessageSummary};
pub use presenter::{Notice, Presenter};
pub use relation::{Capability, Operation, Relation, RelationRegistry};
pub use selection::{ActiveSelection, Selection, SelectionState, Ticket};

pub use hyperadmin_api::{HttpTransport, Transport, TransportConfig};
