// hyperadmin-api: transport boundary and hypermedia media types for the forum API

pub mod error;
pub mod media;
pub mod transport;

pub use error::Error;
pub use media::{
    AttributeEntry, Collection, Document, Item, LinkMap, MediaType, ReadRepresentation,
    TemplateEnvelope, WriteTemplate,
};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport, TransportConfig};
