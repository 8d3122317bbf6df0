// Media types emitted by the forum API
//
// Responses are parsed into one of two explicit shapes at the transport
// boundary. Content type decides first; when the server sends a generic
// JSON type the document shape decides (`collection` vs `_links`).

pub mod collection;
pub mod hal;
pub mod links;
pub mod template;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Error;

pub use collection::{Collection, CollectionDocument, CollectionLink, Item};
pub use hal::ReadRepresentation;
pub use links::LinkMap;
pub use template::{AttributeEntry, TemplateEnvelope, WriteTemplate};

pub const COLLECTION_JSON: &str = "application/vnd.collection+json";
pub const HAL_JSON: &str = "application/hal+json";

/// The two hypermedia formats this client reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    CollectionJson,
    Hal,
    /// `application/json` and friends: shape decides.
    Json,
}

impl MediaType {
    /// Classify a `Content-Type` header value, ignoring parameters
    /// (the server appends its profile after `;`).
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            COLLECTION_JSON => Some(Self::CollectionJson),
            HAL_JSON => Some(Self::Hal),
            "application/json" | "text/json" | "" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CollectionJson => COLLECTION_JSON,
            Self::Hal => HAL_JSON,
            Self::Json => "application/json",
        }
    }
}

/// A parsed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Collection(Collection),
    Hal(ReadRepresentation),
}

impl Document {
    /// Parse a body according to its declared content type.
    pub fn parse(content_type: Option<&str>, body: &str) -> Result<Self, Error> {
        let media = match content_type {
            Some(ct) => MediaType::from_content_type(ct).ok_or_else(|| {
                Error::UnsupportedMediaType {
                    content_type: ct.to_owned(),
                }
            })?,
            None => MediaType::Json,
        };

        let object: IndexMap<String, Value> =
            serde_json::from_str(body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.to_owned(),
            })?;

        match media {
            MediaType::CollectionJson => parse_collection(object),
            MediaType::Hal => ReadRepresentation::from_object(object).map(Self::Hal),
            MediaType::Json if object.contains_key("collection") => parse_collection(object),
            MediaType::Json if object.contains_key("_links") => {
                ReadRepresentation::from_object(object).map(Self::Hal)
            }
            MediaType::Json => Err(Error::Malformed {
                expected: "hypermedia",
                message: "neither `collection` nor `_links` present".into(),
            }),
        }
    }

    pub fn into_collection(self) -> Result<Collection, Error> {
        match self {
            Self::Collection(c) => Ok(c),
            Self::Hal(_) => Err(Error::Malformed {
                expected: "Collection+JSON",
                message: "received a HAL document".into(),
            }),
        }
    }

    pub fn into_representation(self) -> Result<ReadRepresentation, Error> {
        match self {
            Self::Hal(r) => Ok(r),
            Self::Collection(_) => Err(Error::Malformed {
                expected: "HAL",
                message: "received a Collection+JSON document".into(),
            }),
        }
    }
}

fn parse_collection(mut object: IndexMap<String, Value>) -> Result<Document, Error> {
    let raw = object
        .shift_remove("collection")
        .ok_or_else(|| Error::Malformed {
            expected: "Collection+JSON",
            message: "missing `collection`".into(),
        })?;
    let collection = serde_json::from_value::<Collection>(raw).map_err(|e| Error::Malformed {
        expected: "Collection+JSON",
        message: e.to_string(),
    })?;
    Ok(Document::Collection(collection))
}
