// Collection+JSON documents
//
// Read side of the collection format: a list of items, each a set of
// name/value pairs plus links, and an optional write template describing
// how to add a new item. Fields use `#[serde(default)]` because the
// server omits empty arrays on some resources.

use serde::{Deserialize, Serialize};

use super::links::LinkMap;
use super::template::{AttributeEntry, WriteTemplate};

/// Top-level `{"collection": {...}}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDocument {
    pub collection: Collection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub version: Option<String>,
    pub href: String,
    #[serde(default)]
    pub links: Vec<CollectionLink>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub template: Option<WriteTemplate>,
}

impl Collection {
    /// Collection-level links keyed by relation.
    pub fn link_map(&self) -> LinkMap {
        links_to_map(&self.links)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLink {
    pub rel: String,
    pub href: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// One entry of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub href: String,
    #[serde(default)]
    pub data: Vec<AttributeEntry>,
    #[serde(default)]
    pub links: Vec<CollectionLink>,
    #[serde(default, rename = "read-only")]
    pub read_only: bool,
}

impl Item {
    /// Text value of the named data entry.
    pub fn value(&self, name: &str) -> Option<String> {
        self.data
            .iter()
            .find(|d| d.name == name)
            .and_then(AttributeEntry::text_value)
    }

    pub fn link_map(&self) -> LinkMap {
        links_to_map(&self.links)
    }
}

fn links_to_map(links: &[CollectionLink]) -> LinkMap {
    links
        .iter()
        .map(|l| (l.rel.clone(), l.href.clone()))
        .collect()
}
