use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Relation name → target URL, in document order.
///
/// Presence of a relation is the only signal that the matching capability
/// is available right now; there is no separate "enabled" flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkMap(IndexMap<String, String>);

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rel: impl Into<String>, href: impl Into<String>) {
        self.0.insert(rel.into(), href.into());
    }

    pub fn get(&self, rel: &str) -> Option<&str> {
        self.0.get(rel).map(String::as_str)
    }

    pub fn contains(&self, rel: &str) -> bool {
        self.0.contains_key(rel)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LinkMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
