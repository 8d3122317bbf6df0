// HAL documents
//
// Read side of the link-oriented format: a flat attribute map, a `_links`
// object keyed by relation, and (on editable resources) an embedded
// Collection+JSON write template under `template`. Attribute order is
// kept as sent so forms render fields in document order.

use indexmap::IndexMap;
use serde_json::Value;

use super::links::LinkMap;
use super::template::WriteTemplate;
use crate::error::Error;

const LINKS_KEY: &str = "_links";
const TEMPLATE_KEY: &str = "template";

/// Snapshot of a resource's attributes and currently available relations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadRepresentation {
    pub attributes: IndexMap<String, Value>,
    pub links: LinkMap,
    pub template: Option<WriteTemplate>,
}

impl ReadRepresentation {
    /// Build a representation from a decoded HAL object.
    ///
    /// `_links` is mandatory. Link objects whose `href` is `null` and
    /// non-object entries (the `curies` array) are dropped: they do not
    /// describe a reachable capability.
    pub fn from_object(mut object: IndexMap<String, Value>) -> Result<Self, Error> {
        let raw_links = object.shift_remove(LINKS_KEY).ok_or_else(|| Error::Malformed {
            expected: "HAL",
            message: "missing `_links`".into(),
        })?;
        let Value::Object(raw_links) = raw_links else {
            return Err(Error::Malformed {
                expected: "HAL",
                message: "`_links` is not an object".into(),
            });
        };

        let links = raw_links
            .into_iter()
            .filter_map(|(rel, link)| match link {
                Value::Object(mut link) => match link.remove("href") {
                    Some(Value::String(href)) => Some((rel, href)),
                    _ => None,
                },
                _ => None,
            })
            .collect();

        let template = match object.shift_remove(TEMPLATE_KEY) {
            Some(raw) => Some(serde_json::from_value::<WriteTemplate>(raw).map_err(|e| {
                Error::Malformed {
                    expected: "HAL",
                    message: format!("embedded template: {e}"),
                }
            })?),
            None => None,
        };

        Ok(Self {
            attributes: object,
            links,
            template,
        })
    }

    /// Text value of a scalar attribute.
    pub fn text(&self, name: &str) -> Option<String> {
        self.attributes
            .get(name)
            .and_then(super::template::scalar_text)
    }

    /// The `self` link, used as the canonical URL of the resource.
    pub fn self_url(&self) -> Option<&str> {
        self.links.get("self")
    }
}
