//! Splitting a fetched body into its reserved and state sections.

use serde_json::{Map, Value};

use crate::core::error::Result;
use crate::core::types::RawLink;

/// Reserved section holding link descriptors.
pub const LINKS_SECTION: &str = "_links";
/// Reserved section holding embedded sub-resources.
pub const EMBEDDED_SECTION: &str = "_embedded";
/// The relation a resource uses to describe itself.
pub const SELF_REL: &str = "self";

/// A HAL document decomposed into the three top-level sections.
///
/// `_links` becomes relation-ordered descriptor lists, `_embedded` is
/// recognized but only counted (this core does not traverse embedded
/// sub-resources), and every remaining field is plain resource state.
#[derive(Clone, Debug)]
pub struct HalDocument {
    /// Link descriptors in document order, `self` excluded.
    pub links: Vec<(String, Vec<RawLink>)>,
    /// Title of the `self` link, when the resource declares one.
    pub self_title: Option<String>,
    /// Relations present under `_embedded`, recognized and discarded.
    pub embedded_rels: Vec<String>,
    /// Everything that was not a reserved section.
    pub state: Map<String, Value>,
}

impl HalDocument {
    /// Decompose a parsed JSON body.
    ///
    /// A body without a `_links` section is a valid resource with no
    /// outgoing links. A link relation may hold a single link object or an
    /// array of them; both shapes parse to a descriptor list.
    pub fn from_value(body: Value) -> Result<Self> {
        let mut root = match body {
            Value::Object(map) => map,
            other => {
                return Err(crate::core::error::HalError::Json(
                    serde::de::Error::custom(format!("resource body is not an object: {other}")),
                ))
            }
        };

        let mut links = Vec::new();
        let mut self_title = None;
        if let Some(Value::Object(link_section)) = root.remove(LINKS_SECTION) {
            for (rel, value) in link_section {
                if rel == SELF_REL {
                    self_title = value
                        .get("title")
                        .and_then(Value::as_str)
                        .map(str::to_owned);
                    continue;
                }
                let raw = match &value {
                    Value::Array(items) => items
                        .iter()
                        .map(|item| RawLink::from_value(&rel, item))
                        .collect::<Result<Vec<_>>>()?,
                    single => vec![RawLink::from_value(&rel, single)?],
                };
                links.push((rel, raw));
            }
        }

        let embedded_rels = match root.remove(EMBEDDED_SECTION) {
            Some(Value::Object(embedded)) => embedded.keys().cloned().collect(),
            _ => Vec::new(),
        };

        Ok(HalDocument {
            links,
            self_title,
            embedded_rels,
            state: root,
        })
    }
}
