//! Curie-aware link relation lookup.

use crate::core::error::{HalError, Result};
use crate::core::navigator::collection::LinkCollection;
use crate::core::navigator::proxy::HalNavigator;

/// Relation names registered with IANA.
///
/// Standard relations are always looked up verbatim, never rewritten under
/// a default curie.
const IANA_RELS: &[&str] = &[
    "about",
    "alternate",
    "appendix",
    "archives",
    "author",
    "bookmark",
    "canonical",
    "chapter",
    "collection",
    "contents",
    "copyright",
    "create-form",
    "current",
    "describedby",
    "describes",
    "disclosure",
    "duplicate",
    "edit",
    "edit-form",
    "edit-media",
    "enclosure",
    "first",
    "glossary",
    "help",
    "hosts",
    "hub",
    "icon",
    "index",
    "item",
    "last",
    "latest-version",
    "license",
    "lrdd",
    "memento",
    "monitor",
    "monitor-group",
    "next",
    "next-archive",
    "nofollow",
    "noreferrer",
    "original",
    "payment",
    "predecessor-version",
    "prefetch",
    "prev",
    "prev-archive",
    "preview",
    "previous",
    "privacy-policy",
    "profile",
    "related",
    "replies",
    "search",
    "section",
    "self",
    "service",
    "start",
    "stylesheet",
    "subsection",
    "successor-version",
    "tag",
    "terms-of-service",
    "timegate",
    "timemap",
    "type",
    "up",
    "version-history",
    "via",
    "working-copy",
    "working-copy-of",
];

pub(crate) fn is_iana_rel(rel: &str) -> bool {
    IANA_RELS.binary_search(&rel).is_ok()
}

/// The links of one fetched resource, in document order.
///
/// When the owning navigation tree has a default curie, a bare lookup key
/// is rewritten to `<curie>:<key>` unless the key already carries a
/// namespace or is a standard IANA relation; namespaced keys are always
/// looked up verbatim.
#[derive(Clone, Debug)]
pub struct LinkRegistry {
    uri: String,
    default_curie: Option<String>,
    entries: Vec<(String, LinkCollection)>,
}

impl LinkRegistry {
    pub(crate) fn new(uri: impl Into<String>, default_curie: Option<String>) -> Self {
        LinkRegistry {
            uri: uri.into(),
            default_curie,
            entries: Vec::new(),
        }
    }

    /// Registry of a resource that has not produced links yet.
    pub(crate) fn empty() -> Self {
        Self::new(String::new(), None)
    }

    pub(crate) fn insert(&mut self, rel: String, collection: LinkCollection) {
        self.entries.push((rel, collection));
    }

    fn resolve_key(&self, key: &str) -> String {
        if key.contains(':') || is_iana_rel(key) {
            return key.to_owned();
        }
        match &self.default_curie {
            Some(curie) => format!("{curie}:{key}"),
            None => key.to_owned(),
        }
    }

    fn find(&self, key: &str) -> Result<&LinkCollection> {
        let resolved = self.resolve_key(key);
        self.entries
            .iter()
            .find(|(rel, _)| *rel == resolved)
            .map(|(_, collection)| collection)
            .ok_or_else(|| HalError::RelationNotFound {
                rel: resolved,
                uri: self.uri.clone(),
            })
    }

    /// The navigator for `key`; the first one when the relation is plural.
    pub fn get(&self, key: &str) -> Result<HalNavigator> {
        let collection = self.find(key)?;
        collection
            .first()
            .cloned()
            .ok_or_else(|| HalError::RelationNotFound {
                rel: self.resolve_key(key),
                uri: self.uri.clone(),
            })
    }

    /// Every navigator declared under `key`.
    pub fn get_all(&self, key: &str) -> Result<&LinkCollection> {
        self.find(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_ok()
    }

    /// Relation names in document order.
    pub fn rels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(rel, _)| rel.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
