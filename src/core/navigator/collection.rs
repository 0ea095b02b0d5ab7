//! Ordered link collections with metadata lookup.

use std::collections::BTreeMap;
use std::ops::Index;

use serde_json::{Map, Value};

use crate::core::error::{HalError, Result};
use crate::core::navigator::proxy::HalNavigator;
use crate::core::utils::canonical_text;

/// The navigators of one plural link relation, in document order, plus a
/// multi-map index over the metadata recorded at insertion time.
///
/// HAL link objects may carry arbitrary extra members (`name`, `title`,
/// `hreflang`, ...); each one is indexed under its canonical textual form
/// so callers can select entries by metadata that is not natively
/// comparable. Removal is not supported: collections are rebuilt on every
/// fetch, never edited.
#[derive(Clone, Debug)]
pub struct LinkCollection {
    rel: String,
    uri: String,
    items: Vec<HalNavigator>,
    index: BTreeMap<String, BTreeMap<String, Vec<usize>>>,
}

impl LinkCollection {
    pub(crate) fn new(rel: impl Into<String>, uri: impl Into<String>) -> Self {
        LinkCollection {
            rel: rel.into(),
            uri: uri.into(),
            items: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Append a navigator, indexing it under every given property.
    pub(crate) fn push_with(&mut self, nav: HalNavigator, properties: &Map<String, Value>) {
        let position = self.items.len();
        for (prop, value) in properties {
            self.index
                .entry(prop.clone())
                .or_default()
                .entry(canonical_text(value))
                .or_default()
                .push(position);
        }
        self.items.push(nav);
    }

    /// First entry whose recorded `prop` equals `value`, if any.
    pub fn get_by(&self, prop: &str, value: impl Into<Value>) -> Option<&HalNavigator> {
        let key = canonical_text(&value.into());
        let positions = self.index.get(prop)?.get(&key)?;
        positions.first().map(|&i| &self.items[i])
    }

    /// Like [`get_by`](Self::get_by), but a miss is an explicit failure.
    pub fn try_get_by(&self, prop: &str, value: impl Into<Value>) -> Result<&HalNavigator> {
        let value = value.into();
        let key = canonical_text(&value);
        self.get_by(prop, value)
            .ok_or_else(|| HalError::RelationNotFound {
                rel: format!("{}[{}={}]", self.rel, prop, key),
                uri: self.uri.clone(),
            })
    }

    /// Every entry whose recorded `prop` equals `value`, as independent
    /// handles.
    pub fn get_all_by(&self, prop: &str, value: impl Into<Value>) -> Vec<HalNavigator> {
        let key = canonical_text(&value.into());
        self.index
            .get(prop)
            .and_then(|by_value| by_value.get(&key))
            .map(|positions| positions.iter().map(|&i| self.items[i].clone()).collect())
            .unwrap_or_default()
    }

    /// Shorthand for `get_by("name", ...)`.
    pub fn named(&self, name: &str) -> Option<&HalNavigator> {
        self.get_by("name", name)
    }

    pub fn first(&self) -> Option<&HalNavigator> {
        self.items.first()
    }

    pub fn get(&self, index: usize) -> Option<&HalNavigator> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HalNavigator> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Index<usize> for LinkCollection {
    type Output = HalNavigator;

    fn index(&self, index: usize) -> &HalNavigator {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a LinkCollection {
    type Item = &'a HalNavigator;
    type IntoIter = std::slice::Iter<'a, HalNavigator>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
