//! Chained-address expressions.
//!
//! An address is an ordered slice of [`AddressElem`] values: relation names
//! to follow hop by hop, template bindings to apply to the final hop, and
//! an optional continuation marker requesting that the result stay
//! templated. Parsing is pure; nothing here touches the network.

use serde_json::{Map, Value};

use crate::core::error::{HalError, Result};

/// One element of a chained address expression.
#[derive(Clone, Debug, PartialEq)]
pub enum AddressElem {
    /// Follow one link relation.
    Rel(String),
    /// Bind one template argument on the final navigator in the chain.
    Binding(String, Value),
    /// Keep the result templated so it can be expanded further.
    KeepTemplated,
}

impl AddressElem {
    pub fn rel(name: impl Into<String>) -> Self {
        AddressElem::Rel(name.into())
    }

    pub fn bind(key: impl Into<String>, value: impl Into<Value>) -> Self {
        AddressElem::Binding(key.into(), value.into())
    }
}

impl From<&str> for AddressElem {
    fn from(rel: &str) -> Self {
        AddressElem::Rel(rel.to_owned())
    }
}

/// A parsed address: relation path plus expansion instructions.
#[derive(Debug, Default)]
pub struct Address {
    pub rels: Vec<String>,
    pub args: Map<String, Value>,
    pub has_binding: bool,
    pub keep_templated: bool,
}

impl Address {
    /// Whether the final navigator needs template expansion at all.
    pub fn wants_expansion(&self) -> bool {
        self.has_binding || self.keep_templated
    }
}

/// Decompose an address expression.
///
/// Fails with [`HalError::MalformedAddress`] when a template binding is
/// combined with the continuation marker: a binding commits a concrete
/// choice while the marker asks for the template to stay open, and the two
/// requests contradict each other.
pub fn parse(elems: &[AddressElem]) -> Result<Address> {
    let mut address = Address::default();
    for elem in elems {
        match elem {
            AddressElem::Rel(rel) => address.rels.push(rel.clone()),
            AddressElem::Binding(key, value) => {
                address.has_binding = true;
                address.args.insert(key.clone(), value.clone());
            }
            AddressElem::KeepTemplated => address.keep_templated = true,
        }
    }
    if address.has_binding && address.keep_templated {
        return Err(HalError::MalformedAddress(
            "a template binding cannot be combined with the keep-templated marker".into(),
        ));
    }
    Ok(address)
}
