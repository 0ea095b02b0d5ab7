//! Link descriptors from the reserved `_links` section.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::error::{HalError, Result};

/// One link object as declared by a resource.
///
/// Transient: descriptors are consumed during fetch to derive child
/// navigators and are not retained afterwards.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LinkDescriptor {
    pub href: String,
    #[serde(default)]
    pub templated: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A descriptor together with the raw link object it was parsed from.
///
/// The raw properties feed the metadata index of a
/// [`LinkCollection`](crate::core::navigator::LinkCollection): HAL allows
/// arbitrary extra members on link objects and callers select plural links
/// by any of them.
#[derive(Clone, Debug)]
pub struct RawLink {
    pub descriptor: LinkDescriptor,
    pub properties: Map<String, Value>,
}

impl RawLink {
    /// Parse a single link object.
    pub fn from_value(rel: &str, value: &Value) -> Result<Self> {
        let properties = match value {
            Value::Object(map) => map.clone(),
            other => {
                return Err(HalError::Json(serde::de::Error::custom(format!(
                    "link {rel} is not an object: {other}"
                ))))
            }
        };
        let descriptor = serde_json::from_value(value.clone())?;
        Ok(RawLink {
            descriptor,
            properties,
        })
    }
}
