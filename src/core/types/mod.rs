//! Core data types for HAL navigation.

mod document;
mod link;
mod response;

pub use bytes::Bytes;
pub use document::{HalDocument, EMBEDDED_SECTION, LINKS_SECTION, SELF_REL};
pub use link::{LinkDescriptor, RawLink};
pub use response::HalResponse;
