//! halnav: lazy HAL hypermedia navigation for Rust.
//!
//! Point a [`HalNavigator`] at the root of a HAL API and walk the resource
//! graph by relation name instead of hand-building URLs:
//!
//! - **Lazy fetching**: a navigator performs its GET on the first read of
//!   `links()` or `state()`, and caches the snapshot afterwards.
//! - **Identity map**: within one navigation tree there is at most one live
//!   navigator per concrete URI, so two routes to the same resource share
//!   one fetch.
//! - **URI templates**: templated links become templated navigators that
//!   are expanded (fully or partially) into concrete ones.
//! - **Chained addressing**: [`HalNavigator::select`] resolves a whole
//!   path of relations plus template bindings in one call.
//!
//! # Quick Start
//!
//! ```no_run
//! use halnav::{AddressElem, HalNavigator};
//!
//! let api = HalNavigator::new("api.example.com")?;
//!
//! // Follow relations hop by hop...
//! let widgets = api.follow("ex:widgets")?;
//! println!("{:?}", widgets.state()?);
//!
//! // ...or resolve a whole chain, binding template variables at the end.
//! let order = api.select(&[
//!     AddressElem::rel("ex:orders"),
//!     AddressElem::bind("id", 42),
//! ])?;
//!
//! // Paginate over `next` links.
//! for page in widgets.pages() {
//!     let page = page?;
//!     println!("{}", page.name());
//! }
//! # Ok::<(), halnav::HalError>(())
//! ```
//!
//! The HTTP transport is pluggable through [`HalTransport`]; the default is
//! a blocking `reqwest` client. This crate issues GETs only and does not
//! traverse `_embedded` sub-resources.

pub mod core;

pub use crate::core::error::{HalError, Result};
pub use crate::core::navigator::{
    Address, AddressElem, HalNavigator, LinkCollection, LinkRegistry, NavigatorConfig, Pages,
    HAL_MEDIA_TYPE,
};
pub use crate::core::types::{HalDocument, HalResponse, LinkDescriptor};

pub use crate::core::client::{ClientConfig, NativeTransport};
pub use crate::core::traits::HalTransport;
