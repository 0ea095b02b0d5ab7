//! The resource-proxy object model.

mod address;
mod collection;
mod identity;
mod proxy;
mod registry;

pub use address::{parse as parse_address, Address, AddressElem};
pub use collection::LinkCollection;
pub use proxy::{HalNavigator, NavigatorConfig, Pages, HAL_MEDIA_TYPE};
pub use registry::LinkRegistry;
