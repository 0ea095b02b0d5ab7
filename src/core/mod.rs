//! HAL navigation core.

pub mod client;
pub mod error;
pub mod navigator;
pub mod template;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::{HalError, Result};
pub use navigator::{Address, AddressElem, HalNavigator, LinkCollection, LinkRegistry};
pub use types::{HalDocument, HalResponse, LinkDescriptor};

pub use client::{ClientConfig, NativeTransport};
pub use traits::HalTransport;
