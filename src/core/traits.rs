use crate::core::error::Result;
use crate::core::types::HalResponse;

/// Abstraction for the HTTP transport collaborator.
///
/// The navigation core issues exactly one kind of request: a blocking GET
/// against an absolute URI. Everything else about the transport (TLS,
/// timeouts, proxies, connection pooling) is the implementor's concern.
///
/// Tests swap in an in-memory implementation; production code uses
/// [`NativeTransport`](crate::core::client::NativeTransport).
pub trait HalTransport {
    /// Perform a blocking GET and return status, reason, and body.
    ///
    /// Non-2xx statuses are not errors at this layer: they are returned in
    /// the response for the caller to observe. Only failures to complete
    /// the round trip (connection errors, timeouts) are `Err`.
    fn get(&self, uri: &str) -> Result<HalResponse>;
}
