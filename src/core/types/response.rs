//! HTTP response as seen by the navigation core.

use bytes::Bytes;

/// A completed GET round trip: status code, reason phrase, body.
///
/// This is the entire contract between the navigation core and its
/// transport collaborator. Headers are deliberately absent: the core never
/// inspects them.
#[derive(Clone, Debug)]
pub struct HalResponse {
    pub status: u16,
    pub reason: String,
    pub body: Bytes,
}

impl HalResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<Bytes>) -> Self {
        HalResponse {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// Body as UTF-8, if it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
