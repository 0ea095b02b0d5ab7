//! Error types for HAL navigation.
//!
//! The [`Result`] type alias provides a convenient shorthand for operations
//! that may fail.
//!
//! # Error Categories
//!
//! | Category | Variants | Meaning |
//! |----------|----------|---------|
//! | Usage | `AmbiguousNavigation`, `NotExpandable`, `MalformedAddress` | caller misused the navigation API |
//! | Addressing | `UnsupportedScheme`, `DuplicateScheme`, `InvalidTemplate`, `Url` | an address or template cannot be resolved |
//! | Traversal | `RelationNotFound`, `EndOfSequence` | a link lookup missed or a sequence ran out |
//! | Transport | `Http`, `Io`, `Json` | the collaborator transport or body parse failed |
//!
//! Usage and traversal errors indicate a programming error or an exhausted
//! sequence, never a transient condition; nothing in this crate retries.
//! Transport failures are surfaced as-is from the transport collaborator.

use std::io;
use thiserror::Error;

/// Result type for HAL navigation operations.
pub type Result<T> = std::result::Result<T, HalError>;

/// Errors that can occur while navigating a HAL resource graph.
///
/// Each variant carries enough context (offending URI, element, or relation
/// name) to diagnose the failure without inspecting internals.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HalError {
    /// Fetch was attempted on a still-templated navigator.
    ///
    /// Template variables must be bound (via `expand`) before the resource
    /// has a concrete address that can be requested.
    #[error(
        "cannot fetch a templated navigator ({0}); \
         bind its template variables with expand() first"
    )]
    AmbiguousNavigation(String),

    /// Expansion was requested on a navigator that has no template.
    #[error("navigator for {0} is not templated and cannot be expanded")]
    NotExpandable(String),

    /// A chained address expression is structurally invalid.
    ///
    /// Raised before any network access, e.g. when a template binding is
    /// combined with the keep-templated continuation marker.
    #[error("malformed address: {0}")]
    MalformedAddress(String),

    /// The root address declares a scheme other than `http` or `https`.
    #[error("bad scheme: got {0}, expected http or https")]
    UnsupportedScheme(String),

    /// The root address contains more than one scheme separator.
    #[error("too many schemes in {0}")]
    DuplicateScheme(String),

    /// A link relation lookup missed, with curie rewriting already applied.
    #[error("no link relation {rel} on {uri}")]
    RelationNotFound {
        /// The relation name as looked up.
        rel: String,
        /// URI of the resource whose links were searched.
        uri: String,
    },

    /// Iteration via the `next` relation has no further page.
    #[error("no next link: end of sequence")]
    EndOfSequence,

    /// A URI template expression could not be parsed.
    #[error("invalid URI template: {0}")]
    InvalidTemplate(String),

    /// Transport-level HTTP failure, surfaced as-is.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Network I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The response body was not the JSON shape we expected.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An address could not be parsed or joined as a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl HalError {
    /// Check if this error indicates API misuse rather than an I/O failure.
    ///
    /// Usage errors are deterministic: retrying the same call can never
    /// succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// use halnav::HalError;
    ///
    /// assert!(HalError::EndOfSequence.is_usage_error());
    /// assert!(!HalError::Http("502 Bad Gateway".into()).is_usage_error());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            HalError::AmbiguousNavigation(_)
                | HalError::NotExpandable(_)
                | HalError::MalformedAddress(_)
                | HalError::UnsupportedScheme(_)
                | HalError::DuplicateScheme(_)
                | HalError::RelationNotFound { .. }
                | HalError::EndOfSequence
                | HalError::InvalidTemplate(_)
        )
    }
}
