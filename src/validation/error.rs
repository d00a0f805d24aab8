//! Error types for order validation.

use thiserror::Error;

/// Why an inbound payload could not become an [`Order`](crate::model::Order).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RejectReason {
    /// Not UTF-8, not JSON, or not a JSON object.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The field is absent or carries a falsy value (`null`, `false`, `0`, `""`, `[]`, `{}`).
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// `table` is not a positive integer, or `food` is not a string.
    #[error("Wrong type for field: {0}")]
    WrongType(&'static str),

    /// `food` is only whitespace.
    #[error("Food must be a non-empty string")]
    EmptyFood,
}
