//! Error type for the jsonstore client.
//!
//! # Design
//! Every failure of `get`, `save` and `delete` lands in `StoreError`. Variants
//! separate the failure modes so callers can match on them, but each carries
//! a plain message: transport and serde error types never cross the public
//! boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The key was rejected before any request was made.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Connection failure, TLS failure or timeout reported by the transport.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a JSON object.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response envelope had no `ok` marker, or it was not `true`.
    #[error("call to jsonstore failed: {0}")]
    NotOk(String),

    /// A `get` response carried no `result`, or a `null` one.
    #[error("response carried no value: {0}")]
    MissingResult(String),

    /// The value could not be serialized for `save`.
    #[error("encoding value failed: {0}")]
    Encode(String),

    /// The stored `result` could not be decoded into the requested type.
    #[error("decoding value failed: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
