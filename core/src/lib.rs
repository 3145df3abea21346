//! Blocking client for the jsonstore.io key-value store.
//!
//! # Overview
//! A token selects a namespace on the store; `StoreClient` fetches, saves
//! and deletes serde values under string keys inside it, over plain
//! JSON-over-HTTP. Every failure surfaces as a `StoreError`.
//!
//! # Design
//! - `StoreClient` is immutable after construction: base URL, default
//!   timeout and a shared `Transport`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit and the
//!   request/response mapping is testable without a network.
//! - Values are double encoded (JSON text inside a JSON string), see `codec`.

pub mod client;
pub mod codec;
pub mod error;
pub mod http;
pub mod transport;

pub use client::{StoreClient, StoreClientBuilder, DEFAULT_HOST, DEFAULT_TIMEOUT};
pub use error::{Result, StoreError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
