//! Async CRUD client core for the mahasiswa (student) REST API.
//!
//! # Overview
//! `ResourceClient` turns five logical operations (list, get by key,
//! create, update, remove) into HTTP requests against one base endpoint,
//! unwraps the server's `{data, message}` envelope, and classifies every
//! failure into a `ClientError` a view layer can map to a message.
//!
//! # Design
//! - `ResourceClient` is stateless: a base URL and a `Transport`, nothing
//!   else. No retries, no caching, one network call per operation.
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), so the I/O boundary is
//!   explicit and the classification logic is testable without a network.
//! - The client is generic over the record type; `Mahasiswa` is the typed
//!   student record and `Record` the untyped JSON object.
//! - DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
pub mod view;

pub use client::ResourceClient;
pub use config::ClientConfig;
pub use error::{ClientError, TransportError, GENERIC_FAILURE_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Alamat, Envelope, Mahasiswa, Record, RecordKey};
pub use view::{Notice, NoticeKind, ViewState};
