//! Client for the organisation accounts resource of a JSON:API style
//! banking API.
//!
//! # Overview
//! Three operations, create, fetch and delete, each performing exactly one
//! HTTP round trip. `AccountsApi` is the entry point; it builds a request,
//! hands it to a `Transport`, and turns the response into an
//! `OperationResult` or a `ClientError`.
//!
//! # Design
//! - `AccountClient` is stateless: it holds only the configured host and API
//!   version and does no I/O, so request building and response handling are
//!   deterministic and testable in isolation.
//! - `Transport` is the I/O seam. `UreqTransport` is the default; tests
//!   inject stubs.
//! - Success depends on the exact status code the operation expects, not just
//!   on the 2xx/3xx range.
//! - Configuration lives in a `ClientConfig` owned by each client instance.
//!   There are no process-wide settings.
//!
//! ```no_run
//! use accounts_core::{AccountsApi, ClientConfig};
//! use uuid::Uuid;
//!
//! let api = AccountsApi::new(&ClientConfig::new("http://localhost:8080/"));
//! match api.fetch(Uuid::new_v4()) {
//!     Ok(result) => println!("{:?}", result.body),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::AccountsApi;
pub use client::AccountClient;
pub use config::ClientConfig;
pub use error::{ApiError, ClientError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Operation};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Account, AccountAttributes, AccountData, Actor, OperationResult, OrganisationIdentification,
    PrivateIdentification, RelationshipLinks, Relationships, ResourceLink, ResourceType,
    UserDefinedData,
};
