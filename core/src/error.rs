//! Error types for the accounts API client.
//!
//! # Design
//! `ApiError` covers every case where the server answered but the outcome is
//! not the success expected for the operation: an error-range status and a
//! success-range status that is wrong for the verb share the same type and
//! differ only in `message`. Callers that need to branch should inspect
//! `status_code`. Everything else (bad input, network, decoding) gets its own
//! `ClientError` variant.

use serde::Serialize;

use crate::http::HttpMethod;

/// Structured error for a response whose status does not match the
/// operation's expected outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error(
    "ACCOUNT API ERROR\nSTATUS CODE : {status_code}\nSTATUS : {status}\nRESPONSE BODY : {response_body}\nMESSAGE : {message}"
)]
pub struct ApiError {
    pub status_code: u16,
    pub status: String,
    pub response_body: String,
    pub message: String,
}

/// Errors returned by `AccountsApi` operations and their building blocks.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request URL could not be built from the configured host and API version.
    #[error("could not construct request: {0}")]
    RequestConstruction(#[from] url::ParseError),

    /// The account could not be serialized to JSON.
    #[error("could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Network failure or timeout while executing the request.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body could not be read to the end.
    #[error("could not read response body: {0}")]
    BodyRead(String),

    /// The server responded, but not with the expected status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A success-range response body was not a valid account document.
    #[error("could not decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("unhandled HTTP verb {0}")]
    UnhandledVerb(HttpMethod),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status code carried by an `Api` error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api(err) => Some(err.status_code),
            _ => None,
        }
    }
}
