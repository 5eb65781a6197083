//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! builder produces `HttpRequest` values and the response handler consumes
//! `HttpResponse` values without touching the network; a `Transport`
//! implementation sits in between and performs the actual I/O.
//!
//! `Operation` is the closed set of verbs the accounts resource supports.
//! Its method and expected status code are explicit `match` arms rather than
//! positional lookups.

use std::fmt;

use crate::error::ClientError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the operations exposed by the accounts resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Fetch,
    Delete,
}

impl Operation {
    pub fn method(&self) -> HttpMethod {
        match self {
            Operation::Create => HttpMethod::Post,
            Operation::Fetch => HttpMethod::Get,
            Operation::Delete => HttpMethod::Delete,
        }
    }

    /// The only status code the API returns when this operation succeeds.
    pub fn expected_status(&self) -> u16 {
        match self {
            Operation::Create => 201,
            Operation::Fetch => 200,
            Operation::Delete => 204,
        }
    }

    /// Upper-case label used in status mismatch messages.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Fetch => "FETCH",
            Operation::Delete => "DELETE",
        }
    }
}

impl TryFrom<HttpMethod> for Operation {
    type Error = ClientError;

    fn try_from(method: HttpMethod) -> Result<Self, Self::Error> {
        match method {
            HttpMethod::Post => Ok(Operation::Create),
            HttpMethod::Get => Ok(Operation::Fetch),
            HttpMethod::Delete => Ok(Operation::Delete),
            other => Err(ClientError::UnhandledVerb(other)),
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `AccountClient::build_*` methods and executed by a `Transport`.
/// `path` is the absolute URL, query string included.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// `status_text` carries the status line as reported by the transport, for
/// example `"201 Created"`. The body has already been read to the end.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
