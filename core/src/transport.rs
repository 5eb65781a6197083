//! Executes built requests over the network.
//!
//! # Design
//! `Transport` is the single seam between the deterministic client core and
//! real I/O. `AccountsApi` takes any implementation at construction, so tests
//! swap in stubs without touching global state.
//!
//! `UreqTransport` owns one `ureq::Agent` shared by every call. The agent is
//! configured with a global timeout and with status-as-error disabled, so
//! 4xx/5xx responses come back as data and status interpretation stays in the
//! response handler. A call that times out may still have been applied by
//! the server; the transport cannot tell.

use std::time::Duration;

use tracing::{debug, warn};
use ureq::typestate::WithBody;
use ureq::{Agent, Body, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one `HttpRequest` and returns the raw response.
///
/// Implementations must read the body to the end before returning and must
/// not interpret the status code.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.timeout)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        debug!(method = %request.method, url = %request.path, "sending request");

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&request.path), request).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&request.path), request).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&request.path), request), request),
            HttpMethod::Put => send(with_headers(self.agent.put(&request.path), request), request),
        };

        let mut response = result.map_err(|e| {
            warn!(method = %request.method, url = %request.path, error = %e, "request failed");
            ClientError::Transport(e.to_string())
        })?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (key.as_str().to_string(), value.to_string()))
            })
            .collect();
        // Only I/O failures count as read errors. The body is text for the
        // handler, so invalid UTF-8 is replaced rather than rejected.
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ClientError::BodyRead(e.to_string()))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status_line(status.as_u16(), status.canonical_reason()),
            headers,
            body,
        })
    }
}

/// Apply the built headers to `builder`. `Host` and `Content-Length` are
/// left to the agent, which derives them from the URL authority and the body.
fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (key, value) in &request.headers {
        if key.eq_ignore_ascii_case("host") || key.eq_ignore_ascii_case("content-length") {
            continue;
        }
        builder = builder.header(key, value);
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    request: &HttpRequest,
) -> Result<ureq::http::Response<Body>, ureq::Error> {
    match &request.body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

/// `"201 Created"`-style status text, or just the code for unknown statuses.
fn status_line(code: u16, reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!("{code} {reason}"),
        None => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_includes_reason_when_known() {
        assert_eq!(status_line(201, Some("Created")), "201 Created");
        assert_eq!(status_line(299, None), "299");
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let transport = UreqTransport::new(Duration::from_millis(500));
        let request = HttpRequest {
            method: HttpMethod::Get,
            path: "http://127.0.0.1:1/v1/organisation/accounts".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let err = transport.execute(&request).unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
