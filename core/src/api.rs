//! Create, fetch and delete operations for organisation accounts.
//!
//! # Design
//! `AccountsApi` composes the three stages of every call: build the request
//! with `AccountClient`, execute it with the injected `Transport`, interpret
//! the response with `AccountClient::handle_response`. The first failing
//! stage ends the call and its error is returned as is.
//!
//! Each call is one attempt. There are no retries or idempotency keys; if a
//! call fails with `ClientError::Transport` the server may or may not have
//! applied it, and retry policy is up to the caller.

use tracing::debug;
use uuid::Uuid;

use crate::client::AccountClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpRequest, Operation};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Account, OperationResult};

/// Client for the organisation accounts resource.
///
/// Holds no mutable state, so a shared reference can be used from several
/// threads at once when the transport allows it.
pub struct AccountsApi<T = UreqTransport> {
    client: AccountClient,
    transport: T,
}

impl AccountsApi<UreqTransport> {
    /// Client executing requests with a `ureq` agent using `config.timeout`.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::from_config(config))
    }
}

impl<T: Transport> AccountsApi<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            client: AccountClient::from_config(config),
            transport,
        }
    }

    pub fn client(&self) -> &AccountClient {
        &self.client
    }

    /// Create `account`. Succeeds only on `201 Created`, returning the
    /// account as stored by the server.
    pub fn create(&self, account: &Account) -> Result<OperationResult, ClientError> {
        let request = self.client.build_create(account)?;
        self.dispatch(Operation::Create, request)
    }

    /// Fetch the account with `id`. Succeeds only on `200 OK`.
    pub fn fetch(&self, id: Uuid) -> Result<OperationResult, ClientError> {
        let request = self.client.build_fetch(id)?;
        self.dispatch(Operation::Fetch, request)
    }

    /// Delete version `version` of the account with `id`. Succeeds only on
    /// `204 No Content`; the result never has a body.
    pub fn delete(&self, id: Uuid, version: u64) -> Result<OperationResult, ClientError> {
        let request = self.client.build_delete(id, version)?;
        self.dispatch(Operation::Delete, request)
    }

    fn dispatch(
        &self,
        operation: Operation,
        request: HttpRequest,
    ) -> Result<OperationResult, ClientError> {
        let response = self.transport.execute(&request)?;
        let result = self.client.handle_response(operation, response)?;
        debug!(operation = operation.label(), status = %result.status, "operation succeeded");
        Ok(result)
    }
}
