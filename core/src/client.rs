//! Stateless HTTP request builder and response handler for the accounts API.
//!
//! # Design
//! `AccountClient` holds only the configured host and API version and carries
//! no mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and `handle_response`, which turns
//! an `HttpResponse` into an `OperationResult` or a `ClientError`. Executing
//! the round trip is left to a `Transport`, keeping this module
//! deterministic and free of I/O.
//!
//! Response handling is two-tier. A status outside `[200, 400)` is an error
//! whatever the verb. Inside that range the status must still be the exact
//! one the operation expects (201, 200 or 204), otherwise the response is an
//! error too.

use chrono::{SecondsFormat, Utc};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError};
use crate::http::{HttpRequest, HttpResponse, Operation};
use crate::types::{Account, OperationResult};

pub const ACCOUNTS_ENDPOINT: &str = "organisation/accounts";
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Builds requests for, and interprets responses from, the accounts resource.
#[derive(Debug, Clone)]
pub struct AccountClient {
    host: String,
    api_version: String,
}

impl AccountClient {
    pub fn new(host: &str, api_version: &str) -> Self {
        Self {
            host: host.to_string(),
            api_version: api_version.to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.host, &config.api_version)
    }

    pub fn build_create(&self, account: &Account) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(account).map_err(ClientError::Encode)?;
        let mut req = self.build_request(Operation::Create, None, None)?;
        req.headers
            .push(("Content-Type".to_string(), JSON_API_MEDIA_TYPE.to_string()));
        req.headers
            .push(("Content-Length".to_string(), body.len().to_string()));
        req.body = Some(body);
        Ok(req)
    }

    pub fn build_fetch(&self, id: Uuid) -> Result<HttpRequest, ClientError> {
        self.build_request(Operation::Fetch, Some(id), None)
    }

    pub fn build_delete(&self, id: Uuid, version: u64) -> Result<HttpRequest, ClientError> {
        self.build_request(Operation::Delete, Some(id), Some(version))
    }

    /// Interpret `response` as the answer to `operation`.
    pub fn handle_response(
        &self,
        operation: Operation,
        response: HttpResponse,
    ) -> Result<OperationResult, ClientError> {
        debug!(
            operation = operation.label(),
            status = response.status,
            "handling response"
        );

        if !is_success_range(response.status) {
            let message = format!(
                "GOT ERROR STATUS CODE OF {}, STATUS {}",
                response.status, response.status_text
            );
            return Err(api_error(response, message).into());
        }

        let expected = operation.expected_status();
        if response.status != expected {
            let message = format!(
                "{} OPERATION GOT INCORRECT STATUS CODE. EXPECTED: {expected}, GOT: {}",
                operation.label(),
                response.status
            );
            return Err(api_error(response, message).into());
        }

        let body = match operation {
            Operation::Create | Operation::Fetch => {
                let account: Account =
                    serde_json::from_str(&response.body).map_err(ClientError::Decode)?;
                Some(account)
            }
            Operation::Delete => None,
        };
        Ok(OperationResult::from_response(&response, body))
    }

    fn build_request(
        &self,
        operation: Operation,
        id: Option<Uuid>,
        version: Option<u64>,
    ) -> Result<HttpRequest, ClientError> {
        let mut url = Url::parse(&self.endpoint(id))?;
        if let Some(version) = version {
            url.query_pairs_mut()
                .append_pair("version", &version.to_string());
        }

        Ok(HttpRequest {
            method: operation.method(),
            path: url.into(),
            headers: vec![
                ("Host".to_string(), self.host.clone()),
                (
                    "Date".to_string(),
                    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
                ),
                ("Accept".to_string(), JSON_API_MEDIA_TYPE.to_string()),
            ],
            body: None,
        })
    }

    fn endpoint(&self, id: Option<Uuid>) -> String {
        let base = format!("{}{}{ACCOUNTS_ENDPOINT}", self.host, self.api_version);
        match id {
            Some(id) => format!("{base}/{id}"),
            None => base,
        }
    }
}

fn is_success_range(status: u16) -> bool {
    (200..400).contains(&status)
}

fn api_error(response: HttpResponse, message: String) -> ApiError {
    ApiError {
        status_code: response.status,
        status: response.status_text,
        response_body: response.body,
        message,
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::http::HttpMethod;
    use crate::types::{AccountAttributes, AccountData};

    const ACCOUNT_ID: &str = "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc";
    const ORGANISATION_ID: &str = "eb0bd6f5-c3f5-44b2-b677-acd23cdde73c";
    const ACCOUNT_BODY: &str = r#"{"data":{"id":"ad27e265-9605-4b4b-a0e5-3003ea9cc4dc","organisation_id":"eb0bd6f5-c3f5-44b2-b677-acd23cdde73c","type":"accounts","version":0,"attributes":{"country":"GB"}}}"#;

    fn client() -> AccountClient {
        AccountClient::new("http://localhost:8080/", "v1/")
    }

    fn response(status: u16, status_text: &str, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: status_text.to_string(),
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn account(id: Option<Uuid>) -> Account {
        Account::new(AccountData {
            id,
            organisation_id: Some(ORGANISATION_ID.parse().unwrap()),
            attributes: Some(AccountAttributes {
                country: Some("GB".to_string()),
                base_currency: Some("GBP".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn expect_api_error(result: Result<OperationResult, ClientError>) -> ApiError {
        match result {
            Err(ClientError::Api(err)) => err,
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn build_create_without_id_targets_collection() {
        let input = account(None);
        let req = client().build_create(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/v1/organisation/accounts");
        let body = req.body.as_deref().unwrap();
        assert_eq!(body, serde_json::to_string(&input).unwrap());
        assert_eq!(req.header("Content-Type"), Some("application/vnd.api+json"));
        assert_eq!(req.header("Content-Length"), Some(body.len().to_string().as_str()));
    }

    #[test]
    fn build_create_with_id_still_targets_collection() {
        let req = client()
            .build_create(&account(Some(ACCOUNT_ID.parse().unwrap())))
            .unwrap();
        assert_eq!(req.path, "http://localhost:8080/v1/organisation/accounts");
    }

    #[test]
    fn build_fetch_produces_correct_request() {
        let req = client().build_fetch(ACCOUNT_ID.parse().unwrap()).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            format!("http://localhost:8080/v1/organisation/accounts/{ACCOUNT_ID}")
        );
        assert!(req.body.is_none());
        assert_eq!(req.header("Content-Type"), None);
    }

    #[test]
    fn build_delete_appends_version() {
        let id: Uuid = ACCOUNT_ID.parse().unwrap();
        let req = client().build_delete(id, 0).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(
            req.path,
            format!("http://localhost:8080/v1/organisation/accounts/{id}?version=0")
        );
        assert!(req.body.is_none());

        let req = client().build_delete(id, 12).unwrap();
        assert!(req.path.ends_with("?version=12"));
    }

    #[test]
    fn common_headers_are_set() {
        let req = client().build_fetch(Uuid::nil()).unwrap();
        assert_eq!(req.header("Host"), Some("http://localhost:8080/"));
        assert_eq!(req.header("Accept"), Some("application/vnd.api+json"));
        let date = req.header("Date").unwrap();
        assert!(DateTime::parse_from_rfc3339(date).is_ok(), "bad date {date}");
    }

    #[test]
    fn malformed_host_is_a_construction_error() {
        let client = AccountClient::new("not a host/", "v1/");
        let err = client.build_fetch(Uuid::nil()).unwrap_err();
        assert!(matches!(err, ClientError::RequestConstruction(_)));

        let err = client.build_create(&account(None)).unwrap_err();
        assert!(matches!(err, ClientError::RequestConstruction(_)));
    }

    #[test]
    fn create_201_decodes_account() {
        let result = client()
            .handle_response(Operation::Create, response(201, "201 Created", ACCOUNT_BODY))
            .unwrap();
        assert_eq!(result.status_code, 201);
        assert_eq!(result.status, "201 Created");
        let data = result.body.unwrap().data.unwrap();
        assert_eq!(data.id, Some(ACCOUNT_ID.parse().unwrap()));
        assert_eq!(data.version, Some(0));
    }

    #[test]
    fn create_200_is_incorrect_status() {
        let err = expect_api_error(
            client().handle_response(Operation::Create, response(200, "200 OK", ACCOUNT_BODY)),
        );
        assert_eq!(err.status_code, 200);
        assert_eq!(
            err.message,
            "CREATE OPERATION GOT INCORRECT STATUS CODE. EXPECTED: 201, GOT: 200"
        );
        assert_eq!(err.response_body, ACCOUNT_BODY);
    }

    #[test]
    fn create_201_with_malformed_body_is_decode_error() {
        let err = client()
            .handle_response(Operation::Create, response(201, "201 Created", "{not json"))
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn fetch_200_decodes_account() {
        let result = client()
            .handle_response(Operation::Fetch, response(200, "200 OK", ACCOUNT_BODY))
            .unwrap();
        assert_eq!(result.status_code, 200);
        assert!(result.body.is_some());
    }

    #[test]
    fn fetch_201_is_incorrect_status() {
        let err = expect_api_error(
            client().handle_response(Operation::Fetch, response(201, "201 Created", ACCOUNT_BODY)),
        );
        assert!(err.message.contains("EXPECTED: 200, GOT: 201"));
        assert!(err.message.starts_with("FETCH OPERATION"));
    }

    #[test]
    fn delete_204_has_no_body() {
        let result = client()
            .handle_response(Operation::Delete, response(204, "204 No Content", "ignored"))
            .unwrap();
        assert_eq!(result.status_code, 204);
        assert!(result.body.is_none());
    }

    #[test]
    fn delete_200_is_incorrect_status() {
        let err = expect_api_error(
            client().handle_response(Operation::Delete, response(200, "200 OK", "")),
        );
        assert_eq!(
            err.message,
            "DELETE OPERATION GOT INCORRECT STATUS CODE. EXPECTED: 204, GOT: 200"
        );
    }

    #[test]
    fn delete_404_reports_error_status() {
        let body = r#"{"error_message":"record does not exist"}"#;
        let err = expect_api_error(
            client().handle_response(Operation::Delete, response(404, "404 Not Found", body)),
        );
        assert_eq!(err.status_code, 404);
        assert_eq!(err.message, "GOT ERROR STATUS CODE OF 404, STATUS 404 Not Found");
        assert_eq!(err.response_body, body);
    }

    #[test]
    fn error_range_never_decodes_for_any_operation() {
        for op in [Operation::Create, Operation::Fetch, Operation::Delete] {
            for status in [100, 199, 400, 409, 500, 503] {
                let err = expect_api_error(
                    client().handle_response(op, response(status, "", ACCOUNT_BODY)),
                );
                assert_eq!(err.status_code, status, "{op:?}");
                assert!(err.message.starts_with("GOT ERROR STATUS CODE OF"), "{op:?}");
            }
        }
    }

    #[test]
    fn redirect_range_is_success_range_but_wrong_status() {
        let err = expect_api_error(
            client().handle_response(Operation::Fetch, response(304, "304 Not Modified", "")),
        );
        assert!(err.message.contains("INCORRECT STATUS CODE"));
    }
}
