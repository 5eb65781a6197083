use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

/// Stored account document. Attributes are kept as opaque JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountData {
    pub id: Uuid,
    pub organisation_id: Uuid,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub data: AccountData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error_message: String,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub version: Option<u64>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Account>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route(ACCOUNTS_PATH, post(create_account))
        .route(
            &format!("{ACCOUNTS_PATH}/{{id}}"),
            get(fetch_account).delete(delete_account),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error_message: message.into(),
    };
    (status, Json(body)).into_response()
}

async fn create_account(State(db): State<Db>, Json(input): Json<Account>) -> Response {
    if input.data.resource_type != "accounts" {
        return error(StatusCode::BAD_REQUEST, "type must be accounts");
    }
    let mut accounts = db.write().await;
    if accounts.contains_key(&input.data.id) {
        return error(
            StatusCode::CONFLICT,
            "Account cannot be created as it violates a duplicate constraint",
        );
    }
    let mut account = input;
    account.data.version = Some(0);
    accounts.insert(account.data.id, account.clone());
    info!(id = %account.data.id, "created account");
    (StatusCode::CREATED, Json(account)).into_response()
}

async fn fetch_account(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    let accounts = db.read().await;
    match accounts.get(&id) {
        Some(account) => Json(account.clone()).into_response(),
        None => error(
            StatusCode::NOT_FOUND,
            format!("record {id} does not exist"),
        ),
    }
}

async fn delete_account(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let Some(version) = params.version else {
        return error(StatusCode::BAD_REQUEST, "version is required");
    };
    let mut accounts = db.write().await;
    let Some(stored) = accounts.get(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if stored.data.version != Some(version) {
        return error(StatusCode::CONFLICT, "invalid version");
    }
    accounts.remove(&id);
    info!(%id, version, "deleted account");
    StatusCode::NO_CONTENT.into_response()
}
