//! In-memory stand-in for the jsonstore.io backend.
//!
//! Values are kept per token as raw JSON, exactly as posted. A missing key
//! reads back as `{"ok": true, "result": null}`, matching the public service.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Envelope for writes and deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

/// Envelope for reads. `result` is `null` when nothing is stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct Fetched {
    pub ok: bool,
    pub result: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
}

/// token -> key -> stored value
pub type Db = Arc<RwLock<HashMap<String, HashMap<String, Value>>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/get-token", get(issue_token))
        .route(
            "/{token}/{*key}",
            get(read_value)
                .post(write_value)
                .put(write_value)
                .delete(delete_value),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Tokens are 64 hex characters, like the ones the public service handed out.
async fn issue_token() -> Json<IssuedToken> {
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    Json(IssuedToken { token })
}

async fn read_value(
    State(db): State<Db>,
    Path((token, key)): Path<(String, String)>,
) -> Json<Fetched> {
    let db = db.read().await;
    let result = db
        .get(&token)
        .and_then(|values| values.get(&key))
        .cloned()
        .unwrap_or(Value::Null);
    Json(Fetched { ok: true, result })
}

async fn write_value(
    State(db): State<Db>,
    Path((token, key)): Path<(String, String)>,
    Json(value): Json<Value>,
) -> (StatusCode, Json<Ack>) {
    tracing::debug!(%token, %key, "storing value");
    db.write().await.entry(token).or_default().insert(key, value);
    (StatusCode::CREATED, Json(Ack { ok: true }))
}

async fn delete_value(
    State(db): State<Db>,
    Path((token, key)): Path<(String, String)>,
) -> Json<Ack> {
    if let Some(values) = db.write().await.get_mut(&token) {
        values.remove(&key);
    }
    Json(Ack { ok: true })
}
