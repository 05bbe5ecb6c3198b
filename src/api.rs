//! JSON-RPC 2.0 HTTP endpoint for the AIN node
//!
//! Decodes the envelope (single request or batch), hands `(method, params)`
//! to the [`MethodRegistry`] and wraps the result. Collaborators may block, so
//! each dispatch runs on tokio's blocking pool.

use axum::{
    body::Bytes,
    extract::{Request, State},
    http,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::RpcError;
use crate::methods::MethodRegistry;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Exactly one of `result` or `error` is present. A successful call whose
/// result is `null` still carries `"result": null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(JsonRpcError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub id: Value,
}

impl JsonRpcResponse {
    pub fn new(id: Value, outcome: Result<Value, RpcError>) -> Self {
        let outcome = match outcome {
            Ok(result) => Outcome::Result(result),
            Err(e) => Outcome::Error(JsonRpcError {
                code: e.code(),
                message: e.to_string(),
            }),
        };
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            outcome,
            id,
        }
    }
}

/// Shared state of the HTTP layer.
pub struct RpcNode {
    pub registry: Arc<MethodRegistry>,
    started: Instant,
}

impl RpcNode {
    pub fn new(registry: Arc<MethodRegistry>) -> Self {
        Self {
            registry,
            started: Instant::now(),
        }
    }

    /// Decode and execute one envelope element.
    async fn execute(&self, raw: Value) -> JsonRpcResponse {
        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(e) => {
                return JsonRpcResponse::new(Value::Null, Err(RpcError::InvalidRequest(e.to_string())))
            }
        };

        if request.jsonrpc.as_deref().is_some_and(|v| v != JSONRPC_VERSION) {
            return JsonRpcResponse::new(
                request.id,
                Err(RpcError::InvalidRequest(
                    "unsupported jsonrpc version".to_string(),
                )),
            );
        }

        let registry = self.registry.clone();
        let JsonRpcRequest { method, params, id, .. } = request;
        let outcome = tokio::task::spawn_blocking(move || registry.dispatch(&method, params.as_ref()))
            .await
            .map_err(|e| RpcError::Internal(e.to_string()))
            .and_then(|result| result);

        JsonRpcResponse::new(id, outcome)
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Logs method, path, status and duration of every HTTP request.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "rpc.request"
    );

    response
}

// ============================================================================
// Server
// ============================================================================

/// Build the JSON-RPC router (also used by the tests).
pub fn build_rpc_router(node: Arc<RpcNode>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(vec![http::header::CONTENT_TYPE]);

    Router::new()
        .route("/", post(handle_rpc))
        .route("/json-rpc", post(handle_rpc))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(node)
        .layer(cors)
}

/// Serve the JSON-RPC endpoint on `addr` until the process exits.
pub async fn run_rpc_server(node: Arc<RpcNode>, addr: SocketAddr) -> Result<(), RpcError> {
    let methods = node.registry.len();
    let app = build_rpc_router(node);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, methods, "JSON-RPC server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn handle_rpc(State(node): State<Arc<RpcNode>>, body: Bytes) -> Response {
    let envelope: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return Json(JsonRpcResponse::new(Value::Null, Err(RpcError::Parse(e.to_string()))))
                .into_response()
        }
    };

    match envelope {
        Value::Array(batch) if batch.is_empty() => Json(JsonRpcResponse::new(
            Value::Null,
            Err(RpcError::InvalidRequest("empty batch".to_string())),
        ))
        .into_response(),
        Value::Array(batch) => {
            let mut responses = Vec::with_capacity(batch.len());
            for raw in batch {
                responses.push(node.execute(raw).await);
            }
            Json(responses).into_response()
        }
        single => Json(node.execute(single).await).into_response(),
    }
}

async fn health_check(State(node): State<Arc<RpcNode>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "methods": node.registry.len(),
        "uptime_seconds": node.started.elapsed().as_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
