//! Inbound JSON-RPC transport over HTTP

use crate::bundle::SendPuissantArgs;
use crate::error::Result;
use crate::relay::Relay;
use crate::report::PackingReport;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;

const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const SERVER_ERROR: i64 = -32000;

/// Inbound JSON-RPC request envelope.
#[derive(Debug, Deserialize)]
struct RpcCall {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

/// Outbound JSON-RPC response envelope.
#[derive(Debug, Serialize)]
struct RpcReply {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Serialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl RpcReply {
    fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i64, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcErrorBody { code, message }),
        }
    }
}

#[derive(Clone)]
struct AppState {
    relay: Arc<Relay>,
    cancel: CancellationToken,
}

/// Build the relay's HTTP router: one JSON-RPC endpoint at `/`, wrapped in
/// panic recovery, gzip compression and a global concurrency limit.
pub fn router(relay: Arc<Relay>, cancel: CancellationToken, concurrency: usize) -> Router {
    Router::new()
        .route("/", post(handle_rpc))
        .layer(GlobalConcurrencyLimitLayer::new(concurrency))
        .layer(CatchPanicLayer::new())
        .layer(CompressionLayer::new())
        .with_state(AppState { relay, cancel })
}

/// Bind and serve until the process-wide token is cancelled.
pub async fn serve(
    listen_addr: &str,
    concurrency: usize,
    relay: Arc<Relay>,
    cancel: CancellationToken,
) -> Result<()> {
    let app = router(relay, cancel.clone(), concurrency);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = listen_addr, "relay rpc server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    Ok(())
}

async fn handle_rpc(State(state): State<AppState>, Json(body): Json<Value>) -> Json<RpcReply> {
    let call: RpcCall = match serde_json::from_value(body) {
        Ok(call) => call,
        Err(e) => {
            return Json(RpcReply::error(
                Value::Null,
                INVALID_REQUEST,
                format!("invalid request: {e}"),
            ))
        }
    };

    let id = call.id.clone();
    match dispatch(&state, call).await {
        Ok(result) => Json(RpcReply::result(id, result)),
        Err((code, message)) => Json(RpcReply::error(id, code, message)),
    }
}

async fn dispatch(state: &AppState, call: RpcCall) -> std::result::Result<Value, (i64, String)> {
    match call.method.as_str() {
        "eth_sendPuissant" => {
            let (args,): (SendPuissantArgs,) = parse_params(call.params)?;
            state
                .relay
                .send_puissant(&state.cancel, args)
                .await
                .map_err(|e| (SERVER_ERROR, e.to_string()))?;
            Ok(Value::Null)
        }
        "eth_reportPuissant" => {
            let (report,): (PackingReport,) = parse_params(call.params)?;
            state
                .relay
                .report_puissant(report)
                .await
                .map_err(|e| (SERVER_ERROR, e.to_string()))?;
            Ok(Value::Null)
        }
        other => Err((
            METHOD_NOT_FOUND,
            format!("the method {other} does not exist/is not available"),
        )),
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> std::result::Result<T, (i64, String)> {
    serde_json::from_value(params).map_err(|e| (INVALID_PARAMS, format!("invalid params: {e}")))
}
