//! JSON-RPC wire types and the HTTP transport

use crate::error::{Result, RpcError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: Value,
}

impl Request {
    pub fn new(method: &'static str) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 1,
            method,
            params: Value::Array(Vec::new()),
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }
}

/// A JSON-RPC response with `result` and `error` left undecoded, so callers
/// can apply method-specific handling to either.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// A structured JSON-RPC fault object.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

/// The outbound transport capability: send a typed request to a URL, get a
/// typed response or a transport error. Everything above this seam is
/// transport-agnostic; tests substitute a mock.
#[async_trait]
pub trait JsonRpcClient: Send + Sync {
    async fn call(&self, url: &str, req: Request) -> Result<RawResponse>;
}

/// reqwest-backed [`JsonRpcClient`] with a connection pool shared across all
/// validators.
pub struct HttpClient {
    http: reqwest::Client,
}

impl HttpClient {
    /// Build a pooled client. Upstream validators sit behind self-signed
    /// certificates, so TLS verification is disabled.
    pub fn new(max_idle_conns_per_host: usize) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(1))
            .tcp_keepalive(Duration::from_secs(60))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(max_idle_conns_per_host)
            .timeout(Duration::from_secs(360))
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(RpcError::Http)?;

        Ok(Self { http })
    }
}

#[async_trait]
impl JsonRpcClient for HttpClient {
    async fn call(&self, url: &str, req: Request) -> Result<RawResponse> {
        let method = req.method;

        let resp = match self.http.post(url).json(&req).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(method, url, error = %e, "fail to do json rpc call");
                return Err(RpcError::CallFailed {
                    method: method.to_string(),
                    url: url.to_string(),
                }
                .into());
            }
        };

        let status = resp.status();
        if !status.is_success() {
            tracing::error!(method, url, code = status.as_u16(), "fail to do json rpc call");
            return Err(RpcError::HttpStatus {
                method: method.to_string(),
                url: url.to_string(),
                code: status.as_u16(),
            }
            .into());
        }

        match resp.json::<RawResponse>().await {
            Ok(raw) => Ok(raw),
            Err(e) => {
                tracing::error!(method, url, error = %e, "fail to unmarshal json rpc resp body");
                Err(RpcError::Http(e).into())
            }
        }
    }
}
