//! A single upstream validator node and its health flag

use crate::bundle::SendPuissantArgs;
use crate::error::{Result, RpcError};
use crate::rpc::client::{ErrorObject, JsonRpcClient, Request};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One upstream validator reachable via JSON-RPC.
///
/// The health flag is written only by the probe loop and read by concurrent
/// submit tasks; implementations must keep both lock-free for callers.
#[async_trait]
pub trait Validator: Send + Sync {
    fn url(&self) -> &str;

    fn is_active(&self) -> bool;

    fn set_active(&self, active: bool);

    /// Forward a bundle to this validator. Fails without any network call
    /// when the validator is inactive.
    async fn send_puissant(&self, args: &SendPuissantArgs) -> Result<()>;

    /// Version-identity probe (`web3_clientVersion`).
    async fn client_version(&self) -> Result<String>;
}

/// [`Validator`] backed by a [`JsonRpcClient`] transport.
///
/// Created once at startup; only the `active` flag ever changes.
pub struct RpcValidator {
    url: String,
    active: AtomicBool,
    client: Arc<dyn JsonRpcClient>,
}

impl RpcValidator {
    /// A new validator starts inactive until its first successful probe.
    pub fn new(url: impl Into<String>, client: Arc<dyn JsonRpcClient>) -> Self {
        Self {
            url: url.into(),
            active: AtomicBool::new(false),
            client,
        }
    }
}

#[async_trait]
impl Validator for RpcValidator {
    fn url(&self) -> &str {
        &self.url
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    async fn send_puissant(&self, args: &SendPuissantArgs) -> Result<()> {
        if !self.is_active() {
            return Err(RpcError::MethodUnavailable.into());
        }

        let req =
            Request::new("eth_sendPuissant").with_params(serde_json::json!([args]));

        let resp = self.client.call(&self.url, req).await?;

        if let Some(fault) = resp.error {
            tracing::error!(url = %self.url, fault = %fault, "json rpc call return error");

            return match serde_json::from_value::<ErrorObject>(fault) {
                Ok(obj) => Err(RpcError::Rejected(obj.message).into()),
                Err(_) => {
                    tracing::warn!(url = %self.url, "unmarshal fault of eth_sendPuissant failed");
                    Err(RpcError::MethodUnavailable.into())
                }
            };
        }

        Ok(())
    }

    async fn client_version(&self) -> Result<String> {
        let req = Request::new("web3_clientVersion");

        let resp = self.client.call(&self.url, req).await?;

        if let Some(fault) = resp.error {
            tracing::error!(url = %self.url, fault = %fault, "json rpc call return error");
            return Err(RpcError::Rejected(fault.to_string()).into());
        }

        match serde_json::from_value::<String>(resp.result.unwrap_or(Value::Null)) {
            Ok(version) => Ok(version),
            Err(e) => {
                tracing::error!(url = %self.url, error = %e, "fail to unmarshal json rpc result");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::AtomicUsize;

    /// Transport stub that counts invocations and replays a canned response.
    struct MockClient {
        calls: AtomicUsize,
        response: Value,
    }

    impl MockClient {
        fn new(response: Value) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JsonRpcClient for MockClient {
        async fn call(&self, _url: &str, _req: Request) -> Result<crate::rpc::RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_value(self.response.clone()).unwrap())
        }
    }

    fn ok_response() -> Value {
        serde_json::json!({"jsonrpc": "2.0", "id": 1, "result": null})
    }

    #[test]
    fn test_new_validator_starts_inactive() {
        let client = Arc::new(MockClient::new(ok_response()));
        let validator = RpcValidator::new("https://validator-0:8575", client);
        assert!(!validator.is_active());

        validator.set_active(true);
        assert!(validator.is_active());
        validator.set_active(false);
        assert!(!validator.is_active());
    }

    #[tokio::test]
    async fn test_inactive_validator_never_touches_transport() {
        let client = Arc::new(MockClient::new(ok_response()));
        let validator = RpcValidator::new("https://validator-0:8575", client.clone());

        let err = validator
            .send_puissant(&SendPuissantArgs::default())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "the method eth_sendPuissant does not exist/is not available"
        );
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_active_validator_submits() {
        let client = Arc::new(MockClient::new(ok_response()));
        let validator = RpcValidator::new("https://validator-0:8575", client.clone());
        validator.set_active(true);

        validator
            .send_puissant(&SendPuissantArgs::default())
            .await
            .unwrap();
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_structured_fault_surfaces_verbatim() {
        let client = Arc::new(MockClient::new(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "insufficient funds"}
        })));
        let validator = RpcValidator::new("https://validator-0:8575", client);
        validator.set_active(true);

        let err = validator
            .send_puissant(&SendPuissantArgs::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Rpc(RpcError::Rejected(ref msg)) if msg == "insufficient funds"
        ));
    }

    #[tokio::test]
    async fn test_undecodable_fault_falls_back_to_unavailable() {
        let client = Arc::new(MockClient::new(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": "not an object"
        })));
        let validator = RpcValidator::new("https://validator-0:8575", client);
        validator.set_active(true);

        let err = validator
            .send_puissant(&SendPuissantArgs::default())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "the method eth_sendPuissant does not exist/is not available"
        );
    }

    #[tokio::test]
    async fn test_client_version_decodes_string() {
        let client = Arc::new(MockClient::new(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": "Geth/v1.3.9-2d89929a"
        })));
        let validator = RpcValidator::new("https://validator-0:8575", client);

        let version = validator.client_version().await.unwrap();
        assert_eq!(version, "Geth/v1.3.9-2d89929a");
    }

    #[tokio::test]
    async fn test_client_version_fault_is_rejected() {
        let client = Arc::new(MockClient::new(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32601, "message": "nope"}
        })));
        let validator = RpcValidator::new("https://validator-0:8575", client);

        let err = validator.client_version().await.unwrap_err();
        assert!(matches!(err, Error::Rpc(RpcError::Rejected(_))));
    }
}
