//! The validator set: broadcast fan-out and the health-probing loop

use crate::batch::BatchRunner;
use crate::bundle::SendPuissantArgs;
use crate::config::ValidatorsConfig;
use crate::error::{Result, RpcError};
use crate::rpc::client::JsonRpcClient;
use crate::rpc::validator::{RpcValidator, Validator};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Owns the full collection of validators. The set of identities is fixed for
/// the process lifetime; only the per-validator health flags vary, and only
/// the probe loop writes them.
pub struct ValidatorSet {
    validators: Vec<Arc<dyn Validator>>,
    expected_version: String,
}

impl ValidatorSet {
    pub fn new(cfg: &ValidatorsConfig, client: Arc<dyn JsonRpcClient>) -> Self {
        let validators = cfg
            .urls
            .iter()
            .map(|url| {
                Arc::new(RpcValidator::new(url.clone(), client.clone())) as Arc<dyn Validator>
            })
            .collect();

        Self {
            validators,
            expected_version: cfg.expected_version.clone(),
        }
    }

    /// Build a set from pre-constructed validators. Useful for wiring in
    /// alternative [`Validator`] implementations.
    pub fn from_validators(
        validators: Vec<Arc<dyn Validator>>,
        expected_version: impl Into<String>,
    ) -> Self {
        Self {
            validators,
            expected_version: expected_version.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Number of validators currently passing the health probe.
    pub fn active_count(&self) -> usize {
        self.validators.iter().filter(|v| v.is_active()).count()
    }

    /// Broadcast a bundle to every active validator.
    ///
    /// Returns `Ok(())` when all attempted validators return `Ok(())`; an
    /// empty active set is an immediate success. Inactive validators are
    /// skipped silently. When the cancellation token fires before the batch
    /// completes, the call returns `RpcError::Timeout` and stops waiting;
    /// in-flight submissions keep running detached and their results are
    /// discarded.
    pub async fn send_puissant(
        &self,
        cancel: &CancellationToken,
        args: &SendPuissantArgs,
    ) -> Result<()> {
        let mut batch = BatchRunner::new();

        for validator in &self.validators {
            // skip inactive validator
            if !validator.is_active() {
                continue;
            }

            let validator = validator.clone();
            let args = args.clone();
            batch.add_task(async move {
                validator.send_puissant(&args).await.map_err(|e| {
                    tracing::error!(url = %validator.url(), error = %e, "fail to send puissant");
                    e
                })
            });
        }

        tokio::select! {
            res = batch.exec() => {
                if let Err(ref e) = res {
                    tracing::error!(error = %e, "fail to batch send puissant");
                }
                res
            }
            _ = cancel.cancelled() => Err(RpcError::Timeout.into()),
        }
    }

    /// Probe every validator once and update its health flag.
    ///
    /// A validator is active iff the probe succeeds and the reported version
    /// compares `>=` the expected version. The comparison is ordinal, not
    /// semver-aware. Probe failures only flip the flag; they never propagate
    /// to submit callers.
    pub async fn probe_once(&self) {
        for validator in &self.validators {
            match validator.client_version().await {
                Err(e) => {
                    tracing::error!(url = %validator.url(), error = %e, "fail to maintain client version");
                    validator.set_active(false);
                }
                Ok(version) => {
                    let active = version.as_str() >= self.expected_version.as_str();
                    if !active {
                        tracing::warn!(
                            url = %validator.url(),
                            version,
                            expected = %self.expected_version,
                            "validator version below expected"
                        );
                    }
                    validator.set_active(active);
                }
            }
        }
    }

    /// Run the probe loop until the token is cancelled. The first probe fires
    /// immediately; afterwards one per `period`. No health flag is mutated
    /// after the loop observes cancellation.
    pub fn spawn_probe_loop(
        self: &Arc<Self>,
        period: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let set = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::info!("validator probe loop stopped");
                        break;
                    }
                    _ = ticker.tick() => set.probe_once().await,
                }
            }
        })
    }
}
