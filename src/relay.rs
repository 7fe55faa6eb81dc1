//! The relay entry point: deadline injection and per-method latency

use crate::bundle::SendPuissantArgs;
use crate::error::{Result, RpcError};
use crate::report::{PackingReport, ReportSink};
use crate::rpc::ValidatorSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Public entry point the inbound server transport binds to. Wraps the
/// validator-set broadcast with the configured per-call deadline and measures
/// wall-clock latency per logical method, inclusive of all fan-out.
pub struct Relay {
    timeout: Duration,
    validators: Arc<ValidatorSet>,
    report_sink: Option<Arc<dyn ReportSink>>,
}

impl Relay {
    pub fn new(timeout: Duration, validators: Arc<ValidatorSet>) -> Self {
        Self {
            timeout,
            validators,
            report_sink: None,
        }
    }

    pub fn with_report_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.report_sink = Some(sink);
        self
    }

    pub fn validators(&self) -> &ValidatorSet {
        &self.validators
    }

    /// Broadcast a bundle under the configured deadline.
    ///
    /// A zero timeout adds no bound of its own and defers entirely to the
    /// ambient token and upstream deadlines.
    pub async fn send_puissant(
        &self,
        cancel: &CancellationToken,
        args: SendPuissantArgs,
    ) -> Result<()> {
        let start = Instant::now();
        let result = self
            .bounded(self.validators.send_puissant(cancel, &args))
            .await;
        record_latency("eth_sendPuissant", start.elapsed());
        result
    }

    /// Accept a packing report: log it, hand it to the sink if one is wired.
    ///
    /// Always acknowledged; a sink failure is an operational problem, not the
    /// reporter's.
    pub async fn report_puissant(&self, report: PackingReport) -> Result<()> {
        let start = Instant::now();

        tracing::info!(block = %report.block, report = %report.text, "report packing result");

        if let Some(sink) = &self.report_sink {
            if let Err(e) = self.bounded(sink.publish(&report)).await {
                tracing::error!(error = %e, "fail to publish packing report");
            }
        }

        record_latency("eth_reportPuissant", start.elapsed());
        Ok(())
    }

    async fn bounded<F>(&self, fut: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        if self.timeout.is_zero() {
            return fut.await;
        }

        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(RpcError::Timeout.into()),
        }
    }
}

fn record_latency(method: &str, elapsed: Duration) {
    tracing::info!(
        target: "puissant_relay::latency",
        method,
        elapsed_ms = elapsed.as_millis() as u64,
        "api latency"
    );
}
