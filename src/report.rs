//! Packing-result report payloads and the out-of-band sink seam

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of one transaction inside a packed puissant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxReport {
    pub tx_hash: String,
    pub gas_used: u64,
    pub status: u8,
    pub revert_msg: String,
}

/// Outcome of one puissant bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuissantReport {
    pub uuid: String,
    pub status: u8,
    pub info: u8,
    pub txs: Vec<TxReport>,
}

/// Arguments of an `eth_reportPuissant` call: the packing result for one
/// block, with a human-readable summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingReport {
    pub block: String,
    pub text: String,
    pub result: Vec<PuissantReport>,
}

/// Out-of-band destination for packing reports (chat, webhook, ...).
///
/// Publishing is best-effort: the relay logs a sink failure and still
/// acknowledges the report to its caller.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&self, report: &PackingReport) -> Result<()>;
}
