//! Puissant bundle submission payload

use alloy::primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};

/// Arguments of an `eth_sendPuissant` call.
///
/// The payload is immutable once constructed; the same value is forwarded
/// verbatim to every active validator. Field names are part of the wire
/// contract and must stay camelCase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPuissantArgs {
    /// Raw signed transactions, in execution order
    pub txs: Vec<Bytes>,
    /// Unix timestamp after which the bundle is invalid
    pub max_timestamp: u64,
    /// Hashes of transactions whose revert is tolerated
    pub revertible: Vec<B256>,
    /// Relay authorization signature
    pub relay_signature: Bytes,
}
