//! Network collaborator contract and a local, single-node implementation
//!
//! Submitting a transaction is the only write reachable through the RPC
//! surface. The network decides whether a payload is accepted and what the
//! caller gets back.

use crate::mempool::Mempool;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a transaction submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn accepted(hash: String) -> Self {
        Self {
            accepted: true,
            hash: Some(hash),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            accepted: false,
            hash: None,
            error: Some(error.into()),
        }
    }
}

/// Propagates submitted transactions. Implementations may block.
pub trait Network: Send + Sync {
    fn submit_transaction(&self, payload: Value) -> SubmissionResult;
}

/// Network of one: accepted transactions go straight into the local mempool.
pub struct LocalNetwork {
    mempool: Arc<Mempool>,
    broadcasts: AtomicU64,
}

impl LocalNetwork {
    pub fn new(mempool: Arc<Mempool>) -> Self {
        Self {
            mempool,
            broadcasts: AtomicU64::new(0),
        }
    }

    /// Number of transactions broadcast so far.
    pub fn broadcasts(&self) -> u64 {
        self.broadcasts.load(Ordering::Relaxed)
    }
}

impl Network for LocalNetwork {
    fn submit_transaction(&self, payload: Value) -> SubmissionResult {
        match &payload {
            Value::Object(fields) if !fields.is_empty() => {}
            _ => {
                warn!("rejected transaction: payload is not a non-empty object");
                return SubmissionResult::rejected("Transaction payload must be a non-empty object");
            }
        }

        let tx = Transaction::new(payload);
        let hash = tx.hash_str();
        match self.mempool.add_transaction(tx) {
            Ok(()) => {
                self.broadcasts.fetch_add(1, Ordering::SeqCst);
                info!(tx_hash = %hash, "broadcast transaction");
                SubmissionResult::accepted(hash)
            }
            Err(e) => {
                warn!(tx_hash = %hash, error = %e, "rejected transaction");
                SubmissionResult::rejected(e.to_string())
            }
        }
    }
}
