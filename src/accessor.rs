//! Accessor adapters
//!
//! Thin facades between the method handlers and the three collaborators.
//! They forward calls unchanged and turn typed results into JSON values ready
//! to be sent back as an RPC result.

use crate::blockchain::{Block, Blockchain};
use crate::mempool::TransactionPool;
use crate::network::Network;
use crate::query::Query;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Serialize a response value. The crate's response types are plain data, so
/// a failure here can only come from a foreign collaborator type and is
/// reported as `null`.
pub(crate) fn to_response<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to serialize rpc response");
        Value::Null
    })
}

/// Read-only window onto the chain.
#[derive(Clone)]
pub struct ChainAccessor {
    chain: Arc<dyn Blockchain>,
}

impl ChainAccessor {
    pub fn new(chain: Arc<dyn Blockchain>) -> Self {
        Self { chain }
    }

    pub fn list_block_bodies(&self, query: &Query) -> Value {
        to_response(self.chain.block_bodies(query))
    }

    pub fn last_block(&self) -> Value {
        to_response(self.chain.last_block())
    }

    pub fn list_block_headers(&self, query: &Query) -> Value {
        to_response(self.chain.block_headers(query))
    }

    pub fn block_by_hash(&self, hash: &str) -> Option<Block> {
        self.chain.block_by_hash(hash)
    }

    pub fn block_by_number(&self, number: &str) -> Option<Block> {
        self.chain.block_by_number(number)
    }
}

#[derive(Clone)]
pub struct PoolAccessor {
    pool: Arc<dyn TransactionPool>,
}

impl PoolAccessor {
    pub fn new(pool: Arc<dyn TransactionPool>) -> Self {
        Self { pool }
    }

    pub fn transactions(&self) -> Value {
        to_response(self.pool.transactions())
    }
}

#[derive(Clone)]
pub struct NetworkAccessor {
    network: Arc<dyn Network>,
}

impl NetworkAccessor {
    pub fn new(network: Arc<dyn Network>) -> Self {
        Self { network }
    }

    /// Forward `payload` untouched and return whatever the network answers.
    pub fn submit_transaction(&self, payload: Value) -> Value {
        to_response(self.network.submit_transaction(payload))
    }
}
