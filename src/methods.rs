//! Method registry for the JSON-RPC surface
//!
//! Maps a call name to its handler. Handlers are closures over the accessor
//! adapters; they turn a [`Query`] into a JSON result and never fail. A block
//! that does not exist, or an argument that is missing, produces `null`.
//!
//! Block lookups come in a "by hash" and a "by number" flavour. Both go
//! through [`project_block`], parameterized by [`Lookup`] (which chain lookup
//! to use) and [`Projection`] (which part of the block to return).

use crate::accessor::{to_response, ChainAccessor, NetworkAccessor, PoolAccessor};
use crate::blockchain::{Block, Blockchain};
use crate::error::{Result, RpcError};
use crate::mempool::TransactionPool;
use crate::network::Network;
use crate::query::Query;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Namespace the node registers its calls under.
pub const DEFAULT_METHOD_PREFIX: &str = "ain_";

/// A registered call. Receives the query built from the call's params.
pub type Handler = Box<dyn Fn(Query) -> Value + Send + Sync>;

/// Which chain lookup resolves the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hash,
    Number,
}

impl Lookup {
    /// Query key naming the block in the single-block calls.
    pub fn key(self) -> &'static str {
        match self {
            Lookup::Hash => "hash",
            Lookup::Number => "height",
        }
    }

    /// Query key naming the block in the indexed transaction calls.
    pub fn block_key(self) -> &'static str {
        match self {
            Lookup::Hash => "blockHash",
            Lookup::Number => "blockNumber",
        }
    }

    /// Whether the indexed calls received a usable block reference. A hash is
    /// opaque text, so only an empty one is missing; a block number follows
    /// the numeric rule and treats zero as missing.
    fn block_is_set(self, query: &Query) -> bool {
        match self {
            Lookup::Hash => query.has_text(self.block_key()),
            Lookup::Number => query.is_set(self.block_key()),
        }
    }

    fn resolve(self, chain: &ChainAccessor, reference: &str) -> Option<Block> {
        match self {
            Lookup::Hash => chain.block_by_hash(reference),
            Lookup::Number => chain.block_by_number(reference),
        }
    }
}

/// Which part of a resolved block a call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Body,
    Header,
    Forger,
    Validators,
    TransactionCount,
}

impl Projection {
    fn apply(self, block: &Block) -> Value {
        match self {
            Projection::Body => to_response(block.body()),
            Projection::Header => to_response(block.header()),
            Projection::Forger => Value::from(block.body().forger.as_str()),
            Projection::Validators => to_response(&block.header().validators),
            Projection::TransactionCount => Value::from(block.transaction_count()),
        }
    }
}

/// Resolve a block from `query` and project it, or `null` when the key is
/// missing or no block matches.
pub fn project_block(
    chain: &ChainAccessor,
    lookup: Lookup,
    projection: Projection,
    query: &Query,
) -> Value {
    let Some(reference) = query.text(lookup.key()) else {
        return Value::Null;
    };

    match lookup.resolve(chain, &reference) {
        Some(block) => projection.apply(&block),
        None => Value::Null,
    }
}

/// Transaction at `index` inside the block named by `blockHash` or
/// `blockNumber`.
///
/// `index` must be set in the sense of [`Query::is_set`], so an index of
/// `"0"` is rejected outright. The number variant additionally requires
/// `index > 0`. An index that is negative, fractional or past the end of the
/// block gives `null`, as does a block that does not exist.
pub fn transaction_by_block_and_index(chain: &ChainAccessor, lookup: Lookup, query: &Query) -> Value {
    if !lookup.block_is_set(query) || !query.is_set("index") {
        return Value::Null;
    }

    let (Some(reference), Some(index)) = (query.text(lookup.block_key()), query.number("index"))
    else {
        return Value::Null;
    };
    if index < 0.0 || index.fract() != 0.0 {
        return Value::Null;
    }
    if lookup == Lookup::Number && index <= 0.0 {
        return Value::Null;
    }

    let Some(block) = lookup.resolve(chain, &reference) else {
        return Value::Null;
    };
    block
        .body()
        .data
        .get(index as usize)
        .map_or(Value::Null, to_response)
}

/// Table of call names bound to handlers, built once at startup.
pub struct MethodRegistry {
    prefix: String,
    handlers: HashMap<String, Handler>,
}

impl MethodRegistry {
    pub fn new(
        chain: Arc<dyn Blockchain>,
        pool: Arc<dyn TransactionPool>,
        network: Arc<dyn Network>,
    ) -> Self {
        Self::with_prefix(DEFAULT_METHOD_PREFIX, chain, pool, network)
    }

    pub fn with_prefix(
        prefix: &str,
        chain: Arc<dyn Blockchain>,
        pool: Arc<dyn TransactionPool>,
        network: Arc<dyn Network>,
    ) -> Self {
        let chain = ChainAccessor::new(chain);
        let pool = PoolAccessor::new(pool);
        let network = NetworkAccessor::new(network);

        let mut registry = Self {
            prefix: prefix.to_string(),
            handlers: HashMap::new(),
        };

        // Block API
        let c = chain.clone();
        registry.register("getBlockList", move |q| c.list_block_bodies(&q));
        let c = chain.clone();
        registry.register("getLastBlock", move |_| c.last_block());
        let c = chain.clone();
        registry.register("getBlockHeadersList", move |q| c.list_block_headers(&q));

        let projections = [
            ("getBlockByHash", Lookup::Hash, Projection::Body),
            ("getBlockHeaderByHash", Lookup::Hash, Projection::Header),
            ("getBlockByNumber", Lookup::Number, Projection::Body),
            ("getBlockHeaderByNumber", Lookup::Number, Projection::Header),
            ("getForgerByHash", Lookup::Hash, Projection::Forger),
            ("getForgerByNumber", Lookup::Number, Projection::Forger),
            ("getValidatorsByNumber", Lookup::Number, Projection::Validators),
            ("getValidatorsByHash", Lookup::Hash, Projection::Validators),
            ("getBlockTransactionCountByHash", Lookup::Hash, Projection::TransactionCount),
            ("getBlockTransactionCountByNumber", Lookup::Number, Projection::TransactionCount),
        ];
        for (name, lookup, projection) in projections {
            let c = chain.clone();
            registry.register(name, move |q| project_block(&c, lookup, projection, &q));
        }

        // Transaction API
        registry.register("getPendingTransactions", move |_| pool.transactions());
        registry.register("sendTransaction", move |q| {
            network.submit_transaction(q.into_value())
        });
        let c = chain.clone();
        registry.register("getTransactionByBlockHashAndIndex", move |q| {
            transaction_by_block_and_index(&c, Lookup::Hash, &q)
        });
        registry.register("getTransactionByBlockNumberAndIndex", move |q| {
            transaction_by_block_and_index(&chain, Lookup::Number, &q)
        });

        registry
    }

    fn register<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(Query) -> Value + Send + Sync + 'static,
    {
        self.handlers
            .insert(format!("{}{}", self.prefix, name), Box::new(handler));
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run `method` with raw JSON-RPC `params`.
    ///
    /// Registered calls always succeed; `Err` only means the name is unknown.
    pub fn dispatch(&self, method: &str, params: Option<&Value>) -> Result<Value> {
        let Some(handler) = self.handlers.get(method) else {
            warn!(method, "unknown rpc method");
            return Err(RpcError::MethodNotFound(method.to_string()));
        };

        debug!(method, "rpc call");
        Ok(handler(Query::from_params(params)))
    }

    /// Callback form of [`dispatch`](Self::dispatch): `done` receives an error
    /// slot and a result slot. The error slot is only filled for unknown
    /// methods.
    pub fn call<F>(&self, method: &str, params: Option<&Value>, done: F)
    where
        F: FnOnce(Option<RpcError>, Value),
    {
        match self.dispatch(method, params) {
            Ok(result) => done(None, result),
            Err(e) => done(Some(e), Value::Null),
        }
    }
}
