//! Dispatch-level tests for the AIN JSON-RPC method surface
//!
//! These drive `MethodRegistry` directly with positional params, the way the
//! HTTP transport does, against the in-memory collaborators.

use ain_rpc::blockchain::{Block, BlockBody, BlockHeader, Blockchain, MemoryChain};
use ain_rpc::mempool::Mempool;
use ain_rpc::network::{LocalNetwork, Network, SubmissionResult};
use ain_rpc::transaction::Transaction;
use ain_rpc::{MethodRegistry, Query};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

struct Fixture {
    registry: MethodRegistry,
    chain: Arc<MemoryChain>,
    mempool: Arc<Mempool>,
}

fn tx(nonce: u64) -> Transaction {
    Transaction::new(json!({ "nonce": nonce, "operation": { "type": "SET_VALUE" } }))
}

/// Genesis plus blocks 1 and 2; block 2 holds five transactions.
fn fixture() -> Fixture {
    let chain = Arc::new(
        MemoryChain::new(Block::genesis("genesis-forger".into(), vec!["v0".into()], vec![])).unwrap(),
    );
    chain
        .forge_block("forger-1".into(), vec!["v1".into()], vec![tx(100)])
        .unwrap();
    chain
        .forge_block(
            "forger-2".into(),
            vec!["v1".into(), "v2".into()],
            (0..5).map(tx).collect(),
        )
        .unwrap();

    let mempool = Arc::new(Mempool::new());
    let network = Arc::new(LocalNetwork::new(mempool.clone()));
    let registry = MethodRegistry::new(chain.clone(), mempool.clone(), network);
    Fixture {
        registry,
        chain,
        mempool,
    }
}

fn call(registry: &MethodRegistry, method: &str, params: Value) -> Value {
    registry
        .dispatch(method, Some(&params))
        .expect("registered method")
}

fn hash_of(chain: &MemoryChain, number: &str) -> String {
    chain.block_by_number(number).unwrap().hash().to_string()
}

#[test]
fn test_missing_block_is_null_for_every_projection() {
    let f = fixture();
    let by_hash = json!([{ "hash": "ffffffffffffffff" }]);
    let by_number = json!([{ "height": "999" }]);

    for what in [
        "Block",
        "BlockHeader",
        "Forger",
        "Validators",
        "BlockTransactionCount",
    ] {
        let hash_call = format!("ain_get{}ByHash", what);
        let number_call = format!("ain_get{}ByNumber", what);
        assert_eq!(call(&f.registry, &hash_call, by_hash.clone()), Value::Null, "{}", hash_call);
        assert_eq!(
            call(&f.registry, &number_call, by_number.clone()),
            Value::Null,
            "{}",
            number_call
        );
    }
}

#[test]
fn test_lists_return_whole_chain_in_order() {
    let f = fixture();

    let bodies = call(&f.registry, "ain_getBlockList", json!([]));
    let numbers: Vec<u64> = bodies
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![0, 1, 2]);
    assert_eq!(bodies[2]["forger"], "forger-2");

    let headers = f.registry.dispatch("ain_getBlockHeadersList", None).unwrap();
    let hashes: Vec<&str> = headers
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["hash"].as_str().unwrap())
        .collect();
    assert_eq!(
        hashes,
        vec![
            hash_of(&f.chain, "0"),
            hash_of(&f.chain, "1"),
            hash_of(&f.chain, "2")
        ]
    );
}

#[test]
fn test_list_range_filter() {
    let f = fixture();
    let bodies = call(&f.registry, "ain_getBlockList", json!([{ "from": 1, "to": 2 }]));
    assert_eq!(bodies.as_array().unwrap().len(), 1);
    assert_eq!(bodies[0]["number"], 1);

    let empty = call(&f.registry, "ain_getBlockHeadersList", json!([{ "from": 5 }]));
    assert_eq!(empty, json!([]));
}

#[test]
fn test_last_block_has_header_and_body() {
    let f = fixture();
    let last = f.registry.dispatch("ain_getLastBlock", None).unwrap();
    assert_eq!(last["header"]["number"], 2);
    assert_eq!(last["body"]["data"].as_array().unwrap().len(), 5);
    assert_eq!(last, serde_json::to_value(f.chain.last_block()).unwrap());
}

#[test]
fn test_block_lookups_by_hash_substring() {
    let f = fixture();
    let hash = hash_of(&f.chain, "2");
    let params = json!([{ "hash": &hash[..12] }]);

    assert_eq!(call(&f.registry, "ain_getForgerByHash", params.clone()), json!("forger-2"));
    assert_eq!(
        call(&f.registry, "ain_getValidatorsByHash", params.clone()),
        json!(["v1", "v2"])
    );
    assert_eq!(
        call(&f.registry, "ain_getBlockTransactionCountByHash", params.clone()),
        json!(5)
    );
    assert_eq!(call(&f.registry, "ain_getBlockHeaderByHash", params)["hash"], json!(hash));
}

#[test]
fn test_transaction_by_hash_and_index() {
    let f = fixture();
    let hash = hash_of(&f.chain, "2");

    let result = call(
        &f.registry,
        "ain_getTransactionByBlockHashAndIndex",
        json!([{ "blockHash": hash, "index": "2" }]),
    );
    assert_eq!(result, serde_json::to_value(tx(2)).unwrap());
}

#[test]
fn test_transaction_by_hash_and_index_zero_is_null() {
    // Zero counts as an unset index, so the first transaction of a block
    // cannot be fetched through this call.
    let f = fixture();
    let hash = hash_of(&f.chain, "2");

    for index in [json!("0"), json!(0)] {
        let result = call(
            &f.registry,
            "ain_getTransactionByBlockHashAndIndex",
            json!([{ "blockHash": hash, "index": index }]),
        );
        assert_eq!(result, Value::Null);
    }
}

#[test]
fn test_transaction_by_hash_and_index_out_of_range() {
    let f = fixture();
    let hash = hash_of(&f.chain, "2");

    for index in ["99", "5", "-1", "1.5", "abc"] {
        let result = call(
            &f.registry,
            "ain_getTransactionByBlockHashAndIndex",
            json!([{ "blockHash": hash, "index": index }]),
        );
        assert_eq!(result, Value::Null, "index {}", index);
    }

    let last = call(
        &f.registry,
        "ain_getTransactionByBlockHashAndIndex",
        json!([{ "blockHash": hash, "index": "4" }]),
    );
    assert_eq!(last, serde_json::to_value(tx(4)).unwrap());
}

#[test]
fn test_transaction_by_number_and_index() {
    let f = fixture();

    let result = call(
        &f.registry,
        "ain_getTransactionByBlockNumberAndIndex",
        json!([{ "blockNumber": "2", "index": "3" }]),
    );
    assert_eq!(result, serde_json::to_value(tx(3)).unwrap());

    let zero = call(
        &f.registry,
        "ain_getTransactionByBlockNumberAndIndex",
        json!([{ "blockNumber": "2", "index": "0" }]),
    );
    assert_eq!(zero, Value::Null);

    let past_end = call(
        &f.registry,
        "ain_getTransactionByBlockNumberAndIndex",
        json!([{ "blockNumber": 2, "index": 5 }]),
    );
    assert_eq!(past_end, Value::Null);
}

#[test]
fn test_indexed_lookup_of_missing_block_is_null() {
    let f = fixture();

    let by_hash = call(
        &f.registry,
        "ain_getTransactionByBlockHashAndIndex",
        json!([{ "blockHash": "0123456789abcdef0123", "index": "1" }]),
    );
    assert_eq!(by_hash, Value::Null);

    let by_number = call(
        &f.registry,
        "ain_getTransactionByBlockNumberAndIndex",
        json!([{ "blockNumber": "77", "index": "1" }]),
    );
    assert_eq!(by_number, Value::Null);
}

#[test]
fn test_indexed_lookup_missing_arguments() {
    let f = fixture();
    let hash = hash_of(&f.chain, "2");

    for params in [
        json!([]),
        json!([{ "blockHash": hash }]),
        json!([{ "index": "1" }]),
        json!([{ "blockHash": "", "index": "1" }]),
    ] {
        let result = call(&f.registry, "ain_getTransactionByBlockHashAndIndex", params);
        assert_eq!(result, Value::Null);
    }

    // Block number 0 is falsy too, so genesis is unreachable here.
    let genesis = call(
        &f.registry,
        "ain_getTransactionByBlockNumberAndIndex",
        json!([{ "blockNumber": "0", "index": "1" }]),
    );
    assert_eq!(genesis, Value::Null);
}

/// Chain holding a single block whose hash is fixed by the test.
struct SingleBlockChain {
    block: Block,
}

impl SingleBlockChain {
    fn with_hash(hash: &str) -> Self {
        let mut block = Block::genesis("f".into(), vec![], (0..3).map(tx).collect());
        block.header.hash = hash.to_string();
        block.body.hash = hash.to_string();
        Self { block }
    }
}

impl Blockchain for SingleBlockChain {
    fn block_bodies(&self, _query: &Query) -> Vec<BlockBody> {
        vec![self.block.body.clone()]
    }

    fn last_block(&self) -> Block {
        self.block.clone()
    }

    fn block_headers(&self, _query: &Query) -> Vec<BlockHeader> {
        vec![self.block.header.clone()]
    }

    fn block_by_hash(&self, hash: &str) -> Option<Block> {
        (!hash.is_empty() && self.block.hash().starts_with(hash)).then(|| self.block.clone())
    }

    fn block_by_number(&self, number: &str) -> Option<Block> {
        (number.trim() == "0").then(|| self.block.clone())
    }
}

#[test]
fn test_hash_prefix_reading_as_zero_still_names_a_block() {
    let hash = format!("0e2{}", "a".repeat(61));
    let mempool = Arc::new(Mempool::new());
    let network = Arc::new(LocalNetwork::new(mempool.clone()));
    let registry = MethodRegistry::new(
        Arc::new(SingleBlockChain::with_hash(&hash)),
        mempool,
        network,
    );

    for prefix in ["0e2", "0", "0e2a"] {
        assert_eq!(
            call(&registry, "ain_getBlockTransactionCountByHash", json!([{ "hash": prefix }])),
            json!(3),
            "prefix {}",
            prefix
        );
        assert_eq!(
            call(
                &registry,
                "ain_getTransactionByBlockHashAndIndex",
                json!([{ "blockHash": prefix, "index": "1" }]),
            ),
            serde_json::to_value(tx(1)).unwrap(),
            "prefix {}",
            prefix
        );
    }

    // A zero block number is still treated as missing.
    assert_eq!(
        call(
            &registry,
            "ain_getTransactionByBlockNumberAndIndex",
            json!([{ "blockNumber": "0", "index": "1" }]),
        ),
        Value::Null
    );
}

#[test]
fn test_pending_transactions_in_pool_order() {
    let f = fixture();
    for nonce in [9, 3, 7] {
        f.mempool.add_transaction(tx(nonce)).unwrap();
    }

    let pending = f.registry.dispatch("ain_getPendingTransactions", None).unwrap();
    assert_eq!(pending, serde_json::to_value(vec![tx(9), tx(3), tx(7)]).unwrap());
}

/// Records what it receives and answers with a canned result.
struct RecordingNetwork {
    received: Mutex<Vec<Value>>,
    answer: SubmissionResult,
}

impl Network for RecordingNetwork {
    fn submit_transaction(&self, payload: Value) -> SubmissionResult {
        self.received.lock().push(payload);
        self.answer.clone()
    }
}

#[test]
fn test_send_transaction_forwards_payload_unchanged() {
    let chain = Arc::new(MemoryChain::new(Block::genesis("g".into(), vec![], vec![])).unwrap());
    let network = Arc::new(RecordingNetwork {
        received: Mutex::new(Vec::new()),
        answer: SubmissionResult::accepted("0xfeed".to_string()),
    });
    let registry = MethodRegistry::new(chain, Arc::new(Mempool::new()), network.clone());

    let payload = json!({
        "signature": "0xabc",
        "transaction": { "nonce": -1, "operation": { "type": "SET_VALUE", "ref": "/a", "value": 1 } },
    });
    let result = call(&registry, "ain_sendTransaction", json!([payload.clone(), { "ignored": true }]));

    assert_eq!(result, json!({ "accepted": true, "hash": "0xfeed" }));
    assert_eq!(*network.received.lock(), vec![payload]);
}

#[test]
fn test_send_transaction_reaches_pending_pool() {
    let f = fixture();
    let payload = json!({ "nonce": 42, "operation": { "type": "SET_VALUE" } });

    let result = call(&f.registry, "ain_sendTransaction", json!([payload.clone()]));
    assert_eq!(result["accepted"], true);

    let pending = f.registry.dispatch("ain_getPendingTransactions", None).unwrap();
    assert_eq!(pending, json!([payload]));
    assert_eq!(f.mempool.len(), 1);
}

#[test]
fn test_reads_are_idempotent() {
    let f = fixture();
    let hash = hash_of(&f.chain, "1");
    let calls = [
        ("ain_getBlockList", json!([])),
        ("ain_getLastBlock", json!([])),
        ("ain_getBlockByHash", json!([{ "hash": hash }])),
        ("ain_getBlockHeaderByNumber", json!([{ "height": "1" }])),
        ("ain_getPendingTransactions", json!([])),
        (
            "ain_getTransactionByBlockNumberAndIndex",
            json!([{ "blockNumber": "2", "index": "1" }]),
        ),
    ];

    for (method, params) in calls {
        let first = call(&f.registry, method, params.clone());
        let second = call(&f.registry, method, params);
        assert_eq!(first, second, "{}", method);
    }
}
