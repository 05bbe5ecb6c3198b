use crate::blockchain::{Block, Blockchain, MemoryChain};
use crate::config::Config;
use crate::error::{ChainError, RpcError};
use crate::mempool::Mempool;
use crate::methods::MethodRegistry;
use crate::network::LocalNetwork;
use crate::transaction::Transaction;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// A single-process node: in-memory chain, mempool and local network behind
/// the RPC method registry.
pub struct Node {
    pub config: Config,
    pub chain: Arc<MemoryChain>,
    pub mempool: Arc<Mempool>,
    pub network: Arc<LocalNetwork>,
    pub registry: Arc<MethodRegistry>,
}

impl Node {
    pub fn init(config: Config) -> Result<Self, ChainError> {
        let genesis = Block::genesis(
            config.chain.genesis_forger.clone(),
            config.chain.validators.clone(),
            Vec::new(),
        );
        let chain = Arc::new(
            MemoryChain::new(genesis)?.with_section_limit(config.chain.section_limit),
        );
        let mempool = Arc::new(Mempool::new());
        let network = Arc::new(LocalNetwork::new(mempool.clone()));
        let registry = Arc::new(MethodRegistry::with_prefix(
            &config.rpc.method_prefix,
            chain.clone(),
            mempool.clone(),
            network.clone(),
        ));

        info!(
            genesis = %chain.last_block().hash(),
            methods = registry.len(),
            prefix = registry.prefix(),
            "node initialised"
        );

        Ok(Self {
            config,
            chain,
            mempool,
            network,
            registry,
        })
    }

    /// Forge `count` blocks with a few placeholder transactions each, so a
    /// fresh node has something to query.
    pub fn seed_demo_blocks(&self, count: u64) -> Result<(), ChainError> {
        let forger = self.config.chain.genesis_forger.clone();
        let validators = self.config.chain.validators.clone();

        for _ in 0..count {
            let height = self.chain.len() as u64;
            let data = (0..height % 4 + 1)
                .map(|i| {
                    Transaction::new(json!({
                        "nonce": i,
                        "timestamp": chrono::Utc::now().timestamp_millis(),
                        "operation": {
                            "type": "SET_VALUE",
                            "ref": format!("/demo/{}/{}", height, i),
                            "value": height * 10 + i,
                        },
                    }))
                })
                .collect();
            let block = self
                .chain
                .forge_block(forger.clone(), validators.clone(), data)?;
            info!(number = block.number(), hash = %block.hash(), "forged demo block");
        }
        Ok(())
    }

    pub fn rpc_addr(&self) -> Result<SocketAddr, RpcError> {
        let addr = format!("{}:{}", self.config.server.bind_address, self.config.server.port);
        addr.parse()
            .map_err(|e| RpcError::Config(format!("invalid listen address {}: {}", addr, e)))
    }
}
