use super::{Block, BlockBody, BlockHeader, Blockchain};
use crate::error::ChainError;
use crate::query::Query;
use crate::transaction::Transaction;
use parking_lot::RwLock;

/// In-memory chain holding a genesis block plus every block appended after it.
pub struct MemoryChain {
    genesis: Block,
    blocks: RwLock<Vec<Block>>,
    section_limit: Option<usize>,
}

impl MemoryChain {
    pub fn new(genesis: Block) -> Result<Self, ChainError> {
        if genesis.number() != 0 {
            return Err(ChainError::InvalidBlock(format!(
                "Genesis block must have number 0, got {}.",
                genesis.number()
            )));
        }

        Ok(Self {
            genesis,
            blocks: RwLock::new(Vec::new()),
            section_limit: None,
        })
    }

    /// Cap the number of blocks a single list call returns.
    pub fn with_section_limit(mut self, limit: Option<usize>) -> Self {
        self.section_limit = limit;
        self
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len() + 1
    }

    /// A chain always holds its genesis block.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn append(&self, block: Block) -> Result<(), ChainError> {
        let mut blocks = self.blocks.write();
        let last_block = blocks.last().unwrap_or(&self.genesis);

        if block.number() != last_block.number() + 1 {
            return Err(ChainError::InvalidBlock(format!(
                "Invalid block number. Expected {}, but got {}.",
                last_block.number() + 1,
                block.number()
            )));
        }

        if block.header.last_hash != last_block.hash() {
            return Err(ChainError::InvalidBlock(format!(
                "Invalid last hash. Expected {}, but got {}.",
                last_block.hash(),
                block.header.last_hash
            )));
        }

        let expected_transactions_hash = Block::calculate_transactions_hash(&block.body.data);
        if expected_transactions_hash != block.header.transactions_hash {
            return Err(ChainError::InvalidBlock(format!(
                "Transactions hash mismatch. Expected {}, but got {}.",
                expected_transactions_hash, block.header.transactions_hash
            )));
        }

        if block.header.compute_hash() != block.header.hash || block.body.hash != block.header.hash {
            return Err(ChainError::InvalidBlock(format!(
                "Block hash {} does not match its contents.",
                block.header.hash
            )));
        }

        blocks.push(block);
        Ok(())
    }

    /// Build a block on top of the current tip and append it.
    pub fn forge_block(
        &self,
        forger: String,
        validators: Vec<String>,
        data: Vec<Transaction>,
    ) -> Result<Block, ChainError> {
        let tip = self.last_block();
        let block = Block::new(
            tip.number() + 1,
            tip.hash().to_string(),
            tip.header.epoch + 1,
            forger,
            validators,
            data,
        );
        self.append(block.clone())?;
        Ok(block)
    }

    /// Blocks selected by the `from` (inclusive) and `to` (exclusive) keys.
    fn section(&self, query: &Query) -> Vec<Block> {
        let blocks = self.blocks.read();
        let len = blocks.len() + 1;

        let from = integer_field(query, "from").map_or(0, |n| n.max(0) as usize);
        let mut to = integer_field(query, "to").map_or(len, |n| n.max(0) as usize).min(len);
        if let Some(limit) = self.section_limit {
            to = to.min(from.saturating_add(limit));
        }
        if from >= to {
            return Vec::new();
        }

        std::iter::once(&self.genesis)
            .chain(blocks.iter())
            .skip(from)
            .take(to - from)
            .cloned()
            .collect()
    }
}

fn integer_field(query: &Query, key: &str) -> Option<i64> {
    query
        .number(key)
        .filter(|n| n.fract() == 0.0)
        .map(|n| n as i64)
}

impl Blockchain for MemoryChain {
    fn block_bodies(&self, query: &Query) -> Vec<BlockBody> {
        self.section(query).into_iter().map(|b| b.body).collect()
    }

    fn last_block(&self) -> Block {
        self.blocks.read().last().unwrap_or(&self.genesis).clone()
    }

    fn block_headers(&self, query: &Query) -> Vec<BlockHeader> {
        self.section(query).into_iter().map(|b| b.header).collect()
    }

    /// First block, in chain order, whose hash starts with `hash`. A `0x`
    /// prefix is ignored and hex comparison is case-insensitive.
    fn block_by_hash(&self, hash: &str) -> Option<Block> {
        let needle = hash.strip_prefix("0x").unwrap_or(hash).to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }

        let blocks = self.blocks.read();
        std::iter::once(&self.genesis)
            .chain(blocks.iter())
            .find(|b| b.hash().starts_with(&needle))
            .cloned()
    }

    fn block_by_number(&self, number: &str) -> Option<Block> {
        let number = number.trim().parse::<u64>().ok()?;
        if number == 0 {
            return Some(self.genesis.clone());
        }

        let index = usize::try_from(number - 1).ok()?;
        self.blocks.read().get(index).cloned()
    }
}
