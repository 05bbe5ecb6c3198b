//! Transaction pool collaborator contract and an in-memory pool

use crate::error::ChainError;
use crate::transaction::Transaction;
use parking_lot::RwLock;
use std::collections::HashSet;

/// Maximum number of pending transactions held by [`Mempool`].
pub const MAX_MEMPOOL_SIZE: usize = 10_000;

/// Read access to pending transactions.
pub trait TransactionPool: Send + Sync {
    /// Pending transactions in the pool's native order.
    fn transactions(&self) -> Vec<Transaction>;
}

#[derive(Debug, Default)]
struct PoolState {
    ordered: Vec<Transaction>,
    hashes: HashSet<[u8; 32]>,
}

/// Insertion-ordered pool of pending transactions.
#[derive(Debug)]
pub struct Mempool {
    state: RwLock<PoolState>,
    capacity: usize,
}

impl Mempool {
    pub fn new() -> Self {
        Self::with_capacity(MAX_MEMPOOL_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(PoolState::default()),
            capacity,
        }
    }

    pub fn add_transaction(&self, tx: Transaction) -> Result<(), ChainError> {
        let hash = tx.hash();
        let mut state = self.state.write();

        if state.hashes.contains(&hash) {
            return Err(ChainError::DuplicateTransaction(tx.hash_str()));
        }
        if state.ordered.len() >= self.capacity {
            return Err(ChainError::InvalidTransaction(format!(
                "Mempool is full ({} transactions)",
                self.capacity
            )));
        }

        state.hashes.insert(hash);
        state.ordered.push(tx);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.state.read().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Mempool {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionPool for Mempool {
    fn transactions(&self) -> Vec<Transaction> {
        self.state.read().ordered.clone()
    }
}
