use crate::transaction::Transaction;
use sha2::{Digest, Sha256};

/// Fixed timestamp of the genesis block (2019-01-01T00:00:00Z, millis).
pub const GENESIS_TIMESTAMP: u64 = 1_546_300_800_000;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlockHeader {
    pub hash: String,
    pub last_hash: String,
    pub number: u64,
    pub epoch: u64,
    pub timestamp: u64,
    pub transactions_hash: String,
    pub proposer: String,
    pub validators: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlockBody {
    pub hash: String,
    pub number: u64,
    pub forger: String,
    pub data: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub body: BlockBody,
}

impl Block {
    pub fn new(
        number: u64,
        last_hash: String,
        epoch: u64,
        forger: String,
        validators: Vec<String>,
        data: Vec<Transaction>,
    ) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis() as u64;
        Self::with_timestamp(number, last_hash, epoch, timestamp, forger, validators, data)
    }

    pub fn genesis(forger: String, validators: Vec<String>, data: Vec<Transaction>) -> Self {
        Self::with_timestamp(0, String::new(), 0, GENESIS_TIMESTAMP, forger, validators, data)
    }

    fn with_timestamp(
        number: u64,
        last_hash: String,
        epoch: u64,
        timestamp: u64,
        forger: String,
        validators: Vec<String>,
        data: Vec<Transaction>,
    ) -> Self {
        let transactions_hash = Block::calculate_transactions_hash(&data);
        let mut header = BlockHeader {
            hash: String::new(),
            last_hash,
            number,
            epoch,
            timestamp,
            transactions_hash,
            proposer: forger.clone(),
            validators,
        };
        header.hash = header.compute_hash();

        Block {
            body: BlockBody {
                hash: header.hash.clone(),
                number,
                forger,
                data,
            },
            header,
        }
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn body(&self) -> &BlockBody {
        &self.body
    }

    pub fn hash(&self) -> &str {
        &self.header.hash
    }

    pub fn number(&self) -> u64 {
        self.header.number
    }

    pub fn transaction_count(&self) -> usize {
        self.body.data.len()
    }

    pub fn calculate_transactions_hash(transactions: &[Transaction]) -> String {
        let mut hasher = Sha256::new();
        for tx in transactions {
            hasher.update(tx.hash());
        }
        hex::encode(hasher.finalize())
    }
}

impl BlockHeader {
    /// Hash over every header field except the hash itself.
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.last_hash.as_bytes());
        hasher.update(self.number.to_le_bytes());
        hasher.update(self.epoch.to_le_bytes());
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.transactions_hash.as_bytes());
        hasher.update(self.proposer.as_bytes());
        for validator in &self.validators {
            hasher.update(validator.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
