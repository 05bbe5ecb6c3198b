//! Transaction record as seen by the RPC layer
//!
//! The RPC layer treats transactions as opaque JSON. Only the collaborators
//! (pool, network) look inside, and even they only need a content hash.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction(pub Value);

impl Transaction {
    pub fn new(value: Value) -> Self {
        Transaction(value)
    }

    /// SHA-256 over the JSON text of the record with object keys sorted.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(canonical(&self.0).to_string().as_bytes());
        hasher.finalize().into()
    }

    pub fn hash_str(&self) -> String {
        format!("0x{}", hex::encode(self.hash()))
    }
}

/// Copy of `value` with every object's keys inserted in sorted order, so the
/// rendered text does not depend on how the map orders its entries.
fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(fields) => {
            let mut entries: Vec<(&String, &Value)> = fields.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), canonical(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}
