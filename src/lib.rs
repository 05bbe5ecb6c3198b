//! ain-rpc - JSON-RPC query dispatch for the AIN blockchain node
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Dispatch
//! - [`query`] - Query extraction from positional call arguments
//! - [`accessor`] - Chain, pool and network accessor adapters
//! - [`methods`] - Method registry and call handlers
//!
//! ## Collaborators
//! - [`blockchain`] - Chain contract, block types and an in-memory chain
//! - [`transaction`] - Opaque transaction record
//! - [`mempool`] - Pool contract and an in-memory pool
//! - [`network`] - Network contract and a local network
//!
//! ## Integration
//! - [`api`] - JSON-RPC 2.0 HTTP endpoint
//! - [`node`] - Node wiring
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Dispatch
// ============================================================================
pub mod accessor;
pub mod methods;
pub mod query;

// ============================================================================
// Collaborators
// ============================================================================
pub mod blockchain;
pub mod mempool;
pub mod network;
pub mod transaction;

// ============================================================================
// Integration
// ============================================================================
#[cfg(feature = "api")]
pub mod api;
pub mod node;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

pub use error::{Result, RpcError};
pub use methods::MethodRegistry;
pub use query::Query;
