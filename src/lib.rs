//! AssetChain - an in-memory proof-of-work ledger with named asset issuance
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Blocks, the chain, balance replay and validation
//! - [`transaction`] - Transaction type and stateless checks
//! - [`assets`] - Registry of issued assets
//!
//! ## Hashing & Consensus
//! - [`codec`] - Canonical encoding and SHA-256 digests
//! - [`miner`] - Proof-of-work sealing
//!
//! ## Concurrency
//! - [`handle`] - Thread-safe ledger handle with off-lock sealing
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod assets;
pub mod blockchain;
pub mod transaction;

// ============================================================================
// Hashing & Consensus
// ============================================================================
pub mod codec;
pub mod miner;

// ============================================================================
// Concurrency
// ============================================================================
pub mod handle;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
