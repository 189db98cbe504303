// Thin re-export module: the ledger lives in `blockchain/core.rs`, split into
// chain management, balance replay and structural validation.

pub mod core;
pub use self::core::*;
