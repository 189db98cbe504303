//! Registry of issued assets
//!
//! Each name can be issued exactly once and is never removed. The registry
//! only records metadata; the supply itself lives on the chain as the
//! issuer's self-transfer.

use crate::error::{ChainError, Result};
use crate::transaction::now_timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_ASSET_NAME_LENGTH: usize = 64;
/// Highest divisibility an asset may declare (decimal places)
pub const MAX_UNITS: u8 = 8;
/// Largest quantity whose issuance record replays exactly as an `f64` amount
pub const MAX_QUANTITY: u64 = 1 << 53;

/// Issuance metadata for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub issuer: String,

    /// Total quantity issued
    pub quantity: u64,

    /// Divisibility: number of decimal places the asset may be split into
    pub units: u8,

    /// Whether off-chain metadata is attached
    pub has_ipfs: bool,

    /// Content hash of the off-chain metadata
    pub ipfs_hash: Option<String>,

    /// Seconds since the Unix epoch
    pub created_at: f64,
}

impl AssetRecord {
    pub fn new(
        issuer: &str,
        quantity: u64,
        units: u8,
        has_ipfs: bool,
        ipfs_hash: Option<String>,
    ) -> Result<Self> {
        if issuer.is_empty() {
            return Err(ChainError::InvalidAsset("Issuer cannot be empty".to_string()));
        }
        if quantity > MAX_QUANTITY {
            return Err(ChainError::InvalidAsset(format!(
                "Quantity must be at most {}, got {}",
                MAX_QUANTITY, quantity
            )));
        }
        if units > MAX_UNITS {
            return Err(ChainError::InvalidAsset(format!(
                "Units must be at most {}, got {}",
                MAX_UNITS, units
            )));
        }
        match (has_ipfs, &ipfs_hash) {
            (true, None) => {
                return Err(ChainError::InvalidAsset(
                    "Metadata flag set without a content hash".to_string(),
                ))
            }
            (false, Some(_)) => {
                return Err(ChainError::InvalidAsset(
                    "Content hash given without the metadata flag".to_string(),
                ))
            }
            _ => {}
        }

        Ok(AssetRecord {
            issuer: issuer.to_string(),
            quantity,
            units,
            has_ipfs,
            ipfs_hash,
            created_at: now_timestamp(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRegistry {
    assets: BTreeMap<String, AssetRecord>,
    /// The chain's own unit; it exists without issuance
    native_asset: String,
}

impl AssetRegistry {
    pub fn new(native_asset: &str) -> Self {
        AssetRegistry {
            assets: BTreeMap::new(),
            native_asset: native_asset.to_string(),
        }
    }

    /// Insert `record` under `name`. Fails without touching the registry if
    /// the name is malformed or already taken.
    pub fn register(&mut self, name: &str, record: AssetRecord) -> Result<()> {
        validate_asset_name(name, &self.native_asset)?;
        if self.assets.contains_key(name) {
            return Err(ChainError::DuplicateAsset(name.to_string()));
        }
        self.assets.insert(name.to_string(), record);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AssetRecord> {
        self.assets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// Assets in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AssetRecord)> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

fn validate_asset_name(name: &str, native_asset: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ChainError::InvalidAsset("Asset name cannot be empty".to_string()));
    }
    if name.len() > MAX_ASSET_NAME_LENGTH {
        return Err(ChainError::InvalidAsset(format!(
            "Asset name exceeds maximum length of {} characters",
            MAX_ASSET_NAME_LENGTH
        )));
    }
    if name == native_asset {
        return Err(ChainError::InvalidAsset(format!(
            "{} is the native asset and cannot be issued",
            name
        )));
    }
    Ok(())
}
