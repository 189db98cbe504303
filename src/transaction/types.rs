/// Transaction types for AssetChain
use crate::codec::CanonicalEncode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Symbol of the chain's own unit; transactions default to it
pub const NATIVE_ASSET: &str = "RVN";

/// Seconds since the Unix epoch, with sub-second precision
pub fn now_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// An asset moving from `sender` to `recipient`.
///
/// Addresses are opaque strings; nothing here is signed. Once built the
/// transaction is never mutated, it is only copied into the block that
/// confirms it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
    #[serde(default = "default_asset_name")]
    pub asset_name: String,
    pub timestamp: f64,
}

fn default_asset_name() -> String {
    NATIVE_ASSET.to_string()
}

impl Transaction {
    /// Build a transaction stamped with the current time.
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
        asset_name: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(sender, recipient, amount, asset_name, now_timestamp())
    }

    /// Transfer of the native asset.
    pub fn native(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Self {
        Self::new(sender, recipient, amount, NATIVE_ASSET)
    }

    pub fn with_timestamp(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
        asset_name: impl Into<String>,
        timestamp: f64,
    ) -> Self {
        Transaction {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
            asset_name: asset_name.into(),
            timestamp,
        }
    }

    /// Hex SHA-256 digest of the canonical encoding
    pub fn hash(&self) -> String {
        self.digest_hex()
    }

    /// An issuance record: the issuer sending an asset to itself
    pub fn is_issuance(&self) -> bool {
        self.sender == self.recipient
    }

    /// Signed effect of this transaction on `address`'s balance of `asset_name`.
    ///
    /// Issuance records only credit, so the issuer ends up holding the
    /// issued quantity once the record is confirmed.
    pub fn balance_delta(&self, address: &str, asset_name: &str) -> f64 {
        if self.asset_name != asset_name {
            0.0
        } else if self.recipient == address {
            self.amount
        } else if self.sender == address {
            -self.amount
        } else {
            0.0
        }
    }
}

impl CanonicalEncode for Transaction {
    fn canonical_value(&self) -> Value {
        json!({
            "sender": self.sender,
            "recipient": self.recipient,
            "amount": self.amount,
            "asset_name": self.asset_name,
            "timestamp": self.timestamp,
        })
    }
}
