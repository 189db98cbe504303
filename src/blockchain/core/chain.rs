use crate::assets::{AssetRecord, AssetRegistry};
use crate::codec::{meets_difficulty, CanonicalEncode};
use crate::config::LedgerConfig;
use crate::error::{ChainError, Result};
use crate::miner::{mine_block, mine_block_with_cancel};
use crate::transaction::{now_timestamp, Transaction};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use tracing::{debug, info, warn};

use super::state::{replay_balance, BalanceSheet};
use super::validation::validate_chain;

/// Predecessor hash carried by the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";
pub const DEFAULT_DIFFICULTY: u32 = 4;
/// Declared block reward. Sealing a block does not pay it to anyone.
pub const MINING_REWARD: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Block {
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub timestamp: f64,
    pub previous_hash: String,
    pub nonce: u64,
}

impl Block {
    pub fn new(index: u64, transactions: Vec<Transaction>, previous_hash: String) -> Self {
        Self::with_timestamp(index, transactions, previous_hash, now_timestamp())
    }

    pub fn with_timestamp(
        index: u64,
        transactions: Vec<Transaction>,
        previous_hash: String,
        timestamp: f64,
    ) -> Self {
        Block {
            index,
            transactions,
            timestamp,
            previous_hash,
            nonce: 0,
        }
    }

    /// Hex SHA-256 digest of the canonical encoding
    pub fn hash(&self) -> String {
        self.digest_hex()
    }
}

impl CanonicalEncode for Block {
    fn canonical_value(&self) -> Value {
        let transactions: Vec<Value> = self
            .transactions
            .iter()
            .map(|tx| tx.canonical_value())
            .collect();
        json!({
            "index": self.index,
            "transactions": transactions,
            "timestamp": self.timestamp,
            "previous_hash": self.previous_hash,
            "nonce": self.nonce,
        })
    }
}

/// The ledger: sealed blocks, the pending buffer and the asset registry.
///
/// Blocks only ever get appended, and only after their digest meets the
/// configured difficulty. Genesis is sealed during construction, so the chain
/// is never empty for a ledger built through the public constructors.
#[derive(Debug, Clone)]
pub struct Blockchain {
    blocks: Vec<Block>,
    pending: Vec<Transaction>,
    assets: AssetRegistry,
    difficulty: u32,
    mining_reward: f64,
    native_asset: String,
}

impl Blockchain {
    /// Ledger with the default difficulty and native asset.
    pub fn new() -> Result<Self> {
        Self::with_config(&LedgerConfig::default())
    }

    pub fn with_difficulty(difficulty: u32) -> Result<Self> {
        Self::with_config(&LedgerConfig {
            difficulty,
            ..LedgerConfig::default()
        })
    }

    pub fn with_config(config: &LedgerConfig) -> Result<Self> {
        config.validate()?;

        let mut genesis = Block::new(0, Vec::new(), GENESIS_PREVIOUS_HASH.to_string());
        mine_block(&mut genesis, config.difficulty)?;
        info!(
            "Genesis block sealed (difficulty = {}, nonce = {}, hash = {})",
            config.difficulty,
            genesis.nonce,
            genesis.hash()
        );

        Ok(Blockchain {
            blocks: vec![genesis],
            pending: Vec::new(),
            assets: AssetRegistry::new(&config.native_asset),
            difficulty: config.difficulty,
            mining_reward: config.mining_reward,
            native_asset: config.native_asset.clone(),
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn mining_reward(&self) -> f64 {
        self.mining_reward
    }

    pub fn native_asset(&self) -> &str {
        &self.native_asset
    }

    /// The tip of the chain. An empty chain is a broken ledger, not a
    /// normal state, and is reported as `ChainError::EmptyChain`.
    pub fn last_block(&self) -> Result<&Block> {
        self.blocks.last().ok_or(ChainError::EmptyChain)
    }

    pub fn is_valid_proof(&self, block: &Block) -> bool {
        meets_difficulty(&block.digest(), self.difficulty)
    }

    /// Queue a transfer for the next block.
    ///
    /// Returns the index of the block expected to confirm it. Balance
    /// sufficiency is not checked; a sender may go negative.
    pub fn submit_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: f64,
        asset_name: &str,
    ) -> Result<u64> {
        let tx = Transaction::new(sender, recipient, amount, asset_name);
        tx.validate_transfer()?;
        self.enqueue(tx)
    }

    /// Queue a transfer of the native asset.
    pub fn submit_native(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: f64,
    ) -> Result<u64> {
        let native = self.native_asset.clone();
        self.submit_transaction(sender, recipient, amount, &native)
    }

    fn enqueue(&mut self, tx: Transaction) -> Result<u64> {
        let next_index = self.last_block()?.index + 1;
        debug!(
            "Pending transaction {} -> {} ({} {})",
            tx.sender, tx.recipient, tx.amount, tx.asset_name
        );
        self.pending.push(tx);
        Ok(next_index)
    }

    /// Register a new asset and queue its issuance record.
    ///
    /// The issuance is a self-transfer of `quantity` from `issuer`, so the
    /// asset's supply can be rebuilt from the chain alone. The issuer's
    /// balance reflects it once the record is sealed. A second issuance of
    /// the same name fails with `ChainError::DuplicateAsset` and changes
    /// nothing.
    pub fn issue_asset(
        &mut self,
        issuer: &str,
        asset_name: &str,
        quantity: u64,
        units: u8,
        has_ipfs: bool,
        ipfs_hash: Option<String>,
    ) -> Result<&AssetRecord> {
        self.last_block()?;

        let record = AssetRecord::new(issuer, quantity, units, has_ipfs, ipfs_hash)?;
        if let Err(e) = self.assets.register(asset_name, record) {
            warn!("Asset issuance rejected: {}", e);
            return Err(e);
        }

        let tx = Transaction::new(issuer, issuer, quantity as f64, asset_name);
        self.enqueue(tx)?;
        info!("Issued asset {} (quantity = {}, issuer = {})", asset_name, quantity, issuer);
        self.assets
            .get(asset_name)
            .ok_or_else(|| ChainError::InvalidAsset(asset_name.to_string()))
    }

    /// Seal every pending transaction into the next block and append it.
    ///
    /// `previous_hash` defaults to the digest of the current tip. A caller
    /// supplied hash is used as given, even if it does not match the tip; the
    /// resulting chain then fails `is_valid()`.
    pub fn seal_next_block(&mut self, previous_hash: Option<String>) -> Result<&Block> {
        let mut block = self.begin_block(previous_hash)?;
        if let Err(e) = mine_block(&mut block, self.difficulty) {
            self.restore_pending(block.transactions);
            return Err(e);
        }
        self.append_sealed(block)
    }

    /// Like [`Blockchain::seal_next_block`], giving up when `cancel` is set.
    /// A cancelled seal puts its transactions back at the front of the
    /// pending buffer.
    pub fn seal_next_block_with_cancel(
        &mut self,
        previous_hash: Option<String>,
        cancel: &AtomicBool,
    ) -> Result<&Block> {
        let mut block = self.begin_block(previous_hash)?;
        if let Err(e) = mine_block_with_cancel(&mut block, self.difficulty, cancel) {
            self.restore_pending(block.transactions);
            return Err(e);
        }
        self.append_sealed(block)
    }

    /// Drain the pending buffer into an unsealed block on top of the tip.
    pub(crate) fn begin_block(&mut self, previous_hash: Option<String>) -> Result<Block> {
        let tip = self.last_block()?;
        let tip_hash = tip.hash();
        let index = tip.index + 1;

        let previous_hash = match previous_hash {
            Some(hash) => {
                if hash != tip_hash {
                    warn!(
                        "Block {} will link to {} instead of the tip {}",
                        index, hash, tip_hash
                    );
                }
                hash
            }
            None => tip_hash,
        };

        let transactions = std::mem::take(&mut self.pending);
        Ok(Block::new(index, transactions, previous_hash))
    }

    /// Append a block produced by [`Blockchain::begin_block`] once sealed.
    pub(crate) fn append_sealed(&mut self, block: Block) -> Result<&Block> {
        let position = self.blocks.len();
        let expected = self.last_block()?.index + 1;
        if block.index != expected {
            return Err(ChainError::InvalidBlockIndex {
                index: position,
                found: block.index,
            });
        }
        if !self.is_valid_proof(&block) {
            return Err(ChainError::InvalidProofOfWork { index: position });
        }

        info!(
            "Sealed block {} with {} transactions (nonce = {}, hash = {})",
            block.index,
            block.transactions.len(),
            block.nonce,
            block.hash()
        );
        self.blocks.push(block);
        self.last_block()
    }

    /// Put transactions from an abandoned block back ahead of anything
    /// submitted since.
    pub(crate) fn restore_pending(&mut self, mut transactions: Vec<Transaction>) {
        transactions.append(&mut self.pending);
        self.pending = transactions;
    }

    /// Net confirmed balance. Pending transactions are not counted.
    pub fn balance_of(&self, address: &str, asset_name: &str) -> f64 {
        replay_balance(&self.blocks, address, asset_name)
    }

    pub fn native_balance_of(&self, address: &str) -> f64 {
        self.balance_of(address, &self.native_asset)
    }

    /// Confirmed balances of every address that touched `asset_name`.
    pub fn balances(&self, asset_name: &str) -> BTreeMap<String, f64> {
        BalanceSheet::replay(&self.blocks, asset_name).balances
    }

    /// Structural check of the whole chain; the error names the first
    /// failing block.
    pub fn validate(&self) -> Result<()> {
        validate_chain(&self.blocks, self.difficulty)
    }

    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Chain validation failed: {}", e);
                false
            }
        }
    }
}
