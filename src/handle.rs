//! Thread-safe handle to a ledger
//!
//! The nonce search runs without holding the ledger lock. Submissions and
//! reads proceed while a block is being sealed; readers only ever see the
//! chain as it stood after some completed seal. Seals themselves are
//! serialized, so the tip cannot move under a running search.

use crate::assets::AssetRecord;
use crate::blockchain::{Block, Blockchain};
use crate::error::Result;
use crate::miner::mine_block_with_cancel;
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Blockchain>>,
    seal_lock: Arc<Mutex<()>>,
}

impl SharedLedger {
    pub fn new(chain: Blockchain) -> Self {
        SharedLedger {
            inner: Arc::new(RwLock::new(chain)),
            seal_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Read access to the ledger. Hold the guard briefly; submissions
    /// wait while it is alive.
    pub fn read(&self) -> RwLockReadGuard<'_, Blockchain> {
        self.inner.read()
    }

    pub fn submit_transaction(
        &self,
        sender: &str,
        recipient: &str,
        amount: f64,
        asset_name: &str,
    ) -> Result<u64> {
        self.inner
            .write()
            .submit_transaction(sender, recipient, amount, asset_name)
    }

    pub fn issue_asset(
        &self,
        issuer: &str,
        asset_name: &str,
        quantity: u64,
        units: u8,
        has_ipfs: bool,
        ipfs_hash: Option<String>,
    ) -> Result<AssetRecord> {
        self.inner
            .write()
            .issue_asset(issuer, asset_name, quantity, units, has_ipfs, ipfs_hash)
            .cloned()
    }

    pub fn balance_of(&self, address: &str, asset_name: &str) -> f64 {
        self.inner.read().balance_of(address, asset_name)
    }

    pub fn is_valid(&self) -> bool {
        self.inner.read().is_valid()
    }

    /// Seal the pending buffer on the calling thread.
    ///
    /// The buffer is drained under the write lock, searched without it, and
    /// the sealed block appended under the write lock again. If `cancel` is
    /// raised the drained transactions go back to the front of the buffer.
    pub fn seal_next_block(&self, cancel: &AtomicBool) -> Result<Block> {
        let _sealing = self.seal_lock.lock();

        let (mut block, difficulty) = {
            let mut chain = self.inner.write();
            (chain.begin_block(None)?, chain.difficulty())
        };

        if let Err(e) = mine_block_with_cancel(&mut block, difficulty, cancel) {
            warn!("Sealing of block {} stopped: {}", block.index, e);
            self.inner.write().restore_pending(block.transactions);
            return Err(e);
        }

        self.inner.write().append_sealed(block).cloned()
    }

    /// Seal on a dedicated worker thread. Completion of the returned handle
    /// is the only signal; raise `cancel` to give up early.
    pub fn spawn_seal(&self, cancel: Arc<AtomicBool>) -> JoinHandle<Result<Block>> {
        let ledger = self.clone();
        std::thread::spawn(move || {
            let result = ledger.seal_next_block(&cancel);
            if let Ok(block) = &result {
                info!("Worker sealed block {}", block.index);
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainError;
    use std::sync::atomic::Ordering;

    fn shared(difficulty: u32) -> SharedLedger {
        SharedLedger::new(Blockchain::with_difficulty(difficulty).unwrap())
    }

    #[test]
    fn test_seal_on_caller_thread() {
        let ledger = shared(1);
        ledger.issue_asset("I", "TOK", 10, 0, false, None).unwrap();

        let cancel = AtomicBool::new(false);
        let block = ledger.seal_next_block(&cancel).unwrap();
        assert_eq!(block.index, 1);
        assert_eq!(ledger.balance_of("I", "TOK"), 10.0);
        assert!(ledger.is_valid());
    }

    #[test]
    fn test_spawned_seal_completes() {
        let ledger = shared(2);
        ledger.submit_transaction("a", "b", 3.0, "RVN").unwrap();

        let handle = ledger.spawn_seal(Arc::new(AtomicBool::new(false)));
        let block = handle.join().unwrap().unwrap();

        assert_eq!(block.transactions.len(), 1);
        assert_eq!(ledger.read().blocks().len(), 2);
        assert_eq!(ledger.balance_of("b", "RVN"), 3.0);
    }

    #[test]
    fn test_cancelled_worker_restores_buffer() {
        let ledger = shared(2);
        ledger.submit_transaction("a", "b", 1.0, "RVN").unwrap();

        // Raised before the worker starts, so no nonce is ever tried.
        let cancel = Arc::new(AtomicBool::new(false));
        cancel.store(true, Ordering::Relaxed);
        let result = ledger.spawn_seal(cancel).join().unwrap();

        assert!(matches!(result, Err(ChainError::SealCancelled(_))));
        let chain = ledger.read();
        assert_eq!(chain.blocks().len(), 1);
        assert_eq!(chain.pending_transactions().len(), 1);
    }

    #[test]
    fn test_concurrent_submissions_and_seals() {
        let ledger = shared(1);
        let workers: Vec<_> = (0..4)
            .map(|i| {
                let ledger = ledger.clone();
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        ledger
                            .submit_transaction("faucet", &format!("user{}", i), 1.0, "RVN")
                            .unwrap();
                    }
                    ledger.seal_next_block(&AtomicBool::new(false)).unwrap();
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let chain = ledger.read();
        assert!(chain.is_valid());
        assert_eq!(chain.blocks().len(), 5);
        assert!(chain.pending_transactions().is_empty());
        assert_eq!(chain.native_balance_of("faucet"), -20.0);
        for i in 0..4 {
            assert_eq!(chain.native_balance_of(&format!("user{}", i)), 5.0);
        }
    }
}
