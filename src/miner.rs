//! Proof-of-work sealing
//!
//! A block is sealed by a linear nonce search from zero: the first nonce whose
//! block digest starts with `difficulty` hex zeros wins. The search has no
//! upper bound; on average it takes 16^difficulty attempts.
//!
//! The canonical block encoding is cut around the nonce once, and the SHA-256
//! state over the prefix is reused for every attempt, so the inner loop does
//! not allocate.

use crate::blockchain::Block;
use crate::codec::{meets_difficulty, split_at_field, CanonicalEncode, Sha256Hash, DIGEST_HEX_LEN};
use crate::error::{ChainError, Result};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};

/// Precomputed hashing state for one block under construction.
#[derive(Clone)]
pub struct SealingContext {
    prefix: Sha256,
    suffix: Vec<u8>,
    difficulty: u32,
}

impl SealingContext {
    pub fn new(block: &Block, difficulty: u32) -> Result<Self> {
        if difficulty as usize > DIGEST_HEX_LEN {
            return Err(ChainError::ConfigError(format!(
                "Difficulty {} exceeds the {} hex characters of a digest",
                difficulty, DIGEST_HEX_LEN
            )));
        }
        let (prefix_bytes, suffix) = split_at_field(&block.canonical_value(), "nonce")
            .ok_or_else(|| {
                ChainError::SerializationError(
                    "Block encoding has no nonce field to seal".to_string(),
                )
            })?;

        let mut prefix = Sha256::new();
        prefix.update(&prefix_bytes);
        Ok(SealingContext {
            prefix,
            suffix,
            difficulty,
        })
    }

    /// Digest the block would have with `nonce` set.
    pub fn hash_with_nonce(&self, nonce: u64) -> Sha256Hash {
        let mut buf = [0u8; 20];
        let mut hasher = self.prefix.clone();
        hasher.update(format_decimal(nonce, &mut buf));
        hasher.update(&self.suffix);
        hasher.finalize().into()
    }

    pub fn accepts(&self, nonce: u64) -> bool {
        meets_difficulty(&self.hash_with_nonce(nonce), self.difficulty)
    }
}

// Same digits serde_json emits for a u64.
fn format_decimal(mut n: u64, buf: &mut [u8; 20]) -> &[u8] {
    let mut pos = buf.len();
    loop {
        pos -= 1;
        buf[pos] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    &buf[pos..]
}

/// Seal `block` in place and return the winning nonce.
pub fn mine_block(block: &mut Block, difficulty: u32) -> Result<u64> {
    let context = SealingContext::new(block, difficulty)?;

    let mut nonce = 0u64;
    while !context.accepts(nonce) {
        nonce = nonce.wrapping_add(1);
    }

    block.nonce = nonce;
    Ok(nonce)
}

/// Like [`mine_block`], checking `cancel` before every attempt.
///
/// On cancellation the block's nonce is left untouched and
/// `ChainError::SealCancelled` carries the nonce reached.
pub fn mine_block_with_cancel(
    block: &mut Block,
    difficulty: u32,
    cancel: &AtomicBool,
) -> Result<u64> {
    let context = SealingContext::new(block, difficulty)?;

    let mut nonce = 0u64;
    loop {
        if cancel.load(Ordering::Relaxed) {
            return Err(ChainError::SealCancelled(nonce));
        }
        if context.accepts(nonce) {
            block.nonce = nonce;
            return Ok(nonce);
        }
        nonce = nonce.wrapping_add(1);
    }
}
