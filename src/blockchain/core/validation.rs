use super::chain::{Block, GENESIS_PREVIOUS_HASH};
use crate::codec::{meets_difficulty, CanonicalEncode};
use crate::error::{ChainError, Result};

/// Walk the chain from genesis and stop at the first structural failure.
///
/// Checked for every block `i`: its index is `i`, it links to the digest of
/// block `i - 1` (genesis links to the sentinel), and its own digest meets
/// `difficulty`. The error names the failing 0-based position.
pub fn validate_chain(blocks: &[Block], difficulty: u32) -> Result<()> {
    if blocks.is_empty() {
        return Err(ChainError::EmptyChain);
    }

    let mut previous_hash = GENESIS_PREVIOUS_HASH.to_string();
    for (i, block) in blocks.iter().enumerate() {
        if block.index != i as u64 {
            return Err(ChainError::InvalidBlockIndex {
                index: i,
                found: block.index,
            });
        }

        if block.previous_hash != previous_hash {
            return Err(ChainError::InvalidBlockLinkage { index: i });
        }

        let digest = block.digest();
        if !meets_difficulty(&digest, difficulty) {
            return Err(ChainError::InvalidProofOfWork { index: i });
        }
        previous_hash = hex::encode(digest);
    }
    Ok(())
}
