//! Error types for AssetChain

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("Asset already issued: {0}")]
    DuplicateAsset(String),
    #[error("Invalid asset: {0}")]
    InvalidAsset(String),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Invalid block linkage at index {index}")]
    InvalidBlockLinkage { index: usize },
    #[error("Invalid proof of work at index {index}")]
    InvalidProofOfWork { index: usize },
    #[error("Block at position {index} carries index {found}")]
    InvalidBlockIndex { index: usize, found: u64 },
    #[error("Chain is empty; genesis block missing")]
    EmptyChain,
    #[error("Sealing cancelled at nonce {0}")]
    SealCancelled(u64),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl ChainError {
    /// 0-based chain position of a structural failure, if this is one.
    pub fn block_index(&self) -> Option<usize> {
        match self {
            ChainError::InvalidBlockLinkage { index }
            | ChainError::InvalidProofOfWork { index }
            | ChainError::InvalidBlockIndex { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_errors_report_index() {
        assert_eq!(ChainError::InvalidBlockLinkage { index: 3 }.block_index(), Some(3));
        assert_eq!(ChainError::InvalidProofOfWork { index: 0 }.block_index(), Some(0));
        assert_eq!(ChainError::DuplicateAsset("X".into()).block_index(), None);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ChainError::DuplicateAsset("MYTOKEN".into()).to_string(),
            "Asset already issued: MYTOKEN"
        );
        assert_eq!(
            ChainError::InvalidBlockLinkage { index: 2 }.to_string(),
            "Invalid block linkage at index 2"
        );
    }
}
