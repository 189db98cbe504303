//! Configuration management for AssetChain

use crate::blockchain::{DEFAULT_DIFFICULTY, MINING_REWARD};
use crate::codec::DIGEST_HEX_LEN;
use crate::error::{ChainError, Result};
use crate::transaction::NATIVE_ASSET;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LedgerConfig {
    /// Required leading zero hex characters in every block digest
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    /// Declared only; sealing never pays it out
    #[serde(default = "default_mining_reward")]
    pub mining_reward: f64,
    #[serde(default = "default_native_asset")]
    pub native_asset: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            mining_reward: default_mining_reward(),
            native_asset: default_native_asset(),
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.difficulty as usize > DIGEST_HEX_LEN {
            return Err(ChainError::ConfigError(format!(
                "ledger.difficulty must be at most {}, got {}",
                DIGEST_HEX_LEN, self.difficulty
            )));
        }
        if self.native_asset.trim().is_empty() {
            return Err(ChainError::ConfigError(
                "ledger.native_asset must not be empty".to_string(),
            ));
        }
        if !self.mining_reward.is_finite() || self.mining_reward < 0.0 {
            return Err(ChainError::ConfigError(format!(
                "ledger.mining_reward must be a non-negative number, got {}",
                self.mining_reward
            )));
        }
        Ok(())
    }
}

fn default_difficulty() -> u32 {
    DEFAULT_DIFFICULTY
}

fn default_mining_reward() -> f64 {
    MINING_REWARD
}

fn default_native_asset() -> String {
    NATIVE_ASSET.to_string()
}

/// Load configuration from a TOML file. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let config: Config = match fs::read_to_string(path.as_ref()) {
        Ok(config_str) => toml::from_str(&config_str)?,
        Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
        Err(e) => return Err(e.into()),
    };

    config.ledger.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.ledger, LedgerConfig::default());
        assert_eq!(config.ledger.difficulty, 4);
        assert_eq!(config.ledger.native_asset, "RVN");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[ledger]\ndifficulty = 2").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.ledger.difficulty, 2);
        assert_eq!(config.ledger.mining_reward, 50.0);
    }

    #[test]
    fn test_impossible_difficulty_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ledger]\ndifficulty = 65\n").unwrap();

        assert!(matches!(load_config(&path), Err(ChainError::ConfigError(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ledger\ndifficulty = ").unwrap();

        assert!(matches!(load_config(&path), Err(ChainError::ConfigError(_))));
    }

    #[test]
    fn test_empty_native_asset_rejected() {
        let config = LedgerConfig {
            native_asset: " ".to_string(),
            ..LedgerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
