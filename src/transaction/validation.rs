/// Stateless checks applied before a transaction enters the pending buffer
use crate::error::{ChainError, Result};
use crate::transaction::types::Transaction;

impl Transaction {
    /// Amount must be a finite, non-negative number.
    ///
    /// Balance sufficiency is deliberately not checked here or anywhere
    /// else; senders are allowed to go negative.
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() {
            return Err(ChainError::InvalidTransaction(format!(
                "Amount must be finite, got {}",
                self.amount
            )));
        }
        if self.amount < 0.0 {
            return Err(ChainError::InvalidTransaction(format!(
                "Amount must not be negative, got {}",
                self.amount
            )));
        }
        if self.asset_name.is_empty() {
            return Err(ChainError::InvalidTransaction(
                "Asset name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Validation for transfers submitted by callers. Self-transfers are
    /// reserved for asset issuance, since they credit the address.
    pub fn validate_transfer(&self) -> Result<()> {
        self.validate()?;
        if self.is_issuance() {
            return Err(ChainError::InvalidTransaction(format!(
                "Sender and recipient are both {}; self-transfers are reserved for issuance",
                self.sender
            )));
        }
        Ok(())
    }
}
