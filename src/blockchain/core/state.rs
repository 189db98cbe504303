//! Balances derived by replaying confirmed history
//!
//! Nothing is indexed incrementally: every query walks every transaction in
//! every sealed block, so cost is linear in the size of the chain.

use super::chain::Block;
use std::collections::BTreeMap;

/// Net balance of `address` in `asset_name` over the given blocks.
pub fn replay_balance(blocks: &[Block], address: &str, asset_name: &str) -> f64 {
    blocks
        .iter()
        .flat_map(|block| block.transactions.iter())
        .map(|tx| tx.balance_delta(address, asset_name))
        .sum()
}

/// Every address touched by one asset, with its net balance.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BalanceSheet {
    pub asset_name: String,
    pub balances: BTreeMap<String, f64>,
}

impl BalanceSheet {
    pub fn replay(blocks: &[Block], asset_name: &str) -> Self {
        let mut balances: BTreeMap<String, f64> = BTreeMap::new();
        for tx in blocks.iter().flat_map(|block| block.transactions.iter()) {
            if tx.asset_name != asset_name {
                continue;
            }
            let sender = (!tx.is_issuance()).then_some(&tx.sender);
            for address in sender.into_iter().chain(std::iter::once(&tx.recipient)) {
                *balances.entry(address.clone()).or_insert(0.0) +=
                    tx.balance_delta(address, asset_name);
            }
        }
        BalanceSheet {
            asset_name: asset_name.to_string(),
            balances,
        }
    }

    pub fn get_balance(&self, address: &str) -> f64 {
        self.balances.get(address).copied().unwrap_or(0.0)
    }

    /// Sum over all addresses; equals the issued supply when only
    /// issuance and transfers have been recorded.
    pub fn total(&self) -> f64 {
        self.balances.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;

    fn block_with(index: u64, txs: Vec<Transaction>) -> Block {
        Block::with_timestamp(index, txs, "0".to_string(), index as f64)
    }

    #[test]
    fn test_replay_balance_across_blocks() {
        let blocks = vec![
            block_with(0, vec![]),
            block_with(1, vec![Transaction::with_timestamp("I", "I", 1000.0, "TOK", 1.0)]),
            block_with(
                2,
                vec![
                    Transaction::with_timestamp("I", "R1", 100.0, "TOK", 2.0),
                    Transaction::with_timestamp("I", "R2", 50.0, "TOK", 3.0),
                ],
            ),
        ];

        assert_eq!(replay_balance(&blocks, "I", "TOK"), 850.0);
        assert_eq!(replay_balance(&blocks, "R1", "TOK"), 100.0);
        assert_eq!(replay_balance(&blocks, "R2", "TOK"), 50.0);
        assert_eq!(replay_balance(&blocks, "I", "RVN"), 0.0);
    }

    #[test]
    fn test_negative_balances_are_reported() {
        let blocks = vec![block_with(
            1,
            vec![Transaction::with_timestamp("broke", "rich", 5.0, "RVN", 0.0)],
        )];
        assert_eq!(replay_balance(&blocks, "broke", "RVN"), -5.0);
    }

    #[test]
    fn test_balance_sheet_matches_replay() {
        let blocks = vec![block_with(
            1,
            vec![
                Transaction::with_timestamp("I", "I", 10.0, "TOK", 0.0),
                Transaction::with_timestamp("I", "A", 4.0, "TOK", 1.0),
                Transaction::with_timestamp("A", "B", 1.5, "TOK", 2.0),
                Transaction::with_timestamp("A", "B", 9.0, "RVN", 3.0),
            ],
        )];

        let sheet = BalanceSheet::replay(&blocks, "TOK");
        for address in ["I", "A", "B"] {
            assert_eq!(sheet.get_balance(address), replay_balance(&blocks, address, "TOK"));
        }
        assert_eq!(sheet.balances.len(), 3);
        assert_eq!(sheet.total(), 10.0);
        assert_eq!(sheet.get_balance("nobody"), 0.0);
    }
}
