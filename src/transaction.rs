//! Transaction module split into types and validation for better modularity

pub mod types;
pub mod validation;

pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CanonicalEncode;
    use crate::error::ChainError;

    #[test]
    fn test_new_transaction_stamps_current_time() {
        let before = now_timestamp();
        let tx = Transaction::new("alice", "bob", 5.0, "MYTOKEN");
        let after = now_timestamp();

        assert!(tx.timestamp >= before && tx.timestamp <= after);
        assert_eq!(tx.asset_name, "MYTOKEN");
    }

    #[test]
    fn test_native_transfer_uses_native_asset() {
        let tx = Transaction::native("alice", "bob", 1.0);
        assert_eq!(tx.asset_name, NATIVE_ASSET);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = Transaction::with_timestamp("alice", "bob", 2.5, "MYTOKEN", 1_700_000_000.25);
        let b = Transaction::with_timestamp("alice", "bob", 2.5, "MYTOKEN", 1_700_000_000.25);

        assert_eq!(a.hash(), a.hash());
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.hash().len(), 64);
    }

    #[test]
    fn test_hash_covers_every_field() {
        let base = Transaction::with_timestamp("alice", "bob", 2.5, "MYTOKEN", 10.0);
        let variants = [
            Transaction::with_timestamp("carol", "bob", 2.5, "MYTOKEN", 10.0),
            Transaction::with_timestamp("alice", "carol", 2.5, "MYTOKEN", 10.0),
            Transaction::with_timestamp("alice", "bob", 2.6, "MYTOKEN", 10.0),
            Transaction::with_timestamp("alice", "bob", 2.5, "OTHER", 10.0),
            Transaction::with_timestamp("alice", "bob", 2.5, "MYTOKEN", 11.0),
        ];
        for variant in &variants {
            assert_ne!(base.hash(), variant.hash());
        }
    }

    #[test]
    fn test_canonical_bytes_sorted_by_field_name() {
        let tx = Transaction::with_timestamp("a", "b", 1.5, "RVN", 2.0);
        let encoded = String::from_utf8(tx.canonical_bytes()).unwrap();
        assert_eq!(
            encoded,
            r#"{"amount":1.5,"asset_name":"RVN","recipient":"b","sender":"a","timestamp":2.0}"#
        );
    }

    #[test]
    fn test_balance_delta() {
        let tx = Transaction::with_timestamp("alice", "bob", 3.0, "MYTOKEN", 0.0);
        assert_eq!(tx.balance_delta("bob", "MYTOKEN"), 3.0);
        assert_eq!(tx.balance_delta("alice", "MYTOKEN"), -3.0);
        assert_eq!(tx.balance_delta("carol", "MYTOKEN"), 0.0);
        assert_eq!(tx.balance_delta("bob", NATIVE_ASSET), 0.0);
    }

    #[test]
    fn test_issuance_only_credits() {
        let tx = Transaction::with_timestamp("issuer", "issuer", 1000.0, "MYTOKEN", 0.0);
        assert!(tx.is_issuance());
        assert_eq!(tx.balance_delta("issuer", "MYTOKEN"), 1000.0);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let tx = Transaction::native("alice", "bob", -1.0);
        match tx.validate() {
            Err(ChainError::InvalidTransaction(msg)) => assert!(msg.contains("negative")),
            other => panic!("Expected InvalidTransaction, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_amount_rejected() {
        assert!(Transaction::native("alice", "bob", f64::NAN).validate().is_err());
        assert!(Transaction::native("alice", "bob", f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_zero_amount_allowed() {
        assert!(Transaction::native("alice", "bob", 0.0).validate_transfer().is_ok());
    }

    #[test]
    fn test_self_transfer_rejected_for_callers() {
        let tx = Transaction::native("alice", "alice", 1.0);
        assert!(tx.validate().is_ok());
        assert!(tx.validate_transfer().is_err());
    }

    #[test]
    fn test_missing_asset_name_defaults_to_native() {
        let json = r#"{"sender":"a","recipient":"b","amount":1.0,"timestamp":5.0}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.asset_name, NATIVE_ASSET);
    }
}
