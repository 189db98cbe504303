//! Canonical encoding and hashing shared by transactions and blocks
//!
//! A value is first lowered to a `serde_json::Value` and then written out with
//! object keys sorted at every depth. The digest is SHA-256 over those bytes,
//! so two values with the same field contents always hash identically no
//! matter which order their fields were produced in.

use serde_json::Value;
use sha2::{Digest, Sha256};

pub type Sha256Hash = [u8; 32];

/// Number of hex characters in a rendered digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Types that take part in block hashing.
pub trait CanonicalEncode {
    /// Field-level view of the value. Key order here is irrelevant.
    fn canonical_value(&self) -> Value;

    fn canonical_bytes(&self) -> Vec<u8> {
        encode(&self.canonical_value())
    }

    fn digest(&self) -> Sha256Hash {
        sha256(&self.canonical_bytes())
    }

    fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

pub fn sha256(bytes: &[u8]) -> Sha256Hash {
    Sha256::digest(bytes).into()
}

/// Compact JSON with recursively sorted object keys.
///
/// Output must stay byte-identical to `serde_json::to_vec` on the same value.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut out = String::new();
    write_value(value, &mut out);
    out.into_bytes()
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_key(key, out);
                write_value(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_key(key: &str, out: &mut String) {
    out.push_str(&Value::String(key.to_string()).to_string());
    out.push(':');
}

/// Canonical encoding of an object cut around the value of one top-level field.
///
/// `prefix ++ encode(field value) ++ suffix == encode(value)`. Returns `None`
/// when `value` is not an object or has no such field.
pub fn split_at_field(value: &Value, field: &str) -> Option<(Vec<u8>, Vec<u8>)> {
    let map = value.as_object()?;
    if !map.contains_key(field) {
        return None;
    }

    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut prefix = String::from("{");
    let mut suffix = String::new();
    let mut past_field = false;
    for (i, (key, val)) in entries.into_iter().enumerate() {
        let out = if past_field { &mut suffix } else { &mut prefix };
        if i > 0 {
            out.push(',');
        }
        write_key(key, out);
        if key == field {
            past_field = true;
        } else {
            write_value(val, out);
        }
    }
    suffix.push('}');

    Some((prefix.into_bytes(), suffix.into_bytes()))
}

/// True when the first `difficulty` hex characters of the digest are `'0'`.
pub fn meets_difficulty(hash: &Sha256Hash, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    if difficulty > DIGEST_HEX_LEN {
        return false;
    }
    let full_bytes = difficulty / 2;
    if hash[..full_bytes].iter().any(|b| *b != 0) {
        return false;
    }
    difficulty % 2 == 0 || hash[full_bytes] >> 4 == 0
}

/// Same predicate as [`meets_difficulty`] over a rendered hex digest.
pub fn hex_meets_difficulty(hash_hex: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash_hex.len() >= difficulty && hash_hex.bytes().take(difficulty).all(|c| c == b'0')
}
