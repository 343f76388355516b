// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Deterministic 128-bit identifiers for points transactions and stock purchases.

use std::fmt::Write;

use blake3::Hasher;

pub const UID_LEN: usize = 16;
pub type LedgerUid = [u8; UID_LEN];

struct UidBuilder {
    hasher: Hasher,
}

impl UidBuilder {
    fn new(domain: &[u8]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(&(domain.len() as u32).to_le_bytes());
        hasher.update(domain);
        Self { hasher }
    }

    fn write_str(&mut self, value: &str) -> &mut Self {
        self.hasher.update(&(value.len() as u32).to_le_bytes());
        self.hasher.update(value.as_bytes());
        self
    }

    fn write_i64(&mut self, value: i64) -> &mut Self {
        self.hasher.update(&value.to_le_bytes());
        self
    }

    fn write_u64(&mut self, value: u64) -> &mut Self {
        self.hasher.update(&value.to_le_bytes());
        self
    }

    fn finish(self) -> LedgerUid {
        let hash = self.hasher.finalize();
        let mut bytes = [0u8; UID_LEN];
        bytes.copy_from_slice(&hash.as_bytes()[..UID_LEN]);
        bytes
    }
}

/// Build a UID for a points transaction. `sequence` is the per-user event counter.
pub fn transaction_uid(user_id: &str, sequence: u64, timestamp_ns: i64) -> LedgerUid {
    let mut builder = UidBuilder::new(b"points_transaction_uid.v1");
    builder
        .write_str(user_id)
        .write_u64(sequence)
        .write_i64(timestamp_ns);
    builder.finish()
}

/// Build a UID for a stock purchase receipt.
pub fn purchase_uid(user_id: &str, offer_id: &str, sequence: u64, timestamp_ns: i64) -> LedgerUid {
    let mut builder = UidBuilder::new(b"stock_purchase_uid.v1");
    builder
        .write_str(user_id)
        .write_str(offer_id)
        .write_u64(sequence)
        .write_i64(timestamp_ns);
    builder.finish()
}

/// Render a UID as `<prefix>_<lowercase hex>`.
pub fn format_uid(prefix: &str, uid: &LedgerUid) -> String {
    let mut out = String::with_capacity(prefix.len() + 1 + UID_LEN * 2);
    out.push_str(prefix);
    out.push('_');
    for byte in uid {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_uid_is_deterministic() {
        let a = transaction_uid("alice", 3, 1_700_000_000);
        let b = transaction_uid("alice", 3, 1_700_000_000);
        assert_eq!(a, b);
        assert_ne!(a, transaction_uid("alice", 4, 1_700_000_000));
        assert_ne!(a, transaction_uid("bob", 3, 1_700_000_000));
    }

    #[test]
    fn purchase_and_transaction_domains_differ() {
        let txn = transaction_uid("alice", 1, 0);
        let buy = purchase_uid("alice", "", 1, 0);
        assert_ne!(txn, buy);
    }

    #[test]
    fn format_uid_renders_hex() {
        let uid = [0xabu8; UID_LEN];
        let rendered = format_uid("txn", &uid);
        assert_eq!(rendered.len(), 3 + 1 + UID_LEN * 2);
        assert!(rendered.starts_with("txn_abab"));
    }
}
