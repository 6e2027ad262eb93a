use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, Serializer};
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single sealed block holding a batch of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64, // seconds since epoch (UTC)
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Create the genesis block (first block in every chain).
    pub fn genesis(timestamp: f64) -> Self {
        Self {
            index: 1,
            timestamp,
            transactions: Vec::new(),
            proof: GENESIS_PROOF,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
        }
    }

    /// Whether this block carries the fixed genesis fields.
    pub fn is_genesis(&self) -> bool {
        self.index == 1
            && self.proof == GENESIS_PROOF
            && self.previous_hash == GENESIS_PREVIOUS_HASH
    }

    /// Canonical serialization used for hashing: every object's keys in
    /// lexicographic order, `", "` and `": "` separators, non-ASCII escaped.
    /// Every peer must produce these exact bytes for hash links to agree.
    ///
    /// Going through `serde_json::Value` sorts the keys because its map is a
    /// `BTreeMap` (the `preserve_order` feature must stay off).
    pub fn canonical_json(&self) -> String {
        let value =
            serde_json::to_value(self).expect("block fields are always representable as JSON");
        let mut out = Vec::new();
        value
            .serialize(&mut Serializer::with_formatter(&mut out, CanonicalFormatter))
            .expect("writing JSON into a Vec cannot fail");
        String::from_utf8(out).expect("canonical JSON is ASCII")
    }

    /// SHA-256 of the canonical serialization, as lowercase hex.
    pub fn hash(&self) -> String {
        let digest = Sha256::digest(self.canonical_json().as_bytes());
        hex::encode(digest)
    }
}

/// Spaced separators, ASCII-only output.
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            return Ok(());
        }
        writer.write_all(b", ")
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            return Ok(());
        }
        writer.write_all(b", ")
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    // serde_json escapes quotes, backslashes and control characters itself;
    // everything else outside printable ASCII becomes UTF-16 `\uXXXX` units.
    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        for c in fragment.chars() {
            if (' '..='~').contains(&c) {
                writer.write_all(&[c as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::transaction::Transaction;

    const GENESIS_AT_ZERO_HASH: &str =
        "d5243d5f5a34e89e77c6d803097f973f214f4305d13e07ba676f9cd480b6ef93";

    #[test]
    fn canonical_json_sorts_keys() {
        let b = Block::genesis(0.0);
        assert_eq!(
            b.canonical_json(),
            r#"{"index": 1, "previous_hash": "1", "proof": 100, "timestamp": 0.0, "transactions": []}"#
        );
    }

    #[test]
    fn transactions_are_canonicalized_too() {
        let mut b = Block::genesis(0.0);
        b.transactions.push(Transaction::new("alice", "bob", 5));
        assert!(
            b.canonical_json()
                .contains(r#"[{"amount": 5, "recipient": "bob", "sender": "alice"}]"#)
        );
    }

    #[test]
    fn genesis_hash_is_stable() {
        let b = Block::genesis(0.0);
        assert_eq!(b.hash(), GENESIS_AT_ZERO_HASH);
        assert_eq!(b.hash(), b.clone().hash());
        assert_eq!(b.hash().len(), 64);
    }

    #[test]
    fn non_ascii_is_escaped_as_utf16_units() {
        let mut b = Block::genesis(0.0);
        b.transactions.push(Transaction::new("zo\u{eb}", "bob", 1));
        assert_eq!(
            b.canonical_json(),
            r#"{"index": 1, "previous_hash": "1", "proof": 100, "timestamp": 0.0, "transactions": [{"amount": 1, "recipient": "bob", "sender": "zo\u00eb"}]}"#
        );
        assert_eq!(
            b.hash(),
            "be13ea6e5b8d4174678a8dd18815ab46c26597750bdf432607ea98d387a35211"
        );

        let mut emoji = Block::genesis(0.0);
        emoji.transactions.push(Transaction::new("\u{1f980}", "\n", 1));
        assert!(
            emoji
                .canonical_json()
                .contains(r#""recipient": "\n", "sender": "\ud83e\udd80""#)
        );
    }

    #[test]
    fn single_field_change_alters_hash() {
        let base = Block::genesis(0.0);
        let h = base.hash();

        let mut b = base.clone();
        b.index = 2;
        assert_ne!(h, b.hash());

        let mut b = base.clone();
        b.timestamp = 1.0;
        assert_ne!(h, b.hash());

        let mut b = base.clone();
        b.proof = 101;
        assert_ne!(h, b.hash());

        let mut b = base.clone();
        b.previous_hash = "2".into();
        assert_ne!(h, b.hash());

        let mut b = base;
        b.transactions.push(Transaction::new("a", "b", 1));
        assert_ne!(h, b.hash());
    }

    #[test]
    fn genesis_shape() {
        let b = Block::genesis(12.5);
        assert!(b.is_genesis());
        assert_eq!(b.previous_hash, "1");
        assert_eq!(b.proof, 100);

        let mut not = b.clone();
        not.proof = 0;
        assert!(!not.is_genesis());
    }
}
