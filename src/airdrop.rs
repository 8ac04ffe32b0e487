//! Merkle tree over airdrop claims, in the layout the merkle airdrop
//! contract verifies against:
//!
//! * leaf = `sha256(address ++ amount)`, amount in decimal,
//! * parent = `sha256(min(a, b) ++ max(a, b))`,
//! * an unpaired node at the end of a level moves up unchanged.
//!
//! Roots and proofs are lower-case hex.

use cosmwasm_std::Uint128;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use thiserror::Error;

type Hash = [u8; 32];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirdropEntry {
    pub address: String,
    pub amount: Uint128,
}

impl AirdropEntry {
    pub fn new<S: Into<String>>(address: S, amount: u128) -> Self {
        Self {
            address: address.into(),
            amount: Uint128::new(amount),
        }
    }
}

#[derive(Error, Debug)]
pub enum AirdropError {
    #[error("airdrop claim list is empty")]
    Empty,

    #[error("error reading airdrop claim list")]
    Io(#[from] std::io::Error),

    #[error("malformed airdrop claim list")]
    Json(#[from] serde_json::Error),

    #[error("invalid hex hash: {value:?}")]
    Hex { value: String },
}

#[derive(Clone, Debug)]
pub struct Airdrop {
    entries: Vec<AirdropEntry>,
    // levels[0] are the leaves, the last level holds only the root
    levels: Vec<Vec<Hash>>,
}

impl Airdrop {
    pub fn new(entries: Vec<AirdropEntry>) -> Result<Self, AirdropError> {
        if entries.is_empty() {
            return Err(AirdropError::Empty);
        }

        let leaves: Vec<Hash> = entries
            .iter()
            .map(|e| leaf(&e.address, e.amount))
            .collect();

        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let next = levels[levels.len() - 1]
                .chunks(2)
                // an unpaired last node moves up unchanged
                .filter_map(|pair| pair.iter().copied().reduce(|a, b| parent(&a, &b)))
                .collect();
            levels.push(next);
        }

        Ok(Self { entries, levels })
    }

    /// Reads a json list of `{ "address": ..., "amount": "..." }`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AirdropError> {
        let raw = fs::read(path)?;
        Self::new(serde_json::from_slice(&raw)?)
    }

    pub fn entries(&self) -> &[AirdropEntry] {
        &self.entries
    }

    pub fn root(&self) -> String {
        hex::encode(self.levels[self.levels.len() - 1][0])
    }

    /// Sibling hashes from the claim's leaf up to the root, or `None` when
    /// the claim is not part of this airdrop.
    pub fn proof(&self, address: &str, amount: Uint128) -> Option<Vec<String>> {
        let target = leaf(address, amount);
        let mut idx = self.levels[0].iter().position(|h| *h == target)?;

        let mut proof = vec![];
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = idx ^ 1;
            if sibling < level.len() {
                proof.push(hex::encode(level[sibling]));
            }
            idx /= 2;
        }
        Some(proof)
    }
}

/// Checks a claim against a root the way the airdrop contract does.
pub fn verify(
    proof: &[String],
    root: &str,
    address: &str,
    amount: Uint128,
) -> Result<bool, AirdropError> {
    let computed = proof
        .iter()
        .try_fold(leaf(address, amount), |hash, p| {
            decode(p).map(|sibling| parent(&hash, &sibling))
        })?;

    Ok(computed == decode(root)?)
}

fn leaf(address: &str, amount: Uint128) -> Hash {
    Sha256::digest(format!("{}{}", address, amount).as_bytes()).into()
}

fn parent(a: &Hash, b: &Hash) -> Hash {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(lo);
    hasher.update(hi);
    hasher.finalize().into()
}

fn decode(value: &str) -> Result<Hash, AirdropError> {
    let mut out = [0u8; 32];
    hex::decode_to_slice(value, &mut out).map_err(|_| AirdropError::Hex {
        value: value.to_string(),
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn claims(n: usize) -> Vec<AirdropEntry> {
        (0..n)
            .map(|i| AirdropEntry::new(format!("juno1claimer{}", i), 1_000_000 * (i as u128 + 1)))
            .collect()
    }

    #[test]
    fn empty_list_is_rejected() {
        assert_matches!(Airdrop::new(vec![]), Err(AirdropError::Empty));
    }

    #[test]
    fn single_claim_root_is_its_leaf() {
        let airdrop = Airdrop::new(claims(1)).unwrap();
        let expected = hex::encode(Sha256::digest(b"juno1claimer01000000"));

        assert_eq!(airdrop.root(), expected);
        assert_eq!(
            airdrop.proof("juno1claimer0", Uint128::new(1_000_000)),
            Some(vec![])
        );
    }

    #[test]
    fn two_claims_hash_as_sorted_pair() {
        let airdrop = Airdrop::new(claims(2)).unwrap();

        let a: Hash = Sha256::digest(b"juno1claimer01000000").into();
        let b: Hash = Sha256::digest(b"juno1claimer12000000").into();
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let expected = hex::encode(Sha256::digest([lo, hi].concat()));

        assert_eq!(airdrop.root(), expected);
        assert_eq!(
            airdrop.proof("juno1claimer0", Uint128::new(1_000_000)),
            Some(vec![hex::encode(b)])
        );
    }

    #[test]
    fn unpaired_leaf_moves_up_unchanged() {
        let airdrop = Airdrop::new(claims(3)).unwrap();

        let leaves: Vec<Hash> = claims(3).iter().map(|e| leaf(&e.address, e.amount)).collect();
        let expected = parent(&parent(&leaves[0], &leaves[1]), &leaves[2]);

        assert_eq!(airdrop.root(), hex::encode(expected));
    }

    #[test]
    fn every_claim_verifies_with_odd_leaf_count() {
        let airdrop = Airdrop::new(claims(5)).unwrap();
        let root = airdrop.root();

        for e in airdrop.entries() {
            let proof = airdrop.proof(&e.address, e.amount).unwrap();
            assert!(verify(&proof, &root, &e.address, e.amount).unwrap());
        }

        // the fifth leaf is promoted twice, so it only needs the root's other child
        let last = &airdrop.entries()[4];
        assert_eq!(airdrop.proof(&last.address, last.amount).unwrap().len(), 1);
    }

    #[test]
    fn wrong_amount_or_address_fails() {
        let airdrop = Airdrop::new(claims(4)).unwrap();
        let root = airdrop.root();
        let proof = airdrop
            .proof("juno1claimer2", Uint128::new(3_000_000))
            .unwrap();

        assert!(!verify(&proof, &root, "juno1claimer2", Uint128::new(3_000_001)).unwrap());
        assert!(!verify(&proof, &root, "juno1claimer3", Uint128::new(3_000_000)).unwrap());
        assert_eq!(airdrop.proof("juno1stranger", Uint128::new(1)), None);
    }

    #[test]
    fn malformed_hex_is_an_error() {
        assert_matches!(
            verify(&["zz".to_string()], "00", "juno1a", Uint128::new(1)),
            Err(AirdropError::Hex { .. })
        );
    }

    #[test]
    fn claim_list_json_uses_string_amounts() {
        let entries: Vec<AirdropEntry> =
            serde_json::from_str(r#"[{"address":"juno1a","amount":"42"}]"#).unwrap();
        assert_eq!(entries, vec![AirdropEntry::new("juno1a", 42)]);
    }
}
