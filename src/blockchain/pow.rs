use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};

use super::Block;

/// Proof-of-Work puzzle parameters.
///
/// A proof `p` is valid after a previous proof `lp` and a reference hash `h`
/// when `sha256("{lp}{p}{h}")` in hex starts with `difficulty` zeros. The
/// reference hash is always the hash of the previous block, both when mining
/// and when validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl ProofOfWork {
    pub fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    /// Check the difficulty predicate for a (previous proof, proof, reference hash) triple.
    pub fn valid_proof(&self, last_proof: u64, proof: u64, reference_hash: &str) -> bool {
        let guess = format!("{last_proof}{proof}{reference_hash}");
        let digest = hex::encode(Sha256::digest(guess.as_bytes()));
        let target_prefix = "0".repeat(self.difficulty);
        digest.starts_with(&target_prefix)
    }

    /// Find a proof for the block following `last_block` with `strategy`.
    /// `SequentialSearch` yields the smallest `proof >= 0` satisfying the
    /// predicate. Returns `None` if `abort` is raised first.
    pub fn mine<S: ProofSearch + ?Sized>(
        &self,
        last_block: &Block,
        strategy: &S,
        abort: &AtomicBool,
    ) -> Option<u64> {
        strategy.search(self, last_block.proof, &last_block.hash(), abort)
    }
}

/// A way of searching for a proof. Validation only checks the final
/// (proof, hash) pair, so any strategy producing a valid proof is acceptable.
pub trait ProofSearch: Send + Sync {
    fn search(
        &self,
        pow: &ProofOfWork,
        last_proof: u64,
        reference_hash: &str,
        abort: &AtomicBool,
    ) -> Option<u64>;
}

/// Ascending search over `0, 1, 2, ...`; returns the smallest valid proof.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSearch;

impl ProofSearch for SequentialSearch {
    fn search(
        &self,
        pow: &ProofOfWork,
        last_proof: u64,
        reference_hash: &str,
        abort: &AtomicBool,
    ) -> Option<u64> {
        let mut proof = 0u64;
        loop {
            if pow.valid_proof(last_proof, proof, reference_hash) {
                return Some(proof);
            }
            if abort.load(Ordering::Relaxed) {
                return None;
            }
            proof = proof.checked_add(1)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::{ProofOfWork, ProofSearch, SequentialSearch};
    use crate::blockchain::Block;

    fn mine(pow: &ProofOfWork, block: &Block) -> u64 {
        pow.mine(block, &SequentialSearch, &AtomicBool::new(false))
            .unwrap()
    }

    #[test]
    fn mined_proof_satisfies_predicate() {
        let pow = ProofOfWork::new(3);
        let genesis = Block::genesis(0.0);
        let proof = mine(&pow, &genesis);
        assert!(pow.valid_proof(genesis.proof, proof, &genesis.hash()));
    }

    #[test]
    fn mine_returns_smallest_proof() {
        let genesis = Block::genesis(0.0);
        assert_eq!(mine(&ProofOfWork::new(1), &genesis), 2);
        assert_eq!(mine(&ProofOfWork::new(2), &genesis), 44);
        assert_eq!(mine(&ProofOfWork::new(3), &genesis), 3714);

        let pow = ProofOfWork::new(3);
        let h = genesis.hash();
        assert!((0..3714).all(|p| !pow.valid_proof(100, p, &h)));
    }

    #[test]
    fn proof_is_bound_to_previous_block() {
        let pow = ProofOfWork::new(3);
        let genesis = Block::genesis(0.0);
        let proof = mine(&pow, &genesis);
        let other = Block::genesis(1.0);
        assert!(pow.valid_proof(100, proof, &genesis.hash()));
        assert!(!pow.valid_proof(100, proof, &other.hash()));
    }

    #[test]
    fn zero_difficulty_accepts_anything() {
        let pow = ProofOfWork::new(0);
        assert!(pow.valid_proof(1, 2, "whatever"));
        assert_eq!(mine(&pow, &Block::genesis(0.0)), 0);
    }

    #[test]
    fn aborted_search_gives_up() {
        // 64 leading zeros never happens in practice.
        let pow = ProofOfWork::new(64);
        let abort = AtomicBool::new(true);
        assert_eq!(SequentialSearch.search(&pow, 100, "h", &abort), None);
        assert_eq!(pow.mine(&Block::genesis(0.0), &SequentialSearch, &abort), None);
    }
}
