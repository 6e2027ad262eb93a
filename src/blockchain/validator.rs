use super::{Block, ProofOfWork};

/// Validate an entire chain: genesis shape, index sequence, hash linkage and
/// proof-of-work at every step.
///
/// Works on any chain value, including one fetched from a peer. The proof of
/// block `i` is checked against the hash of block `i - 1`, the same reference
/// hash the miner uses.
pub fn is_valid(chain: &[Block], pow: &ProofOfWork) -> bool {
    let Some(genesis) = chain.first() else {
        return false;
    };
    if !genesis.is_genesis() {
        return false;
    }

    for pair in chain.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);

        if current.index != prev.index + 1 {
            return false;
        }

        // Check linkage
        let prev_hash = prev.hash();
        if current.previous_hash != prev_hash {
            return false;
        }

        if !pow.valid_proof(prev.proof, current.proof, &prev_hash) {
            return false;
        }
    }

    true
}
