#[cfg(test)]
use std::sync::atomic::AtomicBool;

use chrono::Utc;

use super::Block;
#[cfg(test)]
use super::{ProofOfWork, SequentialSearch};
use crate::transaction::Transaction;

/// Source of block timestamps, in seconds since the Unix epoch.
pub type Clock = fn() -> f64;

/// Wall-clock time with microsecond resolution.
pub fn system_clock() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// In-memory chain plus the pool of transactions waiting for the next block.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    clock: Clock,
}

impl Ledger {
    /// Initialize a ledger seeded with a genesis block.
    pub fn new() -> Self {
        Self::with_clock(system_clock)
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            chain: vec![Block::genesis(clock())],
            pending: Vec::new(),
            clock,
        }
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Queue a transaction for the next block and return that block's index.
    pub fn submit_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> u64 {
        self.pending.push(Transaction::new(sender, recipient, amount));
        self.last_block().index + 1
    }

    /// Seal every pending transaction into a new block and append it.
    ///
    /// `previous_hash` defaults to the hash of the current last block.
    pub fn seal_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let previous_hash = previous_hash.unwrap_or_else(|| self.last_block().hash());
        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: (self.clock)(),
            transactions: std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        };
        self.chain.push(block);
        self.last_block()
    }

    /// Replace the whole chain. Empty chains are refused.
    pub fn replace_chain(&mut self, chain: Vec<Block>) -> bool {
        if chain.is_empty() {
            return false;
        }
        self.chain = chain;
        true
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

#[cfg(test)]
impl Ledger {
    pub(crate) fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Mine sequentially on the tip and seal the pool on top of it.
    pub(crate) fn mine_next(&mut self, pow: &ProofOfWork) -> &Block {
        let last = self.last_block();
        let proof = pow
            .mine(last, &SequentialSearch, &AtomicBool::new(false))
            .expect("sequential search without abort always finds a proof");
        let previous_hash = last.hash();
        self.seal_block(proof, Some(previous_hash))
    }
}
