use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::future::join_all;
use log::{debug, info, warn};

use crate::blockchain::{Block, Ledger, ProofOfWork, ProofSearch, SequentialSearch};
use crate::error::{LedgerError, Result};
use crate::network::{ChainFetcher, PeerRegistry, Resolution, select_chain};
use crate::transaction::Transaction;

/// How many times mining restarts when the tip moves underneath it.
pub const MAX_MINE_ATTEMPTS: usize = 3;

/// One ledger node: the chain and pending pool behind one lock, the peer
/// set behind another.
///
/// Sealing and chain replacement both happen under the ledger lock; proof
/// search runs without it.
pub struct Node {
    id: String,
    pow: ProofOfWork,
    ledger: Mutex<Ledger>,
    peers: Mutex<PeerRegistry>,
    search: Box<dyn ProofSearch>,
    abort: AtomicBool,
}

impl Node {
    pub fn new(id: impl Into<String>, pow: ProofOfWork) -> Self {
        Self::with_ledger(id, pow, Ledger::new())
    }

    pub fn with_ledger(id: impl Into<String>, pow: ProofOfWork, ledger: Ledger) -> Self {
        Self {
            id: id.into(),
            pow,
            ledger: Mutex::new(ledger),
            peers: Mutex::new(PeerRegistry::new()),
            search: Box::new(SequentialSearch),
            abort: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn peer_registry(&self) -> MutexGuard<'_, PeerRegistry> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a transaction; returns the index of the block that will hold it.
    pub fn submit_transaction(&self, sender: &str, recipient: &str, amount: u64) -> u64 {
        let index = self.ledger().submit_transaction(sender, recipient, amount);
        debug!("TX - {sender} -> {recipient} ({amount}) queued for block #{index}");
        index
    }

    /// Mine a proof on the current tip and seal the pending pool on top of it.
    ///
    /// `reward`, when given, joins the pool after the proof is found and just
    /// before sealing. If another block landed while searching, the search is
    /// repeated on the new tip.
    pub fn mine_and_seal(&self, mut reward: Option<Transaction>) -> Result<Block> {
        for attempt in 1..=MAX_MINE_ATTEMPTS {
            let last = self.ledger().last_block().clone();
            let previous_hash = last.hash();

            let proof = self
                .pow
                .mine(&last, self.search.as_ref(), &self.abort)
                .ok_or(LedgerError::MiningAborted)?;

            let mut ledger = self.ledger();
            if ledger.last_block().hash() != previous_hash {
                warn!(
                    "MINER - tip moved past #{} while mining (attempt {attempt})",
                    last.index
                );
                continue;
            }

            if let Some(tx) = reward.take() {
                ledger.submit_transaction(tx.sender, tx.recipient, tx.amount);
            }
            let block = ledger.seal_block(proof, Some(previous_hash)).clone();
            info!(
                "MINER - sealed block #{} (proof={}, txs={})",
                block.index,
                block.proof,
                block.transactions.len()
            );
            return Ok(block);
        }

        Err(LedgerError::StaleTip {
            attempts: MAX_MINE_ATTEMPTS,
        })
    }

    /// Stop any running and future proof search.
    pub fn abort_mining(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    /// Snapshot of the chain and its length.
    pub fn get_chain(&self) -> (Vec<Block>, usize) {
        let ledger = self.ledger();
        (ledger.chain().to_vec(), ledger.len())
    }

    pub fn register_peer(&self, address: &str) -> Result<()> {
        self.peer_registry().register(address)
    }

    pub fn peers(&self) -> Vec<String> {
        self.peer_registry().iter().cloned().collect()
    }

    /// Poll every peer concurrently and adopt the longest valid chain if it
    /// is strictly longer than ours.
    pub async fn resolve_consensus<F: ChainFetcher>(&self, fetcher: &F) -> Resolution {
        let peers = self.peers();
        let local_len = self.ledger().len();
        debug!(
            "CONSENSUS - polling {} peers (local length {local_len})",
            peers.len()
        );

        let observations = join_all(peers.into_iter().map(move |peer| async move {
            let observed = fetcher.fetch_chain(&peer).await;
            (peer, observed)
        }))
        .await;

        let Some(candidate) = select_chain(local_len, observations, &self.pow) else {
            info!("CONSENSUS - local chain is authoritative ({local_len} blocks)");
            return Resolution::Kept;
        };

        let mut ledger = self.ledger();
        if candidate.chain.len() <= ledger.len() {
            info!(
                "CONSENSUS - local chain grew to {} blocks during the round; keeping it",
                ledger.len()
            );
            return Resolution::Kept;
        }
        ledger.replace_chain(candidate.chain);
        Resolution::Replaced
    }
}

#[cfg(test)]
impl Node {
    /// Swap the proof search strategy.
    fn with_search(mut self, search: impl ProofSearch + 'static) -> Self {
        self.search = Box::new(search);
        self
    }

    fn pow(&self) -> &ProofOfWork {
        &self.pow
    }
}
