use log::{debug, info, warn};
use serde::Serialize;

use super::fetch::RemoteChain;
use crate::blockchain::{Block, ProofOfWork, is_valid};
use crate::error::Result;

/// Outcome of a consensus round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Replaced,
    Kept,
}

/// The chain chosen to replace the local one.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub peer: String,
    pub chain: Vec<Block>,
    tip_hash: String,
}

/// Pick the longest valid chain strictly longer than `local_len` among the
/// observed peer chains.
///
/// Failed fetches and chains whose declared length disagrees with their
/// content are skipped. Among equally long valid chains the one with the
/// smallest tip hash wins, so the choice depends only on the set of
/// observations and not on the order they arrive in.
pub fn select_chain<I>(local_len: usize, observations: I, pow: &ProofOfWork) -> Option<Candidate>
where
    I: IntoIterator<Item = (String, Result<RemoteChain>)>,
{
    let mut best: Option<Candidate> = None;

    for (peer, observed) in observations {
        let remote = match observed {
            Ok(remote) => remote,
            Err(e) => {
                warn!("CONSENSUS - skipping {peer}: {e}");
                continue;
            }
        };

        let length = remote.chain.len();
        if remote.length != length {
            warn!(
                "CONSENSUS - skipping {peer}: declared length {} but sent {length} blocks",
                remote.length
            );
            continue;
        }

        let bar = best.as_ref().map_or(local_len, |c| c.chain.len());
        if length <= local_len || length < bar {
            debug!("CONSENSUS - {peer} has {length} blocks, need more than {bar}");
            continue;
        }

        if !is_valid(&remote.chain, pow) {
            warn!("CONSENSUS - {peer} sent an invalid chain of {length} blocks");
            continue;
        }

        let tip_hash = remote.chain.last().map(Block::hash).unwrap_or_default();
        if let Some(current) = &best {
            if length == current.chain.len() && tip_hash >= current.tip_hash {
                continue;
            }
        }

        debug!("CONSENSUS - {peer} is the new candidate ({length} blocks)");
        best = Some(Candidate {
            peer,
            chain: remote.chain,
            tip_hash,
        });
    }

    if let Some(c) = &best {
        info!(
            "CONSENSUS - adopting chain from {} ({} blocks, local {local_len})",
            c.peer,
            c.chain.len()
        );
    }
    best
}
