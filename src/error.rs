use thiserror::Error;

/// Failures surfaced by the ledger node.
///
/// Chain validity and proof checks are plain predicates and never produce
/// one of these.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Peer registration input had neither a network location nor a path.
    #[error("invalid peer address: {0:?}")]
    InvalidAddress(String),

    /// A peer could not be reached or answered with a non-success response.
    #[error("failed to fetch chain from {peer}: {reason}")]
    FetchFailed { peer: String, reason: String },

    /// The tip kept moving while a proof was being searched for.
    #[error("chain tip changed during mining ({attempts} attempts)")]
    StaleTip { attempts: usize },

    /// The proof search was aborted before a proof was found.
    #[error("mining aborted")]
    MiningAborted,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
