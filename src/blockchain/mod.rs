pub mod block;
pub mod model;
pub mod pow;
pub mod validator;

pub use block::Block;
pub use model::Ledger;
pub use pow::{ProofOfWork, ProofSearch, SequentialSearch};
pub use validator::is_valid;

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
pub const DEFAULT_DIFFICULTY: usize = 4;
pub const DIFF_MIN: usize = 1;
/// A SHA-256 hex digest has 64 digits.
pub const DIFF_MAX: usize = 64;

/// Fixed `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Fixed `proof` of the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// Amount credited to the node that seals a block.
pub const MINING_REWARD: u64 = 1;

/// Sender used for reward transactions.
pub const REWARD_SENDER: &str = "0";
