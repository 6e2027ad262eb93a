pub mod consensus;
pub mod fetch;
pub mod peers;

pub use consensus::{Resolution, select_chain};
pub use fetch::{ChainFetcher, HttpChainFetcher};
pub use peers::{PeerRegistry, normalize_address};
