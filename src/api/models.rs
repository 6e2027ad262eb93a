use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::network::HttpChainFetcher;
use crate::node::Node;
use crate::transaction::Transaction;

/// Shared application state: the node and the client it polls peers with.
pub struct AppState {
    pub node: Node,
    pub fetcher: HttpChainFetcher,
}

impl AppState {
    pub fn new(node: Node, fetcher: HttpChainFetcher) -> Self {
        Self { node, fetcher }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    #[serde(alias = "receiver")]
    pub recipient: String,
    pub amount: u64,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/* ---------- Nodes API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse<'a> {
    pub message: &'static str,
    pub chain: &'a [Block],
}
