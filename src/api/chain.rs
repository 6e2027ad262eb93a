use actix_web::{HttpResponse, Responder, get, web};
use log::{error, warn};

use super::models::{AppState, ChainResponse, MineResponse};
use crate::blockchain::{MINING_REWARD, REWARD_SENDER};
use crate::transaction::Transaction;

/// Get the full chain and its length.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let (chain, length) = state.node.get_chain();
    HttpResponse::Ok().json(ChainResponse {
        chain: &chain,
        length,
    })
}

/// Mine a new block from the pending pool and credit this node with the
/// reward. The proof search runs on the blocking thread pool.
#[get("/mine")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let miner = state.clone();
    let result = web::block(move || {
        let reward = Transaction::new(REWARD_SENDER, miner.node.id(), MINING_REWARD);
        miner.node.mine_and_seal(Some(reward))
    })
    .await;

    match result {
        Ok(Ok(block)) => HttpResponse::Ok().json(MineResponse {
            message: "New Block forged",
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }),
        Ok(Err(e)) => {
            warn!("GET /mine - {e}");
            HttpResponse::ServiceUnavailable().body(e.to_string())
        }
        Err(e) => {
            error!("GET /mine - mining task failed: {e}");
            HttpResponse::InternalServerError().body("mining task failed")
        }
    }
}
