use actix_web::{HttpResponse, Responder, post, web};
use log::info;

use super::models::{AppState, MessageResponse, NewTxRequest};

/// Queue a transaction for the next block.
#[post("/transactions/new")]
pub async fn new_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let index = state
        .node
        .submit_transaction(&body.sender, &body.recipient, body.amount);
    info!(
        "POST /transactions/new - {} -> {} ({}) for block #{index}",
        body.sender, body.recipient, body.amount
    );

    HttpResponse::Created().json(MessageResponse {
        message: format!("Transaction will be added to Block {index}"),
    })
}
