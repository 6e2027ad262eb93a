use actix_web::{HttpResponse, Responder, get, post, web};
use log::warn;

use super::models::{AppState, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::network::{Resolution, normalize_address};

/// Register a batch of peers. The batch is rejected as a whole if any
/// address is malformed.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    let Some(nodes) = body.into_inner().nodes else {
        return HttpResponse::BadRequest().body("Error: Please supply a valid list of nodes");
    };

    let locations = match nodes
        .iter()
        .map(|n| normalize_address(n))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(locations) => locations,
        Err(e) => {
            warn!("POST /nodes/register - {e}");
            return HttpResponse::BadRequest().body(e.to_string());
        }
    };
    for location in &locations {
        if let Err(e) = state.node.register_peer(location) {
            return HttpResponse::BadRequest().body(e.to_string());
        }
    }

    HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added",
        total_nodes: state.node.peers(),
    })
}

/// Run a consensus round against every registered peer.
#[get("/nodes/resolve")]
pub async fn resolve(state: web::Data<AppState>) -> impl Responder {
    let resolution = state.node.resolve_consensus(&state.fetcher).await;
    let (chain, _) = state.node.get_chain();
    let message = match resolution {
        Resolution::Replaced => "Chain was replaced",
        Resolution::Kept => "Chain is authoritative",
    };
    HttpResponse::Ok().json(ResolveResponse {
        message,
        chain: &chain,
    })
}
