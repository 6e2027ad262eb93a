mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod node;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::warn;

use api::AppState;
use blockchain::ProofOfWork;
use config::NodeConfig;
use network::HttpChainFetcher;
use node::Node;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env();

    let node = Node::new(config.node_id.clone(), ProofOfWork::new(config.difficulty));
    for peer in &config.peers {
        if let Err(e) = node.register_peer(peer) {
            warn!("CONFIG - skipping peer: {e}");
        }
    }

    println!(
        "⛓️ Starting ledger node {} at http://{}:{} (difficulty {})",
        config.node_id, config.host, config.port, config.difficulty
    );

    let state = web::Data::new(AppState::new(
        node,
        HttpChainFetcher::new(config.fetch_timeout),
    ));

    let server_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    // Let any in-flight proof search on the blocking pool wind down.
    state.node.abort_mining();
    Ok(())
}
