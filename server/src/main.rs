use actix_web::{web, App, HttpServer};
use log::{info, warn};
use std::env;

mod engine;
mod routes;
mod state;

use engine::{MoveProvider, RandomMover, UciEngine};
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // CHESS_ENGINE points at a UCI binary; without it the server still
    // answers, with random moves.
    let provider: Box<dyn MoveProvider> = match env::var("CHESS_ENGINE") {
        Ok(path) => {
            let engine = UciEngine::spawn(&path)?;
            info!("Engine \"{}\" ready ({})", engine.name(), path);
            Box::new(engine)
        }
        Err(_) => {
            warn!("CHESS_ENGINE is not set, replies will be random moves");
            Box::new(RandomMover)
        }
    };

    let app_state = web::Data::new(AppState::new(provider));

    info!("Starting chess engine server at http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure_routes)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
