//! HTTP routes of the engine server.

use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};

use chess_vs_engine_core::protocol::{
    DifficultyRequest, DifficultyResponse, ErrorResponse, MoveRequest,
};
use chess_vs_engine_core::Difficulty;

use crate::state::{AppState, MoveFailure};

/// HTTP handler for the index page
async fn index() -> impl Responder {
    HttpResponse::Ok().body("Chess engine server")
}

/// `POST /move`: apply the player's move and answer with the engine's
/// reply. Move processing blocks on the engine, so it runs off the
/// async workers.
async fn submit_move(state: web::Data<AppState>, body: web::Json<MoveRequest>) -> HttpResponse {
    let parsed = match body.mv.parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Malformed move record {}: {}", body.mv, e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: e.to_string(),
            });
        }
    };

    let state = state.clone();
    match web::block(move || state.process_move(parsed)).await {
        Ok(Ok(response)) => HttpResponse::Ok().json(response),
        Ok(Err(MoveFailure::Rejected(message))) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Ok(Err(MoveFailure::Engine(message))) => {
            HttpResponse::InternalServerError().json(ErrorResponse { error: message })
        }
        Err(e) => {
            error!("Blocking pool failure: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "internal error".to_string(),
            })
        }
    }
}

/// `POST /set_difficulty`: switch the engine strength for upcoming
/// replies.
async fn set_difficulty(
    state: web::Data<AppState>,
    body: web::Json<DifficultyRequest>,
) -> HttpResponse {
    match body.difficulty.parse::<Difficulty>() {
        Ok(level) => {
            *state.difficulty.lock().unwrap() = level;
            info!("Difficulty set to {}", level);
            HttpResponse::Ok().json(DifficultyResponse {
                status: "success".to_string(),
                difficulty: level.to_string(),
            })
        }
        Err(e) => {
            warn!("Rejected difficulty {:?}", body.difficulty);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/move").route(web::post().to(submit_move)))
        .service(web::resource("/set_difficulty").route(web::post().to(set_difficulty)));
}
