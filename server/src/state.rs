//! Shared server state and the move-processing sequence.

use std::sync::Mutex;

use chess::Color;
use log::{error, info, warn};

use chess_vs_engine_core::moves::ParsedMove;
use chess_vs_engine_core::protocol::MoveResponse;
use chess_vs_engine_core::status::wire_status;
use chess_vs_engine_core::{Difficulty, GameSession};

use crate::engine::MoveProvider;

/// Application state shared between request handlers. One game per
/// process; the player is always White and the engine answers as
/// Black.
pub struct AppState {
    pub session: Mutex<GameSession>,
    pub difficulty: Mutex<Difficulty>,
    pub engine: Mutex<Box<dyn MoveProvider>>,
}

/// Why a move request did not produce a normal reply.
#[derive(Debug, PartialEq, Eq)]
pub enum MoveFailure {
    /// The request itself is at fault; reported as a client error.
    Rejected(String),
    /// The engine let us down; the player's move stays on the board.
    Engine(String),
}

impl AppState {
    pub fn new(engine: Box<dyn MoveProvider>) -> Self {
        AppState {
            session: Mutex::new(GameSession::new()),
            difficulty: Mutex::new(Difficulty::default()),
            engine: Mutex::new(engine),
        }
    }

    /// Validate and apply the player's move, then ask the engine for
    /// its reply and apply that too. The session lock is held for the
    /// whole sequence so requests cannot interleave mid-exchange.
    pub fn process_move(&self, mv: ParsedMove) -> Result<MoveResponse, MoveFailure> {
        let mut session = self.session.lock().unwrap();

        if session.is_game_over() {
            warn!("Rejected {}: the game is over", mv);
            return Err(MoveFailure::Rejected("Game over".to_string()));
        }
        if session.side_to_move() != Color::White {
            warn!("Rejected {}: not the player's turn", mv);
            return Err(MoveFailure::Rejected("Not your turn".to_string()));
        }
        if session.apply_player(mv).is_err() {
            warn!("Rejected illegal move {}", mv);
            return Err(MoveFailure::Rejected("Invalid move".to_string()));
        }
        info!("Player played {}, history: {}", mv, session.history_line());

        if session.is_game_over() {
            let status = wire_status(&session);
            info!("Game over after the player's move: {}", status);
            return Ok(MoveResponse {
                best_move: None,
                fen: session.fen(),
                status,
            });
        }

        let difficulty = *self.difficulty.lock().unwrap();
        let reply = {
            let mut engine = self.engine.lock().unwrap();
            engine.best_move(&session.fen(), difficulty).map_err(|e| {
                error!("Engine failed to produce a move: {}", e);
                MoveFailure::Engine(e.to_string())
            })?
        };
        let reply = match reply {
            Some(m) => m,
            None => {
                // A live position always has a legal move.
                error!("Engine returned no move in a live position");
                return Err(MoveFailure::Engine("engine returned no move".to_string()));
            }
        };
        if session.apply_reply(reply).is_err() {
            error!("Engine suggested illegal move {}", reply);
            return Err(MoveFailure::Engine(format!(
                "engine played illegal move {}",
                reply
            )));
        }
        info!("Engine replied {}, history: {}", reply, session.history_line());

        Ok(MoveResponse {
            best_move: Some(reply.to_string()),
            fen: session.fen(),
            status: wire_status(&session),
        })
    }
}
