//! The board controller: owns the local game session, decides what a
//! drop does, and folds server replies back into the game.

use chess::{Color, Square};
use crossbeam_channel::Sender;
use log::{debug, info, warn};

use chess_vs_engine_core::moves::MoveRecord;
use chess_vs_engine_core::status::{display_status, DisplayStatus};
use chess_vs_engine_core::{Difficulty, GameSession};

use crate::net::{ServerToUi, UiToServer};

/// What the widget should do with a dropped piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The move was applied; the piece stays where it landed.
    Applied,
    /// The move is not playable; the piece snaps back to its source.
    Snapback,
}

pub struct BoardController {
    session: GameSession,
    difficulty: Difficulty,
    /// Set between submitting a move and hearing back; input is frozen
    /// while it is.
    awaiting_reply: bool,
    /// Last networking problem, shown under the board until the next
    /// successful exchange.
    connection_line: Option<String>,
    tx: Sender<UiToServer>,
}

impl BoardController {
    pub fn new(tx: Sender<UiToServer>) -> Self {
        BoardController {
            session: GameSession::new(),
            difficulty: Difficulty::default(),
            awaiting_reply: false,
            connection_line: None,
            tx,
        }
    }

    /// The player dropped a piece. Try the move locally; if the rules
    /// take it, freeze input and send it to the server.
    pub fn handle_drop(&mut self, from: Square, to: Square) -> DropOutcome {
        if !self.accepts_input() {
            return DropOutcome::Snapback;
        }

        let record = MoveRecord::queen_promoting(from, to);
        let parsed = match record.parse() {
            Ok(parsed) => parsed,
            Err(_) => return DropOutcome::Snapback,
        };
        if self.session.apply_player(parsed).is_err() {
            debug!("Snapback: {}{} is not legal here", from, to);
            return DropOutcome::Snapback;
        }
        info!("Played {}, history: {}", record, self.session.history_line());

        self.awaiting_reply = true;
        self.connection_line = None;
        if self.tx.send(UiToServer::SubmitMove(record)).is_err() {
            self.awaiting_reply = false;
            self.connection_line = Some("network worker is gone".to_string());
        }
        DropOutcome::Applied
    }

    /// Fold a worker message back into the game.
    pub fn handle_server_message(&mut self, message: ServerToUi) {
        match message {
            ServerToUi::MoveReply(reply) => {
                self.awaiting_reply = false;
                if let Some(uci) = reply.best_move {
                    match self.session.apply_reply_text(&uci) {
                        Ok(()) => {
                            info!("Engine replied {}, history: {}", uci, self.session.history_line());
                            self.connection_line = None;
                        }
                        Err(e) => {
                            warn!("Dropping engine reply: {}", e);
                            self.connection_line = Some(e.to_string());
                        }
                    }
                } else {
                    info!("No engine reply, server status: {}", reply.status);
                }
                if !reply.fen.is_empty() && reply.fen != self.session.fen() {
                    // Positions should agree move for move.
                    warn!(
                        "Position drift: server has {}, board has {}",
                        reply.fen,
                        self.session.fen()
                    );
                }
            }
            ServerToUi::MoveFailed(e) => {
                self.awaiting_reply = false;
                self.connection_line = Some(e);
            }
            ServerToUi::DifficultyFailed(e) => {
                self.connection_line = Some(e);
            }
        }
    }

    /// Switch the difficulty and tell the server, once per change.
    pub fn set_difficulty(&mut self, level: Difficulty) {
        if level == self.difficulty {
            return;
        }
        self.difficulty = level;
        info!("Difficulty changed to {}", level);
        if self.tx.send(UiToServer::SetDifficulty(level)).is_err() {
            self.connection_line = Some("network worker is gone".to_string());
        }
    }

    /// The player may pick up pieces right now.
    pub fn accepts_input(&self) -> bool {
        !self.awaiting_reply
            && self.session.side_to_move() == Color::White
            && !self.session.is_game_over()
    }

    /// The player may pick up this particular piece.
    pub fn can_pick(&self, square: Square) -> bool {
        self.accepts_input()
            && self.session.current_position().color_on(square) == Some(Color::White)
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn status(&self) -> DisplayStatus {
        display_status(&self.session)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn connection_line(&self) -> Option<&str> {
        self.connection_line.as_deref()
    }
}
