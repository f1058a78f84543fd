//! One game against the engine, with the bookkeeping the displays need.

use std::str::FromStr;

use chess::{Board, ChessMove, Color, Game, GameResult, Piece, Rank, Square};
use thiserror::Error;

use crate::moves::ParsedMove;
use crate::san;
use crate::status;

/// A single game of chess plus its move history in standard algebraic
/// notation and the last move played, which the board highlights.
///
/// The session is deliberately dumb about whose turn it is: turn policy
/// belongs to whoever owns the session. It only refuses moves the rules
/// of chess refuse.
pub struct GameSession {
    game: Game,
    history: Vec<String>,
    last_move: Option<(Square, Square)>,
}

impl GameSession {
    /// Fresh game in the standard starting position.
    pub fn new() -> Self {
        GameSession {
            game: Game::new(),
            history: Vec::new(),
            last_move: None,
        }
    }

    /// Session resumed from a FEN string, with an empty history.
    pub fn from_fen(fen: &str) -> Result<Self, chess::Error> {
        let board = Board::from_str(fen)?;
        Ok(GameSession {
            game: Game::new_with_board(board),
            history: Vec::new(),
            last_move: None,
        })
    }

    /// Apply a move coming from the player's board. The promotion piece
    /// in the record is only honored when the move really is a pawn
    /// reaching the last rank; otherwise it is dropped so that plain
    /// moves carrying the client's default "q" stay legal.
    pub fn apply_player(&mut self, mv: ParsedMove) -> Result<(), IllegalMove> {
        let promotion = self.promotion_for(mv);
        self.apply(ChessMove::new(mv.from, mv.to, promotion))
    }

    /// Apply an engine reply that is already a typed move.
    pub fn apply_reply(&mut self, m: ChessMove) -> Result<(), IllegalMove> {
        self.apply(m)
    }

    /// Apply an engine reply from its wire form, e.g. "e7e5" or "e7e8q".
    pub fn apply_reply_text(&mut self, text: &str) -> Result<(), ReplyError> {
        let m = ChessMove::from_str(text)
            .map_err(|_| ReplyError::Malformed(text.to_string()))?;
        self.apply(m)
            .map_err(|_| ReplyError::Illegal(text.to_string()))
    }

    fn apply(&mut self, m: ChessMove) -> Result<(), IllegalMove> {
        let board = self.game.current_position();
        if !board.legal(m) {
            return Err(IllegalMove(m));
        }
        // Notation needs the position before the move is made.
        let notation = san::standard_notation(&board, m);
        let applied = self.game.make_move(m);
        debug_assert!(applied);
        self.history.push(notation);
        self.last_move = Some((m.get_source(), m.get_dest()));
        Ok(())
    }

    fn promotion_for(&self, mv: ParsedMove) -> Option<Piece> {
        let board = self.game.current_position();
        if board.piece_on(mv.from) != Some(Piece::Pawn) {
            return None;
        }
        let last_rank = match board.color_on(mv.from) {
            Some(Color::White) => Rank::Eighth,
            Some(Color::Black) => Rank::First,
            None => return None,
        };
        if mv.to.get_rank() == last_rank {
            Some(mv.promotion)
        } else {
            None
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.game.side_to_move()
    }

    pub fn current_position(&self) -> Board {
        self.game.current_position()
    }

    /// FEN string for the current position.
    pub fn fen(&self) -> String {
        self.game.current_position().to_string()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The history the way the move list shows it: "e4, e5, Nf3".
    pub fn history_line(&self) -> String {
        self.history.join(", ")
    }

    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    /// True when the side to move is in check.
    pub fn in_check(&self) -> bool {
        self.game.current_position().checkers().0 > 0
    }

    /// True when no further moves can be played: checkmate, stalemate,
    /// a draw either side may claim, or a dead position.
    pub fn is_game_over(&self) -> bool {
        if self.game.result().is_some() {
            return true;
        }
        let board = self.game.current_position();
        if board.status() != chess::BoardStatus::Ongoing {
            return true;
        }
        self.game.can_declare_draw() || status::insufficient_material(&board)
    }

    pub fn result(&self) -> Option<GameResult> {
        self.game.result()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        GameSession::new()
    }
}

/// A move the rules of chess refuse in the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal move {0}")]
pub struct IllegalMove(pub ChessMove);

/// An engine reply that could not be applied to the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    #[error("unparseable engine move \"{0}\"")]
    Malformed(String),
    #[error("engine move {0} is not legal here")]
    Illegal(String),
}
