//! Status rules: the line shown above the board and the status string
//! reported over the wire.

use std::fmt;

use chess::{Board, Color, GameResult, Piece, Square, ALL_SQUARES};

use crate::session::GameSession;

/// The three-way status line above the board, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    GameOver,
    InCheck,
    YourTurn,
}

impl DisplayStatus {
    pub fn text(self) -> &'static str {
        match self {
            DisplayStatus::GameOver => "Game over",
            DisplayStatus::InCheck => "You are in check!",
            DisplayStatus::YourTurn => "Your turn",
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Status for the display above the board. A finished game wins over a
/// check, which wins over the plain turn prompt.
pub fn display_status(session: &GameSession) -> DisplayStatus {
    if session.is_game_over() {
        DisplayStatus::GameOver
    } else if session.in_check() {
        DisplayStatus::InCheck
    } else {
        DisplayStatus::YourTurn
    }
}

/// Status string carried in move responses.
pub fn wire_status(session: &GameSession) -> String {
    match session.result() {
        Some(GameResult::WhiteCheckmates) => "white_wins".to_string(),
        Some(GameResult::BlackCheckmates) => "black_wins".to_string(),
        Some(GameResult::WhiteResigns) => "black_wins".to_string(),
        Some(GameResult::BlackResigns) => "white_wins".to_string(),
        Some(GameResult::Stalemate) => "draw".to_string(),
        Some(GameResult::DrawAccepted) => "draw".to_string(),
        Some(GameResult::DrawDeclared) => "draw".to_string(),
        None => {
            if session.is_game_over() {
                "draw".to_string()
            } else if session.in_check() {
                "check".to_string()
            } else if session.side_to_move() == Color::White {
                "white_turn".to_string()
            } else {
                "black_turn".to_string()
            }
        }
    }
}

/// True when neither side can possibly deliver mate: bare kings, a lone
/// minor piece against a bare king, or same-colored lone bishops.
pub fn insufficient_material(board: &Board) -> bool {
    let mut white = Material::default();
    let mut black = Material::default();

    for square in ALL_SQUARES {
        let piece = match board.piece_on(square) {
            Some(piece) => piece,
            None => continue,
        };
        let side = match board.color_on(square) {
            Some(Color::White) => &mut white,
            Some(Color::Black) => &mut black,
            None => continue,
        };
        match piece {
            Piece::Pawn | Piece::Rook | Piece::Queen => side.mating = true,
            Piece::Knight => side.knights += 1,
            Piece::Bishop => {
                side.bishops += 1;
                side.bishop_square = Some(square);
            }
            Piece::King => {}
        }
    }

    if white.mating || black.mating {
        return false;
    }
    match (white.minors(), black.minors()) {
        (0, 0) => true,
        (1, 0) | (0, 1) => true,
        (1, 1) => match (white.bishop_square, black.bishop_square) {
            // Lone bishops on same-colored squares cannot force mate.
            (Some(a), Some(b)) => square_color(a) == square_color(b),
            _ => false,
        },
        _ => false,
    }
}

#[derive(Default)]
struct Material {
    mating: bool,
    knights: u32,
    bishops: u32,
    bishop_square: Option<Square>,
}

impl Material {
    fn minors(&self) -> u32 {
        self.knights + self.bishops
    }
}

fn square_color(sq: Square) -> bool {
    (sq.get_rank().to_index() + sq.get_file().to_index()) % 2 == 0
}
