//! Standard algebraic notation for the move history display.

use chess::{Board, BoardStatus, ChessMove, MoveGen, Piece, Square};

/// Render a legal move as SAN, e.g. "e4", "Nxf3", "O-O", "a8=Q#".
///
/// `board` must be the position before the move is played; captures,
/// disambiguation and the check suffix all depend on it.
pub fn standard_notation(board: &Board, m: ChessMove) -> String {
    let from = m.get_source();
    let to = m.get_dest();
    let piece = match board.piece_on(from) {
        Some(piece) => piece,
        // Not reachable for legal moves; fall back to the wire form.
        None => return m.to_string(),
    };

    let mut san = if piece == Piece::King && is_castle(from, to) {
        if to.get_file() == chess::File::G {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        }
    } else {
        let mut san = String::new();
        if piece != Piece::Pawn {
            san.push(piece_letter(piece));
            if let Some(tag) = disambiguation(board, piece, from, to) {
                san.push_str(&tag);
            }
        }

        let is_capture = board.piece_on(to).is_some()
            || (piece == Piece::Pawn && from.get_file() != to.get_file());
        if is_capture {
            if piece == Piece::Pawn {
                san.push(file_char(from));
            }
            san.push('x');
        }

        san.push(file_char(to));
        san.push(rank_char(to));

        if let Some(promotion) = m.get_promotion() {
            san.push('=');
            san.push(piece_letter(promotion));
        }
        san
    };

    let next = board.make_move_new(m);
    if next.status() == BoardStatus::Checkmate {
        san.push('#');
    } else if next.checkers().0 != 0 {
        san.push('+');
    }
    san
}

fn is_castle(from: Square, to: Square) -> bool {
    (from == Square::E1 && (to == Square::G1 || to == Square::C1))
        || (from == Square::E8 && (to == Square::G8 || to == Square::C8))
}

/// Departure tag when another piece of the same kind can also reach
/// the destination. Prefers the file, as printed notation does; the
/// rank when the file is shared; the full square when rivals share
/// both.
fn disambiguation(board: &Board, piece: Piece, from: Square, to: Square) -> Option<String> {
    let rivals: Vec<Square> = MoveGen::new_legal(board)
        .filter(|other| {
            other.get_dest() == to
                && other.get_source() != from
                && board.piece_on(other.get_source()) == Some(piece)
        })
        .map(|other| other.get_source())
        .collect();

    if rivals.is_empty() {
        return None;
    }
    let shares_file = rivals.iter().any(|sq| sq.get_file() == from.get_file());
    let shares_rank = rivals.iter().any(|sq| sq.get_rank() == from.get_rank());
    let mut tag = String::new();
    if !shares_file || shares_rank {
        tag.push(file_char(from));
    }
    if shares_file {
        tag.push(rank_char(from));
    }
    Some(tag)
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::King => 'K',
        Piece::Queen => 'Q',
        Piece::Rook => 'R',
        Piece::Bishop => 'B',
        Piece::Knight => 'N',
        Piece::Pawn => 'P',
    }
}

fn file_char(sq: Square) -> char {
    (b'a' + sq.get_file().to_index() as u8) as char
}

fn rank_char(sq: Square) -> char {
    (b'1' + sq.get_rank().to_index() as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn san(fen: &str, mv: &str) -> String {
        let board = Board::from_str(fen).unwrap();
        let m = ChessMove::from_str(mv).unwrap();
        assert!(board.legal(m), "test move {mv} must be legal in {fen}");
        standard_notation(&board, m)
    }

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn pawn_pushes_and_piece_moves() {
        assert_eq!(san(START, "e2e4"), "e4");
        assert_eq!(san(START, "g1f3"), "Nf3");
    }

    #[test]
    fn captures() {
        // Open game after 1. e4 d5.
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";
        assert_eq!(san(fen, "e4d5"), "exd5");

        let fen = "rnbqkbnr/ppp1pppp/8/3P4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2";
        assert_eq!(san(fen, "d8d5"), "Qxd5");
    }

    #[test]
    fn en_passant_reads_as_a_pawn_capture() {
        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        assert_eq!(san(fen, "e5f6"), "exf6");
    }

    #[test]
    fn knight_disambiguation_by_file() {
        // Knights on b1 and f3 both reach the empty d2 square.
        let fen = "rnbqkb1r/pppppppp/8/8/8/5N2/PPP1PPPP/RNBQKB1R w KQkq - 0 1";
        assert_eq!(san(fen, "b1d2"), "Nbd2");
        assert_eq!(san(fen, "f3d2"), "Nfd2");
    }

    #[test]
    fn rook_disambiguation_by_rank() {
        // Rooks on a1 and a5 share the a-file; both reach a3.
        let fen = "4k3/8/8/R7/8/8/8/R3K3 w - - 0 1";
        assert_eq!(san(fen, "a1a3"), "R1a3");
        assert_eq!(san(fen, "a5a3"), "R5a3");
    }

    #[test]
    fn three_rivals_need_the_full_departure_square() {
        // Queens on d1, d5 and f1 all reach d3. From d1 neither the
        // file (shared with d5) nor the rank (shared with f1) is
        // unique on its own.
        let fen = "7k/8/8/3Q4/8/8/8/3QKQ2 w - - 0 1";
        assert_eq!(san(fen, "d1d3"), "Qd1d3");
        assert_eq!(san(fen, "f1d3"), "Qfd3");
        assert_eq!(san(fen, "d5d3"), "Q5d3");
    }

    #[test]
    fn castling_both_sides() {
        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";
        assert_eq!(san(fen, "e1g1"), "O-O");
        assert_eq!(san(fen, "e1c1"), "O-O-O");
    }

    #[test]
    fn promotion_with_and_without_capture() {
        let fen = "7r/6P1/2k5/8/8/8/8/4K3 w - - 0 1";
        assert_eq!(san(fen, "g7h8q"), "gxh8=Q");

        let fen = "8/6P1/2k5/8/8/8/8/4K3 w - - 0 1";
        assert_eq!(san(fen, "g7g8n"), "g8=N");
    }

    #[test]
    fn check_and_mate_suffixes() {
        // 1. d4 e6 2. c4 Bb4 is check but not mate.
        let fen = "rnbqkbnr/pppp1ppp/4p3/8/2PP4/8/PP2PPPP/RNBQKBNR b KQkq - 0 2";
        assert_eq!(san(fen, "f8b4"), "Bb4+");

        // Final move of the fool's mate.
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2";
        assert_eq!(san(fen, "d8h4"), "Qh4#");
    }
}
