//! The chessboard widget: painting, and turning drags into moves.

use chess::{Color, Piece, Rank, Square, ALL_SQUARES};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::controller::BoardController;

const LIGHT_SQUARE: Color32 = Color32::from_rgb(0xf0, 0xd9, 0xb5);
const DARK_SQUARE: Color32 = Color32::from_rgb(0xb5, 0x88, 0x63);
const LAST_MOVE_TINT: Color32 = Color32::from_rgba_premultiplied(64, 78, 0, 90);
const PICK_OUTLINE: Color32 = Color32::from_rgb(0x2a, 0x52, 0x8a);
const PIECE_INK: Color32 = Color32::from_gray(0x14);

/// Convert a square to its cell rectangle. Rank eight sits at the top,
/// file a on the left, White at the bottom.
pub fn square_rect(board_rect: Rect, square: Square, cell: f32) -> Rect {
    let col = square.get_file().to_index() as f32;
    let row = 7.0 - square.get_rank().to_index() as f32;
    Rect::from_min_size(
        Pos2::new(board_rect.min.x + col * cell, board_rect.min.y + row * cell),
        Vec2::splat(cell),
    )
}

/// Convert a screen position back to a square, if it is on the board.
pub fn square_at(board_rect: Rect, cell: f32, pos: Pos2) -> Option<Square> {
    if !board_rect.contains(pos) {
        return None;
    }
    let col = ((pos.x - board_rect.min.x) / cell).floor() as i32;
    let row = ((pos.y - board_rect.min.y) / cell).floor() as i32;
    if !(0..8).contains(&col) || !(0..8).contains(&row) {
        return None;
    }
    Some(Square::make_square(
        Rank::from_index(7 - row as usize),
        chess::File::from_index(col as usize),
    ))
}

fn piece_glyph(piece: Piece, color: Color) -> &'static str {
    match (color, piece) {
        (Color::White, Piece::King) => "\u{2654}",
        (Color::White, Piece::Queen) => "\u{2655}",
        (Color::White, Piece::Rook) => "\u{2656}",
        (Color::White, Piece::Bishop) => "\u{2657}",
        (Color::White, Piece::Knight) => "\u{2658}",
        (Color::White, Piece::Pawn) => "\u{2659}",
        (Color::Black, Piece::King) => "\u{265a}",
        (Color::Black, Piece::Queen) => "\u{265b}",
        (Color::Black, Piece::Rook) => "\u{265c}",
        (Color::Black, Piece::Bishop) => "\u{265d}",
        (Color::Black, Piece::Knight) => "\u{265e}",
        (Color::Black, Piece::Pawn) => "\u{265f}",
    }
}

fn is_dark(square: Square) -> bool {
    (square.get_rank().to_index() + square.get_file().to_index()) % 2 == 0
}

/// The widget itself. Holds nothing but the drag in progress; every
/// frame repaints straight from the controller's session.
#[derive(Default)]
pub struct BoardWidget {
    drag_from: Option<Square>,
}

impl BoardWidget {
    pub fn show(&mut self, ui: &mut Ui, controller: &mut BoardController) {
        let side = ui.available_size().min_elem().max(320.0);
        let (board_rect, response) =
            ui.allocate_exact_size(Vec2::splat(side), Sense::click_and_drag());
        let cell = board_rect.width() / 8.0;
        let painter = ui.painter_at(board_rect);

        let position = controller.session().current_position();
        let last_move = controller.session().last_move();

        if response.drag_started() {
            self.drag_from = response
                .interact_pointer_pos()
                .and_then(|pos| square_at(board_rect, cell, pos))
                .filter(|&square| controller.can_pick(square));
        }

        // Squares first, then highlights, then the pieces.
        for square in ALL_SQUARES {
            let rect = square_rect(board_rect, square, cell);
            let fill = if is_dark(square) { DARK_SQUARE } else { LIGHT_SQUARE };
            painter.rect_filled(rect, 0.0, fill);

            let highlighted = match last_move {
                Some((from, to)) => square == from || square == to,
                None => false,
            };
            if highlighted {
                painter.rect_filled(rect, 0.0, LAST_MOVE_TINT);
            }
            if self.drag_from == Some(square) {
                painter.rect_stroke(rect, 0.0, Stroke::new(2.0, PICK_OUTLINE));
            }
        }
        self.paint_coordinates(&painter, board_rect, cell);

        let dragging = self.drag_from.filter(|_| response.dragged());
        for square in ALL_SQUARES {
            if dragging == Some(square) {
                continue;
            }
            if let (Some(piece), Some(color)) =
                (position.piece_on(square), position.color_on(square))
            {
                let rect = square_rect(board_rect, square, cell);
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    piece_glyph(piece, color),
                    FontId::proportional(cell * 0.8),
                    PIECE_INK,
                );
            }
        }

        // The grabbed piece follows the pointer.
        if let (Some(square), Some(pos)) = (dragging, response.interact_pointer_pos()) {
            if let (Some(piece), Some(color)) =
                (position.piece_on(square), position.color_on(square))
            {
                if let Some(target) = square_at(board_rect, cell, pos) {
                    let rect = square_rect(board_rect, target, cell);
                    painter.rect_stroke(rect, 0.0, Stroke::new(2.0, PICK_OUTLINE));
                }
                painter.text(
                    pos,
                    Align2::CENTER_CENTER,
                    piece_glyph(piece, color),
                    FontId::proportional(cell * 0.9),
                    PIECE_INK,
                );
            }
        }

        if response.drag_stopped() {
            if let Some(from) = self.drag_from.take() {
                let target = response
                    .interact_pointer_pos()
                    .and_then(|pos| square_at(board_rect, cell, pos));
                if let Some(to) = target {
                    if to != from {
                        // Snapback needs no extra work: the next frame
                        // paints the piece from the session again.
                        controller.handle_drop(from, to);
                    }
                }
            }
        }
    }

    fn paint_coordinates(&self, painter: &egui::Painter, board_rect: Rect, cell: f32) {
        let font = FontId::proportional((cell * 0.22).max(10.0));
        for index in 0..8 {
            let file = (b'a' + index as u8) as char;
            let rect = square_rect(
                board_rect,
                Square::make_square(Rank::First, chess::File::from_index(index)),
                cell,
            );
            painter.text(
                rect.left_bottom() + Vec2::new(3.0, -3.0),
                Align2::LEFT_BOTTOM,
                file,
                font.clone(),
                if index % 2 == 0 { LIGHT_SQUARE } else { DARK_SQUARE },
            );

            let rank = (b'1' + index as u8) as char;
            let rect = square_rect(
                board_rect,
                Square::make_square(Rank::from_index(index), chess::File::H),
                cell,
            );
            painter.text(
                rect.right_top() + Vec2::new(-3.0, 3.0),
                Align2::RIGHT_TOP,
                rank,
                font.clone(),
                if index % 2 == 0 { DARK_SQUARE } else { LIGHT_SQUARE },
            );
        }
    }
}
