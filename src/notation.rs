//! Standard algebraic notation for the move list the UI renders.

use crate::board::{PieceKind, Square};
use crate::game::GameState;
use crate::moves::{legal_moves_for, Move};

pub fn file_char(col: i8) -> char {
    (b'a' + col as u8) as char
}

pub fn rank_char(row: i8) -> char {
    (b'8' - row as u8) as char
}

/// "e4"-style square name. Files run a-h from column 0, ranks 8-1 from
/// row 0.
pub fn square_name(sq: Square) -> String {
    let mut s = String::with_capacity(2);
    s.push(file_char(sq.col));
    s.push(rank_char(sq.row));
    s
}

/// SAN for a legal move in the given position, without the check suffix.
/// Must be called before the move is applied: disambiguation is decided
/// against the pre-move legal set, and the moving piece is read off the
/// board.
pub fn san_for_move(game: &GameState, mv: &Move) -> String {
    if mv.castle_king {
        return "O-O".to_string();
    }
    if mv.castle_queen {
        return "O-O-O".to_string();
    }

    let piece = game
        .board
        .get(mv.from)
        .expect("notation requires the moving piece on its source square");

    let mut san = String::new();

    if piece.kind == PieceKind::Pawn {
        if mv.capture {
            san.push(file_char(mv.from.col));
            san.push('x');
        }
    } else {
        san.push_str(piece.kind.letter());
        san.push_str(&disambiguation(game, mv, piece.kind));
        if mv.capture {
            san.push('x');
        }
    }

    san.push_str(&square_name(mv.to));

    if piece.kind == PieceKind::Pawn && mv.to.row == piece.color.promotion_row() {
        san.push('=');
        san.push_str(mv.promotion.unwrap_or(PieceKind::Queen).letter());
    }

    san
}

/// Source-square qualifier when another piece of the same kind and color
/// can legally reach the same destination: the file letter when it settles
/// the ambiguity, the rank digit when the files collide, both otherwise.
fn disambiguation(game: &GameState, mv: &Move, kind: PieceKind) -> String {
    let rivals: Vec<Square> = legal_moves_for(game, game.turn)
        .iter()
        .filter(|m| m.to == mv.to && m.from != mv.from)
        .filter(|m| {
            game.board
                .get(m.from)
                .map_or(false, |p| p.kind == kind)
        })
        .map(|m| m.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    let file_is_unique = rivals.iter().all(|sq| sq.col != mv.from.col);
    let rank_is_unique = rivals.iter().all(|sq| sq.row != mv.from.row);

    if file_is_unique {
        out.push(file_char(mv.from.col));
    } else if rank_is_unique {
        out.push(rank_char(mv.from.row));
    } else {
        out.push(file_char(mv.from.col));
        out.push(rank_char(mv.from.row));
    }
    out
}
