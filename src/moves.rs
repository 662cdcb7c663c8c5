use crate::board::{in_bounds, Board, Piece, PieceColor, PieceKind, Square};
use crate::game::{CastlingRights, GameState};
use serde::{Deserialize, Serialize};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (2, 1),
    (2, -1),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const ORTHO_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAG_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Compact move representation - Copy-able for zero-allocation cloning in
/// the search hot loops. Flags describe the move's full board effect so
/// make/unmake never has to re-derive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub capture: bool,
    pub double_push: bool,
    pub en_passant: bool,
    pub castle_king: bool,
    pub castle_queen: bool,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            capture: false,
            double_push: false,
            en_passant: false,
            castle_king: false,
            castle_queen: false,
            promotion: None,
        }
    }

    fn capture_of(from: Square, to: Square) -> Move {
        let mut m = Move::new(from, to);
        m.capture = true;
        m
    }

    pub fn is_castle(&self) -> bool {
        self.castle_king || self.castle_queen
    }

    /// Killer-move identity: two moves match if they share endpoints.
    pub fn same_squares(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to
    }
}

// ==================== Generation entry points ====================

/// All legal moves for `color` in the given position. Pseudo-legal moves
/// that leave the mover's own king attacked are filtered out here, so
/// callers never see them.
pub fn legal_moves_for(game: &GameState, color: PieceColor) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    for (from, piece) in game.board.pieces() {
        if piece.color != color {
            continue;
        }
        pseudo_legal_from(game, from, piece, &mut moves);
    }
    moves.retain(|m| is_legal(&game.board, m, color));
    moves
}

/// Legal moves of the piece on a single square, or nothing if the square is
/// empty or holds an opponent piece. This is what the UI calls when the
/// player picks up a piece.
pub fn legal_moves_from_square(game: &GameState, sq: Square, color: PieceColor) -> Vec<Move> {
    let piece = match game.board.get(sq) {
        Some(p) if p.color == color => p,
        _ => return Vec::new(),
    };
    let mut moves = Vec::new();
    pseudo_legal_from(game, sq, piece, &mut moves);
    moves.retain(|m| is_legal(&game.board, m, color));
    moves
}

fn pseudo_legal_from(game: &GameState, from: Square, piece: Piece, out: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(&game.board, from, piece.color, game.en_passant, out),
        PieceKind::Knight => generate_leaper_moves(&game.board, from, piece.color, &KNIGHT_OFFSETS, out),
        PieceKind::Bishop => generate_sliding_moves(&game.board, from, piece.color, &DIAG_DIRS, out),
        PieceKind::Rook => generate_sliding_moves(&game.board, from, piece.color, &ORTHO_DIRS, out),
        PieceKind::Queen => {
            generate_sliding_moves(&game.board, from, piece.color, &ORTHO_DIRS, out);
            generate_sliding_moves(&game.board, from, piece.color, &DIAG_DIRS, out);
        }
        PieceKind::King => {
            generate_leaper_moves(&game.board, from, piece.color, &KING_OFFSETS, out);
            generate_castling_moves(&game.board, from, piece.color, game.castling, out);
        }
    }
}

// ==================== Per-piece generators ====================

fn generate_pawn_moves(
    board: &Board,
    from: Square,
    color: PieceColor,
    en_passant: Option<Square>,
    out: &mut Vec<Move>,
) {
    let dir = color.forward();
    let promo_row = color.promotion_row();

    // Emits the four promotion choices when the destination is the last rank.
    fn push_pawn_move(out: &mut Vec<Move>, mut m: Move, promo_row: i8) {
        if m.to.row == promo_row {
            for kind in [
                PieceKind::Queen,
                PieceKind::Rook,
                PieceKind::Bishop,
                PieceKind::Knight,
            ] {
                m.promotion = Some(kind);
                out.push(m);
            }
        } else {
            out.push(m);
        }
    }

    // Forward one, and two from the starting rank when both squares are empty.
    let one = Square::new(from.row + dir, from.col);
    if in_bounds(one.row, one.col) && board.get(one).is_none() {
        push_pawn_move(out, Move::new(from, one), promo_row);

        if from.row == color.pawn_start_row() {
            let two = Square::new(from.row + 2 * dir, from.col);
            if board.get(two).is_none() {
                let mut m = Move::new(from, two);
                m.double_push = true;
                out.push(m);
            }
        }
    }

    // Diagonal captures, plus en passant onto the recorded target square.
    for dc in [-1i8, 1] {
        let to = Square::new(from.row + dir, from.col + dc);
        if !in_bounds(to.row, to.col) {
            continue;
        }
        match board.get(to) {
            Some(target) if target.color != color => {
                push_pawn_move(out, Move::capture_of(from, to), promo_row);
            }
            None => {
                // A set target sits on row 2 (after a Black push, for White to
                // take) or row 5 (after a White push, for Black). The row gate
                // keeps the other side's move set clean when both colors are
                // generated from the same position, as mobility scoring does.
                let capture_row = match color {
                    PieceColor::White => 2,
                    PieceColor::Black => 5,
                };
                if en_passant == Some(to) && to.row == capture_row {
                    let mut m = Move::capture_of(from, to);
                    m.en_passant = true;
                    out.push(m);
                }
            }
            _ => {}
        }
    }
}

fn generate_leaper_moves(
    board: &Board,
    from: Square,
    color: PieceColor,
    offsets: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(dr, dc) in offsets {
        let to = Square::new(from.row + dr, from.col + dc);
        if !in_bounds(to.row, to.col) {
            continue;
        }
        match board.get(to) {
            None => out.push(Move::new(from, to)),
            Some(target) if target.color != color => out.push(Move::capture_of(from, to)),
            _ => {}
        }
    }
}

fn generate_sliding_moves(
    board: &Board,
    from: Square,
    color: PieceColor,
    dirs: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(dr, dc) in dirs {
        let mut row = from.row + dr;
        let mut col = from.col + dc;
        while in_bounds(row, col) {
            let to = Square::new(row, col);
            match board.get(to) {
                None => out.push(Move::new(from, to)),
                Some(target) => {
                    if target.color != color {
                        out.push(Move::capture_of(from, to));
                    }
                    break;
                }
            }
            row += dr;
            col += dc;
        }
    }
}

/// Castling. The king must stand on its home square with the right still
/// held, the squares between king and rook must be empty, and the king's
/// source, pass-through and destination squares must all be unattacked.
fn generate_castling_moves(
    board: &Board,
    from: Square,
    color: PieceColor,
    rights: CastlingRights,
    out: &mut Vec<Move>,
) {
    let back = color.back_row();
    if from.row != back || from.col != 4 {
        return;
    }
    let enemy = color.opponent();
    let rook_at = |col: i8| {
        board
            .get_rc(back, col)
            .map_or(false, |p| p.color == color && p.kind == PieceKind::Rook)
    };

    if rights.kingside(color)
        && rook_at(7)
        && board.get_rc(back, 5).is_none()
        && board.get_rc(back, 6).is_none()
        && !is_square_attacked(board, Square::new(back, 4), enemy)
        && !is_square_attacked(board, Square::new(back, 5), enemy)
        && !is_square_attacked(board, Square::new(back, 6), enemy)
    {
        let mut m = Move::new(from, Square::new(back, 6));
        m.castle_king = true;
        out.push(m);
    }

    if rights.queenside(color)
        && rook_at(0)
        && board.get_rc(back, 3).is_none()
        && board.get_rc(back, 2).is_none()
        && board.get_rc(back, 1).is_none()
        && !is_square_attacked(board, Square::new(back, 4), enemy)
        && !is_square_attacked(board, Square::new(back, 3), enemy)
        && !is_square_attacked(board, Square::new(back, 2), enemy)
    {
        let mut m = Move::new(from, Square::new(back, 2));
        m.castle_queen = true;
        out.push(m);
    }
}

// ==================== Attack queries ====================

/// Whether any piece of `attacker` attacks the target square. Implemented
/// by reverse rays from the target; needs no en-passant or castling
/// context.
pub fn is_square_attacked(board: &Board, target: Square, attacker: PieceColor) -> bool {
    // Pawns: an attacking pawn sits one rank behind the target along its own
    // forward direction.
    let pawn_row = target.row - attacker.forward();
    for dc in [-1i8, 1] {
        let col = target.col + dc;
        if in_bounds(pawn_row, col) {
            if let Some(p) = board.get_rc(pawn_row, col) {
                if p.color == attacker && p.kind == PieceKind::Pawn {
                    return true;
                }
            }
        }
    }

    // Knights and the enemy king.
    for &(dr, dc) in &KNIGHT_OFFSETS {
        let (row, col) = (target.row + dr, target.col + dc);
        if in_bounds(row, col) {
            if let Some(p) = board.get_rc(row, col) {
                if p.color == attacker && p.kind == PieceKind::Knight {
                    return true;
                }
            }
        }
    }
    for &(dr, dc) in &KING_OFFSETS {
        let (row, col) = (target.row + dr, target.col + dc);
        if in_bounds(row, col) {
            if let Some(p) = board.get_rc(row, col) {
                if p.color == attacker && p.kind == PieceKind::King {
                    return true;
                }
            }
        }
    }

    // Sliders: the first blocker on each ray decides.
    ray_hits(board, target, attacker, &ORTHO_DIRS, PieceKind::Rook)
        || ray_hits(board, target, attacker, &DIAG_DIRS, PieceKind::Bishop)
}

fn ray_hits(
    board: &Board,
    target: Square,
    attacker: PieceColor,
    dirs: &[(i8, i8)],
    slider: PieceKind,
) -> bool {
    for &(dr, dc) in dirs {
        let mut row = target.row + dr;
        let mut col = target.col + dc;
        while in_bounds(row, col) {
            if let Some(p) = board.get_rc(row, col) {
                if p.color == attacker && (p.kind == slider || p.kind == PieceKind::Queen) {
                    return true;
                }
                break;
            }
            row += dr;
            col += dc;
        }
    }
    false
}

/// Whether `color`'s king is currently attacked.
pub fn is_in_check(board: &Board, color: PieceColor) -> bool {
    match board.find_king(color) {
        Some(king) => is_square_attacked(board, king, color.opponent()),
        None => false,
    }
}

// ==================== Legality filter ====================

/// A pseudo-legal move is legal iff the mover's king is not attacked after
/// the move's full board effect (rook repositioning, en-passant removal,
/// promotion substitution) is applied to a scratch board.
pub fn is_legal(board: &Board, mv: &Move, color: PieceColor) -> bool {
    let mut scratch = board.clone();
    apply_to_board(&mut scratch, mv, color);
    !is_in_check(&scratch, color)
}

/// Apply a move's board effect in place. Returns the captured piece and the
/// square it stood on (which differs from `mv.to` for en passant).
pub fn apply_to_board(board: &mut Board, mv: &Move, color: PieceColor) -> Option<(Square, Piece)> {
    let piece = board.remove(mv.from).expect("move source must be occupied");

    let captured = if mv.en_passant {
        // The victim pawn sits beside the destination, on the mover's rank.
        let victim_sq = Square::new(mv.from.row, mv.to.col);
        board.remove(victim_sq).map(|p| (victim_sq, p))
    } else {
        board.remove(mv.to).map(|p| (mv.to, p))
    };

    let placed = if piece.kind == PieceKind::Pawn && mv.to.row == color.promotion_row() {
        // A promotion submitted without a chosen piece becomes a queen.
        Piece::new(color, mv.promotion.unwrap_or(PieceKind::Queen))
    } else {
        piece
    };
    board.set(mv.to, placed);

    if mv.castle_king {
        let back = color.back_row();
        if let Some(rook) = board.remove(Square::new(back, 7)) {
            board.set(Square::new(back, 5), rook);
        }
    } else if mv.castle_queen {
        let back = color.back_row();
        if let Some(rook) = board.remove(Square::new(back, 0)) {
            board.set(Square::new(back, 3), rook);
        }
    }

    captured
}

/// Reverse of `apply_to_board`. `moved` is the piece as it stood on the
/// source square before the move (a pawn for promotions).
pub fn revert_on_board(board: &mut Board, mv: &Move, moved: Piece, captured: Option<(Square, Piece)>) {
    board.remove(mv.to);
    board.set(mv.from, moved);

    if let Some((sq, piece)) = captured {
        board.set(sq, piece);
    }

    if mv.castle_king {
        let back = moved.color.back_row();
        if let Some(rook) = board.remove(Square::new(back, 5)) {
            board.set(Square::new(back, 7), rook);
        }
    } else if mv.castle_queen {
        let back = moved.color.back_row();
        if let Some(rook) = board.remove(Square::new(back, 3)) {
            board.set(Square::new(back, 0), rook);
        }
    }
}
