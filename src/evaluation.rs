use crate::board::{Board, PieceColor, PieceKind, Square};
use crate::game::GameState;
use crate::moves::legal_moves_for;
#[cfg(feature = "eval_tuning")]
use once_cell::sync::Lazy;
#[cfg(feature = "eval_tuning")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "eval_tuning")]
use std::sync::RwLock;

#[cfg(feature = "eval_tuning")]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvalFeatures {
    pub material: i32,
    pub piece_squares: i32,
    pub bishop_pair: i32,
    pub doubled_pawns: i32,
    pub isolated_pawns: i32,
    pub passed_pawns: i32,
    pub rook_files: i32,
    pub king_shield: i32,
    pub mobility: i32,
}

#[cfg(feature = "eval_tuning")]
static EVAL_FEATURES: Lazy<RwLock<EvalFeatures>> =
    Lazy::new(|| RwLock::new(EvalFeatures::default()));

#[cfg(feature = "eval_tuning")]
pub fn reset_eval_features() {
    if let Ok(mut guard) = EVAL_FEATURES.write() {
        *guard = EvalFeatures::default();
    }
}

#[cfg(feature = "eval_tuning")]
pub fn snapshot_eval_features() -> EvalFeatures {
    EVAL_FEATURES.read().map(|g| g.clone()).unwrap_or_default()
}

#[cfg(feature = "eval_tuning")]
macro_rules! bump_feat {
    ($field:ident, $amount:expr) => {{
        if let Ok(mut f) = EVAL_FEATURES.write() {
            f.$field += $amount;
        }
    }};
}

#[cfg(not(feature = "eval_tuning"))]
macro_rules! bump_feat {
    ($($tt:tt)*) => {};
}

// ==================== Piece Values ====================

pub fn get_piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

// ==================== Evaluation Constants ====================

const BISHOP_PAIR_BONUS: i32 = 50;
const DOUBLED_PAWN_PENALTY: i32 = 15;
const ISOLATED_PAWN_PENALTY: i32 = 20;
const PASSED_PAWN_STEP_BONUS: i32 = 15;
const ROOK_OPEN_FILE_BONUS: i32 = 25;
const ROOK_SEMI_OPEN_FILE_BONUS: i32 = 15;
const KING_SHIELD_BONUS: i32 = 15;
const MOBILITY_WEIGHT: i32 = 5;

// ==================== Piece-Square Tables ====================
//
// Written from White's perspective: index [row][col] with row 0 at the far
// (promotion) side. Black mirrors vertically via 7 - row.

#[rustfmt::skip]
const PAWN_TABLE: [[i32; 8]; 8] = [
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [ 50,  50,  50,  50,  50,  50,  50,  50],
    [ 10,  10,  20,  30,  30,  20,  10,  10],
    [  5,   5,  10,  25,  25,  10,   5,   5],
    [  0,   0,   0,  20,  20,   0,   0,   0],
    [  5,  -5, -10,   0,   0, -10,  -5,   5],
    [  5,  10,  10, -20, -20,  10,  10,   5],
    [  0,   0,   0,   0,   0,   0,   0,   0],
];

#[rustfmt::skip]
const KNIGHT_TABLE: [[i32; 8]; 8] = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20,   0,   0,   0,   0, -20, -40],
    [-30,   0,  10,  15,  15,  10,   0, -30],
    [-30,   5,  15,  20,  20,  15,   5, -30],
    [-30,   0,  15,  20,  20,  15,   0, -30],
    [-30,   5,  10,  15,  15,  10,   5, -30],
    [-40, -20,   0,   5,   5,   0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

#[rustfmt::skip]
const BISHOP_TABLE: [[i32; 8]; 8] = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10,   0,   0,   0,   0,   0,   0, -10],
    [-10,   0,   5,  10,  10,   5,   0, -10],
    [-10,   5,   5,  10,  10,   5,   5, -10],
    [-10,   0,  10,  10,  10,  10,   0, -10],
    [-10,  10,  10,  10,  10,  10,  10, -10],
    [-10,   5,   0,   0,   0,   0,   5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

#[rustfmt::skip]
const ROOK_TABLE: [[i32; 8]; 8] = [
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [  5,  10,  10,  10,  10,  10,  10,   5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [  0,   0,   0,   5,   5,   0,   0,   0],
];

#[rustfmt::skip]
const QUEEN_TABLE: [[i32; 8]; 8] = [
    [-20, -10, -10,  -5,  -5, -10, -10, -20],
    [-10,   0,   0,   0,   0,   0,   0, -10],
    [-10,   0,   5,   5,   5,   5,   0, -10],
    [ -5,   0,   5,   5,   5,   5,   0,  -5],
    [  0,   0,   5,   5,   5,   5,   0,  -5],
    [-10,   5,   5,   5,   5,   5,   0, -10],
    [-10,   0,   5,   0,   0,   0,   0, -10],
    [-20, -10, -10,  -5,  -5, -10, -10, -20],
];

#[rustfmt::skip]
const KING_TABLE: [[i32; 8]; 8] = [
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-20, -30, -30, -40, -40, -30, -30, -20],
    [-10, -20, -20, -20, -20, -20, -20, -10],
    [ 20,  20,   0,   0,   0,   0,  20,  20],
    [ 20,  30,  10,   0,   0,  10,  30,  20],
];

#[rustfmt::skip]
const KING_ENDGAME_TABLE: [[i32; 8]; 8] = [
    [-50, -40, -30, -20, -20, -30, -40, -50],
    [-30, -20, -10,   0,   0, -10, -20, -30],
    [-30, -10,  20,  30,  30,  20, -10, -30],
    [-30, -10,  30,  40,  40,  30, -10, -30],
    [-30, -10,  30,  40,  40,  30, -10, -30],
    [-30, -10,  20,  30,  30,  20, -10, -30],
    [-30, -30,   0,   0,   0,   0, -30, -30],
    [-50, -30, -30, -30, -30, -30, -30, -50],
];

fn table_for(kind: PieceKind, endgame: bool) -> &'static [[i32; 8]; 8] {
    match kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => {
            if endgame {
                &KING_ENDGAME_TABLE
            } else {
                &KING_TABLE
            }
        }
    }
}

fn piece_square_bonus(color: PieceColor, kind: PieceKind, sq: Square, endgame: bool) -> i32 {
    let table = table_for(kind, endgame);
    match color {
        PieceColor::White => table[sq.row as usize][sq.col as usize],
        PieceColor::Black => table[7 - sq.row as usize][sq.col as usize],
    }
}

// ==================== Main Evaluation ====================

/// Static evaluation in centipawns, positive for White. Serves both the
/// search leaves and the UI's evaluation bar.
pub fn evaluate(game: &GameState) -> i32 {
    if is_insufficient_material(&game.board) {
        return 0;
    }

    let endgame = is_endgame(&game.board);

    // One pass to collect pawn placement per file; rook file bonuses and the
    // whole pawn-structure block read from these.
    let mut white_pawns: [Vec<i8>; 8] = Default::default();
    let mut black_pawns: [Vec<i8>; 8] = Default::default();
    for (sq, piece) in game.board.pieces() {
        if piece.kind == PieceKind::Pawn {
            match piece.color {
                PieceColor::White => white_pawns[sq.col as usize].push(sq.row),
                PieceColor::Black => black_pawns[sq.col as usize].push(sq.row),
            }
        }
    }

    let mut score = 0;
    let mut white_bishops = 0;
    let mut black_bishops = 0;

    for (sq, piece) in game.board.pieces() {
        let sign = if piece.color == PieceColor::White { 1 } else { -1 };

        score += sign * get_piece_value(piece.kind);
        bump_feat!(material, sign * get_piece_value(piece.kind));

        let psq = piece_square_bonus(piece.color, piece.kind, sq, endgame);
        score += sign * psq;
        bump_feat!(piece_squares, sign * psq);

        match piece.kind {
            PieceKind::Bishop => {
                if piece.color == PieceColor::White {
                    white_bishops += 1;
                } else {
                    black_bishops += 1;
                }
            }
            PieceKind::Rook => {
                let bonus = rook_file_bonus(piece.color, sq.col, &white_pawns, &black_pawns);
                score += sign * bonus;
                bump_feat!(rook_files, sign * bonus);
            }
            _ => {}
        }
    }

    if white_bishops >= 2 {
        score += BISHOP_PAIR_BONUS;
        bump_feat!(bishop_pair, BISHOP_PAIR_BONUS);
    }
    if black_bishops >= 2 {
        score -= BISHOP_PAIR_BONUS;
        bump_feat!(bishop_pair, -BISHOP_PAIR_BONUS);
    }

    score += pawn_structure(PieceColor::White, &white_pawns, &black_pawns);
    score -= pawn_structure(PieceColor::Black, &black_pawns, &white_pawns);

    if !endgame {
        score += king_shield(&game.board, PieceColor::White);
        score -= king_shield(&game.board, PieceColor::Black);
    }

    let mobility = MOBILITY_WEIGHT
        * (legal_moves_for(game, PieceColor::White).len() as i32
            - legal_moves_for(game, PieceColor::Black).len() as i32);
    score += mobility;
    bump_feat!(mobility, mobility);

    score
}

/// Endgame when both queens are gone, or when each side is down to at most
/// a queen, no rooks, and at most one minor piece.
pub fn is_endgame(board: &Board) -> bool {
    let mut queens = [0; 2];
    let mut rooks = [0; 2];
    let mut minors = [0; 2];

    for (_, piece) in board.pieces() {
        let side = piece.color as usize;
        match piece.kind {
            PieceKind::Queen => queens[side] += 1,
            PieceKind::Rook => rooks[side] += 1,
            PieceKind::Knight | PieceKind::Bishop => minors[side] += 1,
            _ => {}
        }
    }

    let no_queens = queens[0] == 0 && queens[1] == 0;
    let bare = (0..2).all(|s| queens[s] <= 1 && rooks[s] == 0 && minors[s] <= 1);
    no_queens || bare
}

// ==================== Pawn Structure ====================

/// Doubled, isolated and passed pawns for one side, friendly-positive.
fn pawn_structure(color: PieceColor, friendly: &[Vec<i8>; 8], enemy: &[Vec<i8>; 8]) -> i32 {
    let mut score = 0;

    for file in 0..8usize {
        let rows = &friendly[file];
        if rows.is_empty() {
            continue;
        }

        if rows.len() > 1 {
            let penalty = DOUBLED_PAWN_PENALTY * (rows.len() as i32 - 1);
            score -= penalty;
            bump_feat!(doubled_pawns, -penalty);
        }

        let left_empty = file == 0 || friendly[file - 1].is_empty();
        let right_empty = file == 7 || friendly[file + 1].is_empty();
        if left_empty && right_empty {
            let penalty = ISOLATED_PAWN_PENALTY * rows.len() as i32;
            score -= penalty;
            bump_feat!(isolated_pawns, -penalty);
        }

        // Most advanced pawn on this file; passed iff no enemy pawn sits on
        // this or an adjacent file between it and the promotion rank.
        let front = match color {
            PieceColor::White => *rows.iter().min().unwrap(),
            PieceColor::Black => *rows.iter().max().unwrap(),
        };
        let blocked = (file.saturating_sub(1)..=(file + 1).min(7)).any(|f| {
            enemy[f].iter().any(|&row| match color {
                PieceColor::White => row < front,
                PieceColor::Black => row > front,
            })
        });
        if !blocked {
            let advancement = match color {
                PieceColor::White => 7 - front as i32,
                PieceColor::Black => front as i32,
            };
            let bonus = PASSED_PAWN_STEP_BONUS * advancement;
            score += bonus;
            bump_feat!(passed_pawns, bonus);
        }
    }

    score
}

/// Open file +25, semi-open (no friendly pawns, some enemy pawns) +15.
fn rook_file_bonus(
    color: PieceColor,
    col: i8,
    white_pawns: &[Vec<i8>; 8],
    black_pawns: &[Vec<i8>; 8],
) -> i32 {
    let (friendly, enemy) = match color {
        PieceColor::White => (white_pawns, black_pawns),
        PieceColor::Black => (black_pawns, white_pawns),
    };
    let file = col as usize;

    if friendly[file].is_empty() {
        if enemy[file].is_empty() {
            ROOK_OPEN_FILE_BONUS
        } else {
            ROOK_SEMI_OPEN_FILE_BONUS
        }
    } else {
        0
    }
}

// ==================== King Safety ====================

/// Pawn shield on the three files around the king: a friendly pawn one rank
/// in front is worth +15, a missing one -15. Skipped in the endgame, where
/// the king is supposed to leave its shelter.
fn king_shield(board: &Board, color: PieceColor) -> i32 {
    let king = match board.find_king(color) {
        Some(sq) => sq,
        None => return 0,
    };

    let front_row = king.row + color.forward();
    let mut score = 0;

    for dc in -1i8..=1 {
        let col = king.col + dc;
        if !(0..8).contains(&col) {
            continue;
        }
        let shielded = (0..8).contains(&front_row)
            && board
                .get_rc(front_row, col)
                .map_or(false, |p| p.color == color && p.kind == PieceKind::Pawn);
        if shielded {
            score += KING_SHIELD_BONUS;
            bump_feat!(king_shield, KING_SHIELD_BONUS);
        } else {
            score -= KING_SHIELD_BONUS;
            bump_feat!(king_shield, -KING_SHIELD_BONUS);
        }
    }

    score
}

// ==================== Insufficient Material ====================

/// Draw by material: K vs K, K+minor vs K, and K+B vs K+B with both
/// bishops on same-colored squares. Everything else counts as sufficient.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut minors: Vec<(PieceColor, PieceKind, Square)> = Vec::new();

    for (sq, piece) in board.pieces() {
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Knight | PieceKind::Bishop => minors.push((piece.color, piece.kind, sq)),
            _ => return false,
        }
    }

    match minors.as_slice() {
        [] => true,
        [_] => true,
        [(ca, ka, sa), (cb, kb, sb)] => {
            ca != cb
                && *ka == PieceKind::Bishop
                && *kb == PieceKind::Bishop
                && (sa.row + sa.col) % 2 == (sb.row + sb.col) % 2
        }
        _ => false,
    }
}
