use crate::board::PieceKind;
use crate::evaluation::get_piece_value;
use crate::game::GameState;
use crate::moves::Move;

use super::params::{
    SORT_CAPTURE_BASE, SORT_CAPTURE_VICTIM_WEIGHT, SORT_CASTLE, SORT_CENTER_WEIGHT, SORT_KILLER,
    SORT_PROMOTION,
};
use super::Searcher;

/// Sort a move list best-first for the given ply: MVV-LVA captures, then
/// promotions, killers, castling, and a mild pull toward the center.
pub fn order_moves(searcher: &Searcher, game: &GameState, moves: &mut Vec<Move>, ply: usize) {
    moves.sort_by_cached_key(|m| {
        let mut score: i32 = 0;

        if m.capture {
            let attacker = game
                .board
                .get(m.from)
                .map_or(0, |p| get_piece_value(p.kind));
            // The en-passant destination is empty; the victim is a pawn.
            let victim = if m.en_passant {
                get_piece_value(PieceKind::Pawn)
            } else {
                game.board.get(m.to).map_or(0, |p| get_piece_value(p.kind))
            };
            score += SORT_CAPTURE_BASE + SORT_CAPTURE_VICTIM_WEIGHT * victim - attacker;
        }

        if m.promotion.is_some() {
            score += SORT_PROMOTION;
        }

        if searcher.is_killer(ply, m) {
            score += SORT_KILLER;
        }

        if m.is_castle() {
            score += SORT_CASTLE;
        }

        // Central bias: weight * (7 - manhattan distance to the board
        // center). Distances are doubled so the half-square center stays in
        // integer arithmetic; the doubled sum is always even.
        let doubled_dist =
            (2 * m.to.row as i32 - 7).abs() + (2 * m.to.col as i32 - 7).abs();
        score += SORT_CENTER_WEIGHT * 7 - SORT_CENTER_WEIGHT * doubled_dist / 2;

        // We sort by ascending key, so negate to get highest-score moves first.
        -score
    });
}
