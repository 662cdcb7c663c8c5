use crate::board::PieceColor;
use crate::evaluation::evaluate;
use crate::game::GameState;
use crate::moves::Move;

pub mod ordering;
pub mod params;

use ordering::order_moves;
use params::{
    BEGINNER_DEPTH, INFINITY, MATE_SCORE, MAX_PLY, MEDIUM_DEPTH, PRO_DEPTH, PRO_PRESORT_DEPTH,
    QUIESCENCE_BUDGET,
};

/// Bot strength as picked in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Medium,
    Pro,
}

impl Difficulty {
    /// Unknown strings fall back to Medium.
    pub fn from_str(s: &str) -> Difficulty {
        match s {
            "beginner" => Difficulty::Beginner,
            "medium" => Difficulty::Medium,
            "pro" => Difficulty::Pro,
            _ => Difficulty::Medium,
        }
    }

    fn profile(self) -> SearchProfile {
        match self {
            Difficulty::Beginner => SearchProfile {
                depth: BEGINNER_DEPTH,
                use_quiescence: false,
                use_killers: false,
                staged_root: false,
            },
            Difficulty::Medium => SearchProfile {
                depth: MEDIUM_DEPTH,
                use_quiescence: true,
                use_killers: true,
                staged_root: false,
            },
            Difficulty::Pro => SearchProfile {
                depth: PRO_DEPTH,
                use_quiescence: true,
                use_killers: true,
                staged_root: true,
            },
        }
    }
}

struct SearchProfile {
    depth: u32,
    use_quiescence: bool,
    use_killers: bool,
    /// Pre-score the root moves with a shallower search before the full one.
    staged_root: bool,
}

/// Per-invocation search state. A fresh one is built for every top-level
/// call, so nothing leaks between bot moves.
pub struct Searcher {
    killers: [[Option<Move>; 2]; MAX_PLY],
    use_killers: bool,
    use_quiescence: bool,
    max_depth: u32,
}

impl Searcher {
    fn new(profile: &SearchProfile) -> Searcher {
        Searcher {
            killers: [[None; 2]; MAX_PLY],
            use_killers: profile.use_killers,
            use_quiescence: profile.use_quiescence,
            max_depth: profile.depth,
        }
    }

    fn clear_killers(&mut self) {
        self.killers = [[None; 2]; MAX_PLY];
    }

    pub(crate) fn is_killer(&self, ply: usize, m: &Move) -> bool {
        if !self.use_killers || ply >= MAX_PLY {
            return false;
        }
        self.killers[ply]
            .iter()
            .flatten()
            .any(|k| k.same_squares(m))
    }

    /// Record a quiet move that caused a cutoff: it becomes slot 0 and the
    /// previous slot 0 shifts down.
    fn store_killer(&mut self, ply: usize, m: &Move) {
        if !self.use_killers || m.capture || ply >= MAX_PLY {
            return;
        }
        if self.killers[ply][0].map_or(false, |k| k.same_squares(m)) {
            return;
        }
        self.killers[ply][1] = self.killers[ply][0];
        self.killers[ply][0] = Some(*m);
    }

    /// Fail-hard alpha-beta. `maximizing` is true when White is to move;
    /// scores are from White's perspective throughout. Every `apply_move`
    /// is reverted before any return path, including cutoffs.
    fn minimax(
        &mut self,
        game: &mut GameState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        if depth == 0 {
            return if self.use_quiescence {
                self.quiescence(game, QUIESCENCE_BUDGET, alpha, beta, maximizing)
            } else {
                evaluate(game)
            };
        }

        let ply = (self.max_depth - depth) as usize;
        let mut moves = game.legal_moves();

        if moves.is_empty() {
            // Mate scores shrink with depth so nearer mates win out;
            // stalemate is dead even.
            return if game.in_check() {
                if maximizing {
                    -MATE_SCORE + ply as i32
                } else {
                    MATE_SCORE - ply as i32
                }
            } else {
                0
            };
        }

        order_moves(self, game, &mut moves, ply);

        if maximizing {
            for m in &moves {
                let undo = game.apply_move(m);
                let score = self.minimax(game, depth - 1, alpha, beta, false);
                game.revert_move(undo);

                if score >= beta {
                    self.store_killer(ply, m);
                    return beta;
                }
                if score > alpha {
                    alpha = score;
                }
            }
            alpha
        } else {
            for m in &moves {
                let undo = game.apply_move(m);
                let score = self.minimax(game, depth - 1, alpha, beta, true);
                game.revert_move(undo);

                if score <= alpha {
                    self.store_killer(ply, m);
                    return alpha;
                }
                if score < beta {
                    beta = score;
                }
            }
            beta
        }
    }

    /// Capture-and-promotion extension past the horizon, bounded by the
    /// stand-pat evaluation. Resolves hanging exchanges without touching
    /// quiet moves.
    fn quiescence(
        &mut self,
        game: &mut GameState,
        budget: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        let stand_pat = evaluate(game);

        if maximizing {
            if stand_pat >= beta {
                return beta;
            }
            if stand_pat > alpha {
                alpha = stand_pat;
            }
        } else {
            if stand_pat <= alpha {
                return alpha;
            }
            if stand_pat < beta {
                beta = stand_pat;
            }
        }

        if budget == 0 {
            return stand_pat;
        }

        let mut moves: Vec<Move> = game
            .legal_moves()
            .into_iter()
            .filter(|m| m.capture || m.promotion.is_some())
            .collect();
        if moves.is_empty() {
            return stand_pat;
        }

        // Killer slots beyond the nominal depth are never written, so the
        // ply index only feeds the capture ordering here.
        order_moves(self, game, &mut moves, MAX_PLY - 1);

        if maximizing {
            for m in &moves {
                let undo = game.apply_move(m);
                let score = self.quiescence(game, budget - 1, alpha, beta, false);
                game.revert_move(undo);

                if score >= beta {
                    return beta;
                }
                if score > alpha {
                    alpha = score;
                }
            }
            alpha
        } else {
            for m in &moves {
                let undo = game.apply_move(m);
                let score = self.quiescence(game, budget - 1, alpha, beta, true);
                game.revert_move(undo);

                if score <= alpha {
                    return alpha;
                }
                if score < beta {
                    beta = score;
                }
            }
            beta
        }
    }
}

/// Pick the bot's move. Returns None only when the position is terminal.
/// The position is mutated during the search but restored move-for-move, so
/// it is bit-identical on return.
pub fn get_best_move(game: &mut GameState, difficulty: Difficulty) -> Option<Move> {
    if game.game_over {
        return None;
    }

    let profile = difficulty.profile();
    let mut searcher = Searcher::new(&profile);

    let mut moves = game.legal_moves();
    if moves.is_empty() {
        return None;
    }

    let maximizing = game.turn == PieceColor::White;

    if profile.staged_root {
        // Two-stage ordering: score every root move with a shallower search,
        // sort on those scores, then run the full-depth pass over the sorted
        // list sharing one window.
        let mut scored: Vec<(i32, Move)> = moves
            .iter()
            .map(|m| {
                let undo = game.apply_move(m);
                let score =
                    searcher.minimax(game, PRO_PRESORT_DEPTH - 1, -INFINITY, INFINITY, !maximizing);
                game.revert_move(undo);
                (score, *m)
            })
            .collect();
        if maximizing {
            scored.sort_by_key(|(score, _)| -score);
        } else {
            scored.sort_by_key(|(score, _)| *score);
        }
        moves = scored.into_iter().map(|(_, m)| m).collect();
        searcher.clear_killers();
    } else {
        order_moves(&searcher, game, &mut moves, 0);
    }

    let mut alpha = -INFINITY;
    let mut beta = INFINITY;
    let mut best: Option<Move> = None;
    let mut best_score = if maximizing { -INFINITY } else { INFINITY };

    for m in &moves {
        let undo = game.apply_move(m);
        let score = searcher.minimax(game, profile.depth - 1, alpha, beta, !maximizing);
        game.revert_move(undo);

        if maximizing {
            if best.is_none() || score > best_score {
                best_score = score;
                best = Some(*m);
            }
            alpha = alpha.max(best_score);
        } else {
            if best.is_none() || score < best_score {
                best_score = score;
                best = Some(*m);
            }
            beta = beta.min(best_score);
        }
    }

    best
}
