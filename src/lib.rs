use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub mod board;
pub mod evaluation;
pub mod game;
pub mod moves;
pub mod notation;
pub mod search;

use board::{Piece, PieceColor, PieceKind, Square};
use game::GameState;
use moves::Move;
use search::Difficulty;

/// Move exchange format with the JS side. Coordinates are (row, col) with
/// row 0 at Black's back rank, matching the board the UI renders.
#[derive(Serialize, Deserialize)]
pub struct JsMove {
    pub from_row: i8,
    pub from_col: i8,
    pub to_row: i8,
    pub to_col: i8,
    #[serde(default)]
    pub promotion: Option<String>,
}

impl JsMove {
    fn from_move(m: &Move) -> JsMove {
        JsMove {
            from_row: m.from.row,
            from_col: m.from.col,
            to_row: m.to.row,
            to_col: m.to.col,
            promotion: m.promotion.map(|k| k.to_str().to_string()),
        }
    }
}

#[cfg(feature = "eval_tuning")]
#[derive(Serialize)]
struct JsEvalWithFeatures {
    eval: i32,
    features: evaluation::EvalFeatures,
}

/// The engine instance the UI talks to. One per game; the UI serializes
/// access itself (it ignores clicks while the bot is thinking).
#[wasm_bindgen]
pub struct Engine {
    game: GameState,
}

#[wasm_bindgen]
impl Engine {
    /// Fresh game in the standard starting position.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        Engine {
            game: GameState::new_game(),
        }
    }

    pub fn reset(&mut self) {
        self.game = GameState::new_game();
    }

    /// Snapshot of the whole position for rendering: board, turn, castling
    /// rights, en-passant target, clocks, captured trays, SAN move list and
    /// terminal flags.
    pub fn state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.game).unwrap_or(JsValue::NULL)
    }

    pub fn turn(&self) -> String {
        self.game.turn.to_str().to_string()
    }

    pub fn is_game_over(&self) -> bool {
        self.game.game_over
    }

    pub fn in_check(&self) -> bool {
        self.game.in_check()
    }

    /// Legal moves of the piece on (row, col); empty when the square holds
    /// nothing or an opponent piece. Drives the UI's move-target highlights.
    pub fn legal_moves_from(&self, row: i8, col: i8) -> JsValue {
        let moves: Vec<JsMove> = self
            .game
            .legal_moves_from(Square::new(row, col))
            .iter()
            .map(JsMove::from_move)
            .collect();
        serde_wasm_bindgen::to_value(&moves).unwrap_or(JsValue::NULL)
    }

    pub fn all_legal_moves(&self) -> JsValue {
        let moves: Vec<JsMove> = self
            .game
            .legal_moves()
            .iter()
            .map(JsMove::from_move)
            .collect();
        serde_wasm_bindgen::to_value(&moves).unwrap_or(JsValue::NULL)
    }

    /// Apply a user move. The submitted coordinates are matched against the
    /// legal move set (a promotion without a chosen piece resolves to the
    /// queen); anything that fails to match returns null and changes
    /// nothing. Returns `{notation, captured, in_check, is_game_over,
    /// result}` on success.
    pub fn make_move(&mut self, mv: JsValue) -> JsValue {
        let js_move: JsMove = match serde_wasm_bindgen::from_value(mv) {
            Ok(m) => m,
            Err(_) => return JsValue::NULL,
        };

        let from = Square::new(js_move.from_row, js_move.from_col);
        let to = Square::new(js_move.to_row, js_move.to_col);
        let wanted = js_move.promotion.as_deref().and_then(PieceKind::from_str);

        let found = self.game.legal_moves().into_iter().find(|m| {
            m.from == from
                && m.to == to
                && match wanted {
                    Some(kind) => m.promotion == Some(kind),
                    None => m.promotion.is_none() || m.promotion == Some(PieceKind::Queen),
                }
        });

        match found {
            Some(m) => {
                let outcome = self.game.make_move(&m);
                serde_wasm_bindgen::to_value(&outcome).unwrap_or(JsValue::NULL)
            }
            None => JsValue::NULL,
        }
    }

    /// Undo one ply. False on an empty history. Bot-mode double-undo
    /// (player move plus reply) is the UI's policy, built from two calls.
    pub fn undo_move(&mut self) -> bool {
        self.game.undo_move()
    }

    /// Ask the search agent for a move at the given difficulty ("beginner",
    /// "medium" or "pro"). Null only on a terminal position. The position
    /// is unchanged on return; the UI plays the move via `make_move`.
    pub fn get_bot_move(&mut self, difficulty: &str) -> JsValue {
        match search::get_best_move(&mut self.game, Difficulty::from_str(difficulty)) {
            Some(m) => {
                serde_wasm_bindgen::to_value(&JsMove::from_move(&m)).unwrap_or(JsValue::NULL)
            }
            None => JsValue::NULL,
        }
    }

    /// Static evaluation in centipawns, White-positive, for the eval bar.
    pub fn evaluate_position(&self) -> i32 {
        evaluation::evaluate(&self.game)
    }

    #[cfg(feature = "eval_tuning")]
    #[wasm_bindgen]
    pub fn evaluate_with_features(&self) -> JsValue {
        evaluation::reset_eval_features();
        let eval = evaluation::evaluate(&self.game);
        let features = evaluation::snapshot_eval_features();
        serde_wasm_bindgen::to_value(&JsEvalWithFeatures { eval, features }).unwrap_or(JsValue::NULL)
    }

    pub fn perft(&mut self, depth: usize) -> u64 {
        self.game.perft(depth)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

/// Glyph for a piece given its kind and color strings ("queen", "white").
/// Empty string on unknown input.
#[wasm_bindgen]
pub fn piece_unicode(kind: &str, color: &str) -> String {
    match (PieceKind::from_str(kind), PieceColor::from_str(color)) {
        (Some(kind), Some(color)) => board::piece_unicode(Piece::new(color, kind)).to_string(),
        _ => String::new(),
    }
}

/// Material value of a piece kind in centipawns; 0 on unknown input.
#[wasm_bindgen]
pub fn piece_value(kind: &str) -> i32 {
    PieceKind::from_str(kind).map_or(0, evaluation::get_piece_value)
}
