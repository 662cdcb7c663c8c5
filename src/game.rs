use crate::board::{Board, Piece, PieceColor, PieceKind, Square};
use crate::evaluation::is_insufficient_material;
use crate::moves::{
    apply_to_board, is_in_check, legal_moves_for, legal_moves_from_square, revert_on_board, Move,
};
use crate::notation;
use serde::{Deserialize, Serialize};

/// The four castling rights. A right implies the corresponding king and
/// rook have never moved nor been captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_king: bool,
    pub white_queen: bool,
    pub black_king: bool,
    pub black_queen: bool,
}

impl CastlingRights {
    pub fn all() -> CastlingRights {
        CastlingRights {
            white_king: true,
            white_queen: true,
            black_king: true,
            black_queen: true,
        }
    }

    pub fn none() -> CastlingRights {
        CastlingRights {
            white_king: false,
            white_queen: false,
            black_king: false,
            black_queen: false,
        }
    }

    pub fn kingside(&self, color: PieceColor) -> bool {
        match color {
            PieceColor::White => self.white_king,
            PieceColor::Black => self.black_king,
        }
    }

    pub fn queenside(&self, color: PieceColor) -> bool {
        match color {
            PieceColor::White => self.white_queen,
            PieceColor::Black => self.black_queen,
        }
    }

    fn clear_both(&mut self, color: PieceColor) {
        match color {
            PieceColor::White => {
                self.white_king = false;
                self.white_queen = false;
            }
            PieceColor::Black => {
                self.black_king = false;
                self.black_queen = false;
            }
        }
    }

    /// A move touching a starting rook corner (either end of it) kills the
    /// matching right, whoever moved.
    fn clear_corner(&mut self, sq: Square) {
        match (sq.row, sq.col) {
            (7, 0) => self.white_queen = false,
            (7, 7) => self.white_king = false,
            (0, 0) => self.black_queen = false,
            (0, 7) => self.black_king = false,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameResult {
    Unset,
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    fn win_for(color: PieceColor) -> GameResult {
        match color {
            PieceColor::White => GameResult::WhiteWins,
            PieceColor::Black => GameResult::BlackWins,
        }
    }
}

/// Delta record for reversing one ply. Everything the move clobbered is
/// here; the board itself is restored from the move's own flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UndoState {
    pub mv: Move,
    moved: Piece,
    captured: Option<(Square, Piece)>,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    game_over: bool,
    result: GameResult,
}

/// What `make_move` reports back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub notation: String,
    pub captured: Option<Piece>,
    pub in_check: bool,
    pub is_game_over: bool,
    pub result: GameResult,
}

/// Complete game state. Mutated only through make/apply and their undo
/// counterparts; the UI reads it for rendering but never writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: PieceColor,
    pub castling: CastlingRights,
    /// Square a pawn would land on when capturing en passant. Set only
    /// immediately after a double push, cleared by any other move.
    pub en_passant: Option<Square>,
    /// Plies since the last pawn move or capture.
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    /// Pieces each side has lost, in capture order (display only).
    pub captured_white: Vec<Piece>,
    pub captured_black: Vec<Piece>,
    /// SAN strings of every move played.
    pub move_list: Vec<String>,
    #[serde(skip)]
    pub undo_stack: Vec<UndoState>,
    pub game_over: bool,
    pub result: GameResult,
}

impl GameState {
    /// Standard starting position, White to move.
    pub fn new_game() -> GameState {
        GameState {
            board: Board::starting(),
            ..GameState::empty()
        }
    }

    /// Empty board with all rights held. Test scaffolding places pieces
    /// directly and clears rights as needed.
    pub fn empty() -> GameState {
        GameState {
            board: Board::empty(),
            turn: PieceColor::White,
            castling: CastlingRights::all(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            captured_white: Vec::new(),
            captured_black: Vec::new(),
            move_list: Vec::new(),
            undo_stack: Vec::new(),
            game_over: false,
            result: GameResult::Unset,
        }
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves_for(self, self.turn)
    }

    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        legal_moves_from_square(self, sq, self.turn)
    }

    pub fn in_check(&self) -> bool {
        is_in_check(&self.board, self.turn)
    }

    /// Apply a legal move with full bookkeeping: SAN (built before mutation,
    /// since disambiguation depends on the pre-move legal set), captured-piece
    /// trays, terminal detection, and an undo-stack entry.
    pub fn make_move(&mut self, mv: &Move) -> MoveOutcome {
        let mover = self.turn;
        let mut san = notation::san_for_move(self, mv);

        let undo = self.apply_move(mv);

        let captured = undo.captured.map(|(_, p)| p);
        if let Some(piece) = captured {
            match piece.color {
                PieceColor::White => self.captured_white.push(piece),
                PieceColor::Black => self.captured_black.push(piece),
            }
        }

        // The opponent's entire legal set is needed to tell mate from
        // stalemate and to pick the right notation suffix.
        let replies = self.legal_moves();
        let in_check = self.in_check();
        if in_check {
            san.push(if replies.is_empty() { '#' } else { '+' });
        }
        self.move_list.push(san.clone());

        if replies.is_empty() {
            self.game_over = true;
            self.result = if in_check {
                GameResult::win_for(mover)
            } else {
                GameResult::Draw
            };
        } else if is_insufficient_material(&self.board) || self.halfmove_clock >= 100 {
            self.game_over = true;
            self.result = GameResult::Draw;
        }

        self.undo_stack.push(undo);

        MoveOutcome {
            notation: san,
            captured,
            in_check,
            is_game_over: self.game_over,
            result: self.result,
        }
    }

    /// Pop the most recent ply and restore every field it changed. Returns
    /// false (and does nothing) on an empty stack.
    pub fn undo_move(&mut self) -> bool {
        let undo = match self.undo_stack.pop() {
            Some(u) => u,
            None => return false,
        };

        self.move_list.pop();
        if let Some((_, piece)) = undo.captured {
            match piece.color {
                PieceColor::White => self.captured_white.pop(),
                PieceColor::Black => self.captured_black.pop(),
            };
        }

        self.revert_move(undo);
        true
    }

    /// Bare state transition used inside the search: board effect, rights,
    /// en passant, clocks, turn. No SAN, no terminal scan, no stack. Every
    /// call must be paired with `revert_move` on the returned record.
    pub fn apply_move(&mut self, mv: &Move) -> UndoState {
        let moved = self
            .board
            .get(mv.from)
            .expect("move source must be occupied");

        let mut undo = UndoState {
            mv: *mv,
            moved,
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            game_over: self.game_over,
            result: self.result,
        };

        undo.captured = apply_to_board(&mut self.board, mv, self.turn);

        if moved.kind == PieceKind::King {
            self.castling.clear_both(self.turn);
        }
        self.castling.clear_corner(mv.from);
        if let Some((sq, _)) = undo.captured {
            self.castling.clear_corner(sq);
        }

        self.en_passant = if mv.double_push {
            Some(Square::new((mv.from.row + mv.to.row) / 2, mv.from.col))
        } else {
            None
        };

        if moved.kind == PieceKind::Pawn || undo.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if self.turn == PieceColor::Black {
            self.fullmove_number += 1;
        }
        self.turn = self.turn.opponent();

        undo
    }

    /// Reverse of `apply_move`.
    pub fn revert_move(&mut self, undo: UndoState) {
        self.turn = self.turn.opponent();
        if self.turn == PieceColor::Black {
            self.fullmove_number -= 1;
        }

        revert_on_board(&mut self.board, &undo.mv, undo.moved, undo.captured);

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.game_over = undo.game_over;
        self.result = undo.result;
    }

    /// Leaf count of the legal move tree, for move-generation validation.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for m in &moves {
            let undo = self.apply_move(m);
            nodes += self.perft(depth - 1);
            self.revert_move(undo);
        }
        nodes
    }
}
