use serde::{Deserialize, Serialize};

/// Side of a piece. The UI passes these across the wasm boundary as
/// lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub fn opponent(self) -> PieceColor {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Row delta of a forward pawn step. White's back rank is row 7, so
    /// White pawns advance toward row 0.
    pub fn forward(self) -> i8 {
        match self {
            PieceColor::White => -1,
            PieceColor::Black => 1,
        }
    }

    /// Rank a pawn of this color promotes on.
    pub fn promotion_row(self) -> i8 {
        match self {
            PieceColor::White => 0,
            PieceColor::Black => 7,
        }
    }

    /// Rank this color's pawns start on (double-push rank).
    pub fn pawn_start_row(self) -> i8 {
        match self {
            PieceColor::White => 6,
            PieceColor::Black => 1,
        }
    }

    /// Back rank of this color (where the king and rooks begin).
    pub fn back_row(self) -> i8 {
        match self {
            PieceColor::White => 7,
            PieceColor::Black => 0,
        }
    }

    pub fn from_str(s: &str) -> Option<PieceColor> {
        match s {
            "white" | "w" => Some(PieceColor::White),
            "black" | "b" => Some(PieceColor::Black),
            _ => None,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            PieceColor::White => "white",
            PieceColor::Black => "black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// SAN letter for the piece; pawns have none.
    pub fn letter(self) -> &'static str {
        match self {
            PieceKind::Pawn => "",
            PieceKind::Knight => "N",
            PieceKind::Bishop => "B",
            PieceKind::Rook => "R",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }
    }

    pub fn from_str(s: &str) -> Option<PieceKind> {
        match s {
            "pawn" | "p" => Some(PieceKind::Pawn),
            "knight" | "n" => Some(PieceKind::Knight),
            "bishop" | "b" => Some(PieceKind::Bishop),
            "rook" | "r" => Some(PieceKind::Rook),
            "queen" | "q" => Some(PieceKind::Queen),
            "king" | "k" => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

/// Compact piece representation - Copy-able so the board itself is a flat
/// value type with no heap indirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: PieceColor,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: PieceColor, kind: PieceKind) -> Piece {
        Piece { color, kind }
    }
}

/// Unicode glyph for board rendering and the captured-piece trays.
pub fn piece_unicode(piece: Piece) -> &'static str {
    match (piece.color, piece.kind) {
        (PieceColor::White, PieceKind::Pawn) => "\u{2659}",
        (PieceColor::White, PieceKind::Knight) => "\u{2658}",
        (PieceColor::White, PieceKind::Bishop) => "\u{2657}",
        (PieceColor::White, PieceKind::Rook) => "\u{2656}",
        (PieceColor::White, PieceKind::Queen) => "\u{2655}",
        (PieceColor::White, PieceKind::King) => "\u{2654}",
        (PieceColor::Black, PieceKind::Pawn) => "\u{265F}",
        (PieceColor::Black, PieceKind::Knight) => "\u{265E}",
        (PieceColor::Black, PieceKind::Bishop) => "\u{265D}",
        (PieceColor::Black, PieceKind::Rook) => "\u{265C}",
        (PieceColor::Black, PieceKind::Queen) => "\u{265B}",
        (PieceColor::Black, PieceKind::King) => "\u{265A}",
    }
}

/// Board coordinate. Row 0 is Black's back rank, row 7 is White's; column 0
/// is the a-file. Signed so offset arithmetic can run before bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    pub fn new(row: i8, col: i8) -> Square {
        Square { row, col }
    }
}

#[inline]
pub fn in_bounds(row: i8, col: i8) -> bool {
    (0..8).contains(&row) && (0..8).contains(&col)
}

/// The 8x8 grid. A square holds one piece or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard initial arrangement.
    pub fn starting() -> Board {
        use PieceColor::*;
        use PieceKind::*;

        let mut board = Board::empty();
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for (col, &kind) in back.iter().enumerate() {
            board.set(Square::new(0, col as i8), Piece::new(Black, kind));
            board.set(Square::new(7, col as i8), Piece::new(White, kind));
        }
        for col in 0..8 {
            board.set(Square::new(1, col), Piece::new(Black, Pawn));
            board.set(Square::new(6, col), Piece::new(White, Pawn));
        }

        board
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row as usize][sq.col as usize]
    }

    #[inline]
    pub fn get_rc(&self, row: i8, col: i8) -> Option<Piece> {
        self.squares[row as usize][col as usize]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Piece) {
        self.squares[sq.row as usize][sq.col as usize] = Some(piece);
    }

    #[inline]
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row as usize][sq.col as usize].take()
    }

    pub fn clear(&mut self) {
        self.squares = [[None; 8]; 8];
    }

    /// Iterate every occupied square.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        (0..8i8).flat_map(move |row| {
            (0..8i8).filter_map(move |col| {
                self.squares[row as usize][col as usize]
                    .map(|p| (Square::new(row, col), p))
            })
        })
    }

    /// Locate the king of the given color. Every reachable position has
    /// exactly one king per side, but practice setups may lack one.
    pub fn find_king(&self, color: PieceColor) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.color == color && p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }
}
