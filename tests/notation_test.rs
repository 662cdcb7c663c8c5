use std::collections::HashSet;

use tidechess_wasm::board::{Piece, PieceColor, PieceKind, Square};
use tidechess_wasm::game::{CastlingRights, GameState};
use tidechess_wasm::notation::{san_for_move, square_name};

fn sq(row: i8, col: i8) -> Square {
    Square::new(row, col)
}

fn put(game: &mut GameState, row: i8, col: i8, color: PieceColor, kind: PieceKind) {
    game.board.set(sq(row, col), Piece::new(color, kind));
}

struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

#[test]
fn square_names() {
    assert_eq!(square_name(sq(7, 0)), "a1");
    assert_eq!(square_name(sq(0, 7)), "h8");
    assert_eq!(square_name(sq(6, 4)), "e2");
    assert_eq!(square_name(sq(2, 3)), "d6");
}

#[test]
fn knight_moves_disambiguate_by_file() {
    // Knights on b1 and f1 can both reach d2.
    let mut game = GameState::empty();
    game.castling = CastlingRights::none();
    put(&mut game, 7, 7, PieceColor::White, PieceKind::King);
    put(&mut game, 0, 0, PieceColor::Black, PieceKind::King);
    put(&mut game, 7, 1, PieceColor::White, PieceKind::Knight);
    put(&mut game, 7, 5, PieceColor::White, PieceKind::Knight);

    let m = game
        .legal_moves()
        .into_iter()
        .find(|m| m.from == sq(7, 1) && m.to == sq(6, 3))
        .expect("Nb1-d2 legal");
    assert_eq!(san_for_move(&game, &m), "Nbd2");
}

#[test]
fn rook_moves_disambiguate_by_rank_when_files_collide() {
    // Rooks on a1 and a5 both reach a3.
    let mut game = GameState::empty();
    game.castling = CastlingRights::none();
    put(&mut game, 7, 7, PieceColor::White, PieceKind::King);
    put(&mut game, 0, 7, PieceColor::Black, PieceKind::King);
    put(&mut game, 7, 0, PieceColor::White, PieceKind::Rook);
    put(&mut game, 3, 0, PieceColor::White, PieceKind::Rook);

    let from_a1 = game
        .legal_moves()
        .into_iter()
        .find(|m| m.from == sq(7, 0) && m.to == sq(5, 0))
        .expect("Ra1-a3 legal");
    assert_eq!(san_for_move(&game, &from_a1), "R1a3");

    let from_a5 = game
        .legal_moves()
        .into_iter()
        .find(|m| m.from == sq(3, 0) && m.to == sq(5, 0))
        .expect("Ra5-a3 legal");
    assert_eq!(san_for_move(&game, &from_a5), "R5a3");
}

#[test]
fn promotion_notation_with_and_without_capture() {
    // White pawn g7, Black rook h8: g8=Q and gxh8=Q are both available.
    let mut game = GameState::empty();
    game.castling = CastlingRights::none();
    put(&mut game, 7, 4, PieceColor::White, PieceKind::King);
    put(&mut game, 3, 0, PieceColor::Black, PieceKind::King);
    put(&mut game, 1, 6, PieceColor::White, PieceKind::Pawn);
    put(&mut game, 0, 7, PieceColor::Black, PieceKind::Rook);

    let moves = game.legal_moves();
    let quiet: Vec<_> = moves
        .iter()
        .filter(|m| m.from == sq(1, 6) && m.to == sq(0, 6))
        .collect();
    let taking: Vec<_> = moves
        .iter()
        .filter(|m| m.from == sq(1, 6) && m.to == sq(0, 7))
        .collect();
    assert_eq!(quiet.len(), 4, "queen, rook, bishop, knight promotions");
    assert_eq!(taking.len(), 4);

    let queen_push = quiet
        .iter()
        .find(|m| m.promotion == Some(PieceKind::Queen))
        .unwrap();
    assert_eq!(san_for_move(&game, queen_push), "g8=Q");

    let queen_take = taking
        .iter()
        .find(|m| m.promotion == Some(PieceKind::Queen))
        .unwrap();
    assert_eq!(san_for_move(&game, queen_take), "gxh8=Q");

    let knight_push = quiet
        .iter()
        .find(|m| m.promotion == Some(PieceKind::Knight))
        .unwrap();
    assert_eq!(san_for_move(&game, knight_push), "g8=N");
}

#[test]
fn castling_notation() {
    let mut game = GameState::new_game();
    for (from, to) in [
        ((6i8, 4i8), (4i8, 4i8)), // e4
        ((1, 4), (3, 4)),         // e5
        ((7, 6), (5, 5)),         // Nf3
        ((0, 1), (2, 2)),         // Nc6
        ((7, 5), (4, 2)),         // Bc4
        ((0, 5), (3, 2)),         // Bc5
    ] {
        let m = game
            .legal_moves()
            .into_iter()
            .find(|m| m.from == sq(from.0, from.1) && m.to == sq(to.0, to.1))
            .expect("scripted opening move is legal");
        game.make_move(&m);
    }

    let castle = game
        .legal_moves()
        .into_iter()
        .find(|m| m.castle_king)
        .expect("White can castle short");
    assert_eq!(san_for_move(&game, &castle), "O-O");
}

/// Within any reachable position, the SAN built for each legal move
/// identifies it uniquely.
#[test]
fn san_is_unique_within_legal_move_set() {
    let mut rng = Rng(0x2545F4914F6CDD1D);

    for _ in 0..8 {
        let mut game = GameState::new_game();

        for ply in 0..60 {
            if game.game_over {
                break;
            }
            let moves = game.legal_moves();
            if moves.is_empty() {
                break;
            }

            if ply % 5 == 0 {
                let mut seen = HashSet::new();
                for m in &moves {
                    let san = san_for_move(&game, m);
                    assert!(
                        seen.insert(san.clone()),
                        "duplicate SAN {san} among legal moves at ply {ply}"
                    );
                }
            }

            let mv = moves[rng.below(moves.len())];
            game.make_move(&mv);
        }
    }
}
