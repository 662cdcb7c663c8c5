use tidechess_wasm::board::{Piece, PieceColor, PieceKind, Square};
use tidechess_wasm::game::{CastlingRights, GameResult, GameState};
use tidechess_wasm::search::{get_best_move, Difficulty};

fn sq(row: i8, col: i8) -> Square {
    Square::new(row, col)
}

fn put(game: &mut GameState, row: i8, col: i8, color: PieceColor, kind: PieceKind) {
    game.board.set(sq(row, col), Piece::new(color, kind));
}

fn bare(turn: PieceColor) -> GameState {
    let mut game = GameState::empty();
    game.castling = CastlingRights::none();
    game.turn = turn;
    game
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

/// Ten curated mate-in-one positions, mixed colors and motifs. Each entry
/// is (position, side to move).
fn mate_in_one_suite() -> Vec<GameState> {
    use PieceColor::*;
    use PieceKind::*;

    let mut suite = Vec::new();

    // 1. Back-rank rook mate: Ra1-a8#.
    let mut g = bare(White);
    put(&mut g, 0, 7, Black, King);
    put(&mut g, 1, 6, Black, Pawn);
    put(&mut g, 1, 7, Black, Pawn);
    put(&mut g, 7, 0, White, Rook);
    put(&mut g, 7, 6, White, King);
    suite.push(g);

    // 2. The same motif for Black: Ra8-a1#.
    let mut g = bare(Black);
    put(&mut g, 7, 7, White, King);
    put(&mut g, 6, 6, White, Pawn);
    put(&mut g, 6, 7, White, Pawn);
    put(&mut g, 0, 0, Black, Rook);
    put(&mut g, 0, 6, Black, King);
    suite.push(g);

    // 3. Two-rook ladder: Ra1-a8# with Rb7 sealing the seventh rank.
    let mut g = bare(White);
    put(&mut g, 0, 7, Black, King);
    put(&mut g, 1, 1, White, Rook);
    put(&mut g, 7, 0, White, Rook);
    put(&mut g, 7, 4, White, King);
    suite.push(g);

    // 4. Ladder mirrored for Black: Ra8-a1#.
    let mut g = bare(Black);
    put(&mut g, 7, 7, White, King);
    put(&mut g, 6, 1, Black, Rook);
    put(&mut g, 0, 0, Black, Rook);
    put(&mut g, 0, 4, Black, King);
    suite.push(g);

    // 5. Supported queen mate: Qg3-g7# with the king on f6.
    let mut g = bare(White);
    put(&mut g, 0, 7, Black, King);
    put(&mut g, 2, 5, White, King);
    put(&mut g, 5, 6, White, Queen);
    suite.push(g);

    // 6. Supported queen mate for Black: Qg6-g2#.
    let mut g = bare(Black);
    put(&mut g, 7, 7, White, King);
    put(&mut g, 5, 5, Black, King);
    put(&mut g, 2, 6, Black, Queen);
    suite.push(g);

    // 7. Corner rook mate: Rh1-h8# against pawns on a7/b7... mirrored to
    // the a-side: Ka8 boxed in by its own pawns, Rh8 delivers along the
    // back rank.
    let mut g = bare(White);
    put(&mut g, 0, 0, Black, King);
    put(&mut g, 1, 0, Black, Pawn);
    put(&mut g, 1, 1, Black, Pawn);
    put(&mut g, 7, 7, White, Rook);
    put(&mut g, 4, 4, White, King);
    suite.push(g);

    // 8. Ladder against a centered king file: Rb1-b8# with Ra7 cutting the
    // seventh.
    let mut g = bare(White);
    put(&mut g, 0, 4, Black, King);
    put(&mut g, 1, 0, White, Rook);
    put(&mut g, 7, 1, White, Rook);
    put(&mut g, 7, 6, White, King);
    suite.push(g);

    // 9. Back-rank mate with the escape squares vacated behind the king:
    // Rh3-h8#, where the rook ray reaches past the vacated square.
    let mut g = bare(White);
    put(&mut g, 0, 2, Black, King);
    put(&mut g, 1, 1, Black, Pawn);
    put(&mut g, 1, 2, Black, Pawn);
    put(&mut g, 1, 3, Black, Pawn);
    put(&mut g, 5, 7, White, Rook);
    put(&mut g, 3, 5, White, King);
    suite.push(g);

    // 10. Smothered mate: Ng5-f7# against Kh8 boxed in by Rg8, g7, h7.
    let mut g = bare(White);
    put(&mut g, 0, 7, Black, King);
    put(&mut g, 0, 6, Black, Rook);
    put(&mut g, 1, 6, Black, Pawn);
    put(&mut g, 1, 7, Black, Pawn);
    put(&mut g, 3, 6, White, Knight);
    put(&mut g, 7, 4, White, King);
    suite.push(g);

    suite
}

#[test]
fn medium_finds_mate_in_one() {
    for (idx, mut game) in mate_in_one_suite().into_iter().enumerate() {
        let mover = game.turn;
        let mv = get_best_move(&mut game, Difficulty::Medium)
            .unwrap_or_else(|| panic!("position {idx}: no move returned"));
        let outcome = game.make_move(&mv);

        println!("position {idx}: medium played {}", outcome.notation);
        assert!(
            outcome.is_game_over && outcome.result != GameResult::Draw,
            "position {idx}: expected mate, got {} ({:?})",
            outcome.notation,
            outcome.result
        );
        assert_eq!(
            outcome.result,
            if mover == PieceColor::White {
                GameResult::WhiteWins
            } else {
                GameResult::BlackWins
            }
        );
        assert!(outcome.notation.ends_with('#'));
    }
}

#[test]
fn pro_finds_mate_in_one() {
    for (idx, mut game) in mate_in_one_suite().into_iter().enumerate() {
        let mv = get_best_move(&mut game, Difficulty::Pro)
            .unwrap_or_else(|| panic!("position {idx}: no move returned"));
        let outcome = game.make_move(&mv);

        println!("position {idx}: pro played {}", outcome.notation);
        assert!(
            outcome.is_game_over && outcome.result != GameResult::Draw,
            "position {idx}: expected mate, got {}",
            outcome.notation
        );
    }
}

#[test]
fn terminal_position_yields_no_move() {
    // The stalemate from the rules suite: White to move with nothing legal.
    let mut game = bare(PieceColor::White);
    put(&mut game, 7, 7, PieceColor::White, PieceKind::King);
    put(&mut game, 6, 5, PieceColor::Black, PieceKind::King);
    put(&mut game, 5, 6, PieceColor::Black, PieceKind::Queen);

    for difficulty in [Difficulty::Beginner, Difficulty::Medium, Difficulty::Pro] {
        assert!(get_best_move(&mut game, difficulty).is_none());
    }
}

/// Bot moves must come from the legal set and leave the position untouched,
/// whatever the difficulty. Positions are sampled from deterministic random
/// playouts; the deeper profiles get fewer, sparser samples to keep the
/// suite quick.
#[test]
fn bot_moves_are_legal_and_position_is_restored() {
    let mut rng = Rng(0xDEADBEEFCAFE1234);

    let mut sample = |plies: usize| -> GameState {
        let mut game = GameState::new_game();
        for _ in 0..plies {
            if game.game_over {
                break;
            }
            let moves = game.legal_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.below(moves.len())];
            game.make_move(&mv);
        }
        game
    };

    let mut check = |game: &mut GameState, difficulty: Difficulty| {
        if game.game_over {
            return;
        }
        let before = game.clone();
        let mv = get_best_move(game, difficulty);
        assert_eq!(
            *game, before,
            "{difficulty:?}: search must restore the position"
        );

        let mv = mv.expect("non-terminal position must yield a move");
        assert!(
            game.legal_moves().contains(&mv),
            "{difficulty:?}: bot played illegal move {mv:?}"
        );
    };

    for i in 0..12 {
        let mut game = sample(10 + i * 7);
        check(&mut game, Difficulty::Beginner);
    }

    for i in 0..3 {
        let mut game = sample(90 + i * 30);
        check(&mut game, Difficulty::Medium);
    }

    // Pro gets constructed sparse endgames; depth 6 on a full middlegame is
    // outside the test budget.
    let mut rook_ending = bare(PieceColor::White);
    put(&mut rook_ending, 4, 4, PieceColor::White, PieceKind::King);
    put(&mut rook_ending, 0, 0, PieceColor::White, PieceKind::Rook);
    put(&mut rook_ending, 2, 6, PieceColor::Black, PieceKind::King);
    check(&mut rook_ending, Difficulty::Pro);

    let mut queen_ending = bare(PieceColor::Black);
    put(&mut queen_ending, 6, 2, PieceColor::White, PieceKind::King);
    put(&mut queen_ending, 5, 5, PieceColor::White, PieceKind::Queen);
    put(&mut queen_ending, 1, 2, PieceColor::Black, PieceKind::King);
    put(&mut queen_ending, 0, 5, PieceColor::Black, PieceKind::Rook);
    check(&mut queen_ending, Difficulty::Pro);
}

#[test]
fn beginner_grabs_hanging_queen() {
    // White rook a1 versus an undefended black queen on a8.
    let mut game = bare(PieceColor::White);
    put(&mut game, 7, 0, PieceColor::White, PieceKind::Rook);
    put(&mut game, 7, 6, PieceColor::White, PieceKind::King);
    put(&mut game, 0, 0, PieceColor::Black, PieceKind::Queen);
    put(&mut game, 0, 6, PieceColor::Black, PieceKind::King);

    let mv = get_best_move(&mut game, Difficulty::Beginner).expect("moves exist");
    assert_eq!(mv.from, sq(7, 0));
    assert_eq!(mv.to, sq(0, 0));
    assert!(mv.capture);
}
