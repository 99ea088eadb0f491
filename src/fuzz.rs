use std::fmt::Write as _;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rustc_hash::FxHashSet;

use crate::{
    attacks::AttackMap,
    board::Board,
    board_display::BoardDisplay,
    coord::{Coord, Size, last_rank},
    game::GameState,
    piece::PieceKind,
};

impl From<chess::Square> for Coord {
    fn from(value: chess::Square) -> Self {
        Coord::new(
            value.get_rank().to_index().try_into().unwrap(),
            value.get_file().to_index().try_into().unwrap(),
        )
    }
}
/// Position part of a FEN record, without castling or en passant rights.
fn fen(state: &GameState) -> String {
    let board = state.board();
    let size = board.size();
    assert_eq!(size, Size::STANDARD);
    let mut fen = String::new();
    for row in (0..size.rows).rev() {
        let mut empty = 0;
        for col in 0..size.cols {
            match board[Coord::new(row, col)] {
                Some(piece) => {
                    if empty > 0 {
                        write!(fen, "{empty}").unwrap();
                        empty = 0;
                    }
                    fen.push(piece.symbol());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            write!(fen, "{empty}").unwrap();
        }
        if row > 0 {
            fen.push('/');
        }
    }
    write!(fen, " {} - - 0 1", state.current_player().lowercase()).unwrap();
    fen
}
fn check_against_reference(state: &GameState) {
    let moves: FxHashSet<(Coord, Coord)> = state.legal_moves().collect();
    let reference: chess::Board = fen(state).parse().unwrap();
    let expected: FxHashSet<(Coord, Coord)> = chess::MoveGen::new_legal(&reference)
        .map(|movement| (movement.get_source().into(), movement.get_dest().into()))
        .collect();
    if let Some((origin, destination)) = moves.difference(&expected).next() {
        panic!(
            "found {origin} to {destination} but it's not a legal move\n{}\n{}",
            BoardDisplay::new(state.board()),
            fen(state),
        );
    }
    if let Some((origin, destination)) = expected.difference(&moves).next() {
        panic!(
            "{origin} to {destination} not found\n{}\n{}",
            BoardDisplay::new(state.board()),
            fen(state),
        );
    }
}
fn leaves_king_safe(board: &Board, origin: Coord, destination: Coord) -> bool {
    let player = board[origin].unwrap().color;
    let board = board.clone_and_move(origin, destination);
    let king = board.find_king(player).unwrap();
    !AttackMap::new(&board, player).is_attacked(king)
}
/// Random playouts compared move for move with the `chess` crate. A game stops
/// once a pawn reaches its last rank, as promotion is not modelled.
#[test]
fn random_playouts_match_reference() {
    let mut rng = SmallRng::seed_from_u64(0x00c0_ffee);
    for _ in 0..40 {
        let mut state = GameState::initial();
        for _ in 0..200 {
            check_against_reference(&state);
            assert_eq!(
                Board::try_from(state.board().to_symbols()),
                Ok(state.board().clone())
            );
            let moves: Box<[_]> = state.legal_moves().collect();
            if moves.is_empty() {
                assert!(state.is_over());
                break;
            }
            for (origin, destination) in moves.iter() {
                assert!(
                    leaves_king_safe(state.board(), *origin, *destination),
                    "{origin} to {destination} exposes the king\n{}",
                    BoardDisplay::new(state.board()),
                );
            }
            let (origin, destination) = moves[rng.random_range(0..moves.len())];
            let piece = state.board()[origin].unwrap();
            state = state
                .select(origin)
                .unwrap()
                .apply_move(destination)
                .unwrap();
            if piece.kind == PieceKind::Pawn
                && destination.row == last_rank(piece.color, state.board().size())
            {
                break;
            }
        }
    }
}
