//! Per-kind movement rules.
//!
//! Two views exist for every piece: the squares it may move to ignoring the
//! safety of its own king, and the squares it threatens. They only differ for
//! pawns, whose pushes never capture and whose diagonals always threaten, and
//! for blocked rays, where the threatened set also covers a friendly blocker
//! (that piece is defended).

use std::iter;

use crate::{
    board::Board,
    coord::{Coord, Vector, pawn_home_rank},
    piece::{Piece, PieceKind},
};

fn step_targets<'a, I>(
    board: &'a Board,
    origin: Coord,
    piece: Piece,
    moves: I,
) -> impl Iterator<Item = Coord> + 'a
where
    I: IntoIterator<Item = Vector>,
    I::IntoIter: 'a,
{
    step_attacks(board, origin, moves).filter(move |destination| {
        board[*destination].is_none_or(|occupant| occupant.color != piece.color)
    })
}
fn step_attacks<'a, I>(board: &'a Board, origin: Coord, moves: I) -> impl Iterator<Item = Coord> + 'a
where
    I: IntoIterator<Item = Vector>,
    I::IntoIter: 'a,
{
    let size = board.size();
    moves
        .into_iter()
        .filter_map(move |movement| origin.move_by(movement, size))
}
/// Walks one ray, stopping on the first occupied square. The blocker itself is
/// yielded only when `include_blocker` says so.
fn ray<'a>(
    board: &'a Board,
    origin: Coord,
    direction: Vector,
    include_blocker: impl Fn(Piece) -> bool + 'a,
) -> impl Iterator<Item = Coord> + 'a {
    let mut resume = true;
    origin
        .line_exclusive(direction, board.size())
        .map_while(move |destination| {
            if !resume {
                return None;
            }
            match board[destination] {
                Some(blocker) => {
                    resume = false;
                    include_blocker(blocker).then_some(destination)
                }
                None => Some(destination),
            }
        })
}
fn ray_targets<'a>(
    board: &'a Board,
    origin: Coord,
    piece: Piece,
    directions: &'a [Vector],
) -> impl Iterator<Item = Coord> + 'a {
    directions.iter().copied().flat_map(move |direction| {
        ray(board, origin, direction, move |blocker| {
            blocker.color != piece.color
        })
    })
}
fn ray_attacks<'a>(
    board: &'a Board,
    origin: Coord,
    directions: &'a [Vector],
) -> impl Iterator<Item = Coord> + 'a {
    directions
        .iter()
        .copied()
        .flat_map(move |direction| ray(board, origin, direction, |_| true))
}
fn pawn_targets(board: &Board, origin: Coord, piece: Piece) -> impl Iterator<Item = Coord> + '_ {
    let forward_jumps = if origin.row == pawn_home_rank(piece.color, board.size()) {
        2
    } else {
        1
    };
    // both the pass-through square and the destination must be empty
    let pushes = origin
        .line_exclusive(Vector::pawn_single_move(piece.color), board.size())
        .take(forward_jumps)
        .take_while(move |destination| board[*destination].is_none());
    let captures = step_attacks(board, origin, Vector::pawn_attacks(piece.color)).filter(
        move |destination| board[*destination].is_some_and(|occupant| occupant.color != piece.color),
    );
    pushes.chain(captures)
}
/// Squares the piece on `origin` could reach, ignoring the safety of its own king.
///
/// Empty when `origin` holds no piece.
pub fn geometric_targets(board: &Board, origin: Coord) -> Box<dyn Iterator<Item = Coord> + '_> {
    let Some(piece) = board.get(origin) else {
        return Box::new(iter::empty());
    };
    match piece.kind {
        PieceKind::Pawn => Box::new(pawn_targets(board, origin, piece)),
        PieceKind::Knight => Box::new(step_targets(board, origin, piece, Vector::KNIGHT_MOVES)),
        PieceKind::Bishop => Box::new(ray_targets(
            board,
            origin,
            piece,
            &Vector::BISHOP_DIRECTIONS,
        )),
        PieceKind::Rook => Box::new(ray_targets(board, origin, piece, &Vector::ROOK_DIRECTIONS)),
        PieceKind::Queen => Box::new(ray_targets(
            board,
            origin,
            piece,
            &Vector::QUEEN_DIRECTIONS,
        )),
        PieceKind::King => Box::new(step_targets(board, origin, piece, Vector::KING_MOVES)),
    }
}
/// Squares the piece on `origin` threatens, whatever occupies them.
pub fn attack_squares(board: &Board, origin: Coord) -> Box<dyn Iterator<Item = Coord> + '_> {
    let Some(piece) = board.get(origin) else {
        return Box::new(iter::empty());
    };
    match piece.kind {
        PieceKind::Pawn => Box::new(step_attacks(board, origin, Vector::pawn_attacks(piece.color))),
        PieceKind::Knight => Box::new(step_attacks(board, origin, Vector::KNIGHT_MOVES)),
        PieceKind::Bishop => Box::new(ray_attacks(board, origin, &Vector::BISHOP_DIRECTIONS)),
        PieceKind::Rook => Box::new(ray_attacks(board, origin, &Vector::ROOK_DIRECTIONS)),
        PieceKind::Queen => Box::new(ray_attacks(board, origin, &Vector::QUEEN_DIRECTIONS)),
        PieceKind::King => Box::new(step_attacks(board, origin, Vector::KING_MOVES)),
    }
}
pub fn attacks(board: &Board, origin: Coord, target: Coord) -> bool {
    attack_squares(board, origin).any(|square| square == target)
}
