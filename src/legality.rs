//! Filters geometric targets down to moves that keep the mover's king safe.

use rustc_hash::FxHashSet;

use crate::{
    attacks::AttackMap,
    board::Board,
    coord::Coord,
    movement::{attacks, geometric_targets},
    piece::PieceKind,
};

/// Whether moving the non-king piece on `origin` to `target` leaves the king on
/// `king` unattacked.
///
/// Only the opponents already attacking `origin` (whose lines the move may
/// open) and those already attacking the king (which the move must capture or
/// block) are re-evaluated, on a scratch copy of the board.
pub fn is_safe_move(
    board: &Board,
    attack_map: &AttackMap,
    king: Coord,
    origin: Coord,
    target: Coord,
) -> bool {
    let Some(piece) = board.get(origin) else {
        return false;
    };
    let mut scratch = board.clone();
    scratch.move_piece(origin, target);
    if scratch
        .get(king)
        .is_none_or(|occupant| occupant.kind != PieceKind::King || occupant.color != piece.color)
    {
        return false;
    }
    attack_map
        .attackers(origin)
        .iter()
        .chain(attack_map.attackers(king))
        .copied()
        .filter(|attacker| {
            scratch
                .get(*attacker)
                .is_some_and(|occupant| occupant.color == attack_map.attacker())
        })
        .all(|attacker| !attacks(&scratch, attacker, king))
}
/// King moves are filtered by the attack map alone. `lifted_attack_map` must be
/// built with the king off the board so that it cannot step along a checking ray.
pub fn king_destinations(
    board: &Board,
    origin: Coord,
    lifted_attack_map: &AttackMap,
) -> FxHashSet<Coord> {
    geometric_targets(board, origin)
        .filter(|target| !lifted_attack_map.is_attacked(*target))
        .collect()
}
pub fn legal_destinations(
    board: &Board,
    origin: Coord,
    king: Coord,
    attack_map: &AttackMap,
    lifted_attack_map: &AttackMap,
) -> FxHashSet<Coord> {
    match board.get(origin) {
        None => FxHashSet::default(),
        Some(piece) if piece.kind == PieceKind::King => {
            king_destinations(board, origin, lifted_attack_map)
        }
        Some(_) => geometric_targets(board, origin)
            .filter(|target| is_safe_move(board, attack_map, king, origin, *target))
            .collect(),
    }
}
