use rustc_hash::FxHashMap;

use crate::{
    board::Board,
    color::Color,
    coord::Coord,
    movement::attack_squares,
};

/// For every square, the origins of the opposing pieces threatening it.
///
/// Rebuilt from scratch whenever the board changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackMap {
    attacker: Color,
    attackers: FxHashMap<Coord, Vec<Coord>>,
}
impl AttackMap {
    /// Attacks by the side *not* to move.
    pub fn new(board: &Board, current_player: Color) -> Self {
        let attacker = !current_player;
        let mut attackers: FxHashMap<Coord, Vec<Coord>> = FxHashMap::default();
        for (origin, _) in board.pieces_of(attacker) {
            for square in attack_squares(board, origin) {
                attackers.entry(square).or_default().push(origin);
            }
        }
        AttackMap {
            attacker,
            attackers,
        }
    }
    /// Same as [`AttackMap::new`] but computed as if the current player's king
    /// were not on the board, so rays through the king's square keep going.
    pub fn with_king_lifted(board: &Board, current_player: Color) -> Self {
        let mut lifted = board.clone();
        if let Some(king) = board.find_king(current_player) {
            lifted.set(king, None);
        }
        AttackMap::new(&lifted, current_player)
    }
    pub fn attacker(&self) -> Color {
        self.attacker
    }
    pub fn attackers(&self, square: Coord) -> &[Coord] {
        self.attackers.get(&square).map_or(&[], Vec::as_slice)
    }
    pub fn is_attacked(&self, square: Coord) -> bool {
        !self.attackers(square).is_empty()
    }
}
