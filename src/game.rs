use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    ops::{Index, IndexMut},
};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Serialize, Serializer, ser::SerializeMap};
use tracing::{debug, trace, warn};

use crate::{
    attacks::AttackMap,
    board::{Board, InvalidBoard},
    color::Color,
    coord::Coord,
    legality::legal_destinations,
    piece::{Piece, PieceKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameError {
    InvalidBoard(InvalidBoard),
    /// The side to move has no king on the real board. The game cannot continue.
    MissingKing(Color),
    NoSelection,
    InvalidMove {
        origin: Coord,
        destination: Coord,
    },
    OffBoard(Coord),
    NotSelectable(Coord),
    GameOver(Condition),
}
impl From<InvalidBoard> for GameError {
    fn from(value: InvalidBoard) -> Self {
        GameError::InvalidBoard(value)
    }
}
impl Display for GameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidBoard(err) => write!(f, "{err}")?,
            GameError::MissingKing(color) => write!(f, "no {color} king found on the board")?,
            GameError::NoSelection => write!(f, "no piece is selected")?,
            GameError::InvalidMove {
                origin,
                destination,
            } => write!(f, "{origin} to {destination} is an invalid move")?,
            GameError::OffBoard(position) => write!(f, "{position} is off the board")?,
            GameError::NotSelectable(position) => {
                write!(f, "{position} holds no piece of the player to move")?;
            }
            GameError::GameOver(condition) => write!(f, "the game is over by {condition}")?,
        }
        Ok(())
    }
}
impl Error for GameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GameError::InvalidBoard(err) => Some(err),
            _ => None,
        }
    }
}

/// Classification of a position for the player to move, recomputed on every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    None,
    Check,
    Checkmate,
    Stalemate,
}
impl Condition {
    fn classify(in_check: bool, has_legal_move: bool) -> Self {
        match (in_check, has_legal_move) {
            (true, false) => Condition::Checkmate,
            (false, false) => Condition::Stalemate,
            (true, true) => Condition::Check,
            (false, true) => Condition::None,
        }
    }
    /// Checkmate and stalemate accept no further moves.
    pub fn is_terminal(self) -> bool {
        matches!(self, Condition::Checkmate | Condition::Stalemate)
    }
}
impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Condition::None => write!(f, "none")?,
            Condition::Check => write!(f, "check")?,
            Condition::Checkmate => write!(f, "checkmate")?,
            Condition::Stalemate => write!(f, "stalemate")?,
        }
        Ok(())
    }
}

/// Pieces taken off the board, listed under the side that lost them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Captured {
    white: Vec<Piece>,
    black: Vec<Piece>,
}
impl Index<Color> for Captured {
    type Output = Vec<Piece>;

    fn index(&self, index: Color) -> &Self::Output {
        match index {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}
impl IndexMut<Color> for Captured {
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        match index {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}
impl Serialize for Captured {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        for color in Color::BOTH {
            let symbols: Vec<char> = self[color].iter().copied().map(Piece::symbol).collect();
            map.serialize_entry(&color, &symbols)?;
        }
        map.end()
    }
}

/// A snapshot of a game between two turns.
///
/// Transitions never mutate `self`; each produces a new state that owns its
/// own board, so earlier snapshots stay valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    current_player: Color,
    board: Board,
    selected: Option<Coord>,
    legal_destinations: FxHashMap<Coord, FxHashSet<Coord>>,
    captured: Captured,
    condition: Condition,
}
impl GameState {
    /// A fresh game from the standard starting position.
    pub fn initial() -> Self {
        GameState::new(Board::starting_position()).expect("starting position has both kings")
    }
    /// Starts a game on `board` with white to move.
    pub fn new(board: Board) -> Result<Self, GameError> {
        board.validate()?;
        GameState::settle(Color::White, board, Captured::default())
    }
    /// Reads a symbol grid and starts a game on it.
    pub fn from_rows<I, S>(rows: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        GameState::new(Board::from_rows(rows)?)
    }
    pub fn current_player(&self) -> Color {
        self.current_player
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }
    pub fn captured(&self) -> &Captured {
        &self.captured
    }
    pub fn condition(&self) -> Condition {
        self.condition
    }
    pub fn is_over(&self) -> bool {
        self.condition.is_terminal()
    }
    /// Legal destinations of the piece on `origin`; empty for squares not
    /// holding a piece of the player to move.
    pub fn legal_moves_from(&self, origin: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.legal_destinations.get(&origin).into_iter().flatten().copied()
    }
    pub fn legal_destinations(&self) -> &FxHashMap<Coord, FxHashSet<Coord>> {
        &self.legal_destinations
    }
    pub fn legal_moves(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        self.legal_destinations
            .iter()
            .flat_map(|(origin, destinations)| {
                destinations
                    .iter()
                    .map(move |destination| (*origin, *destination))
            })
    }
    pub fn select(&self, position: Coord) -> Result<Self, GameError> {
        if !position.on_board(self.board.size()) {
            return Err(GameError::OffBoard(position));
        }
        if self
            .board
            .get(position)
            .is_none_or(|piece| piece.color != self.current_player)
        {
            return Err(GameError::NotSelectable(position));
        }
        Ok(GameState {
            selected: Some(position),
            ..self.clone()
        })
    }
    pub fn deselect(&self) -> Self {
        GameState {
            selected: None,
            ..self.clone()
        }
    }
    /// Moves the selected piece to `destination` and hands the turn over.
    pub fn apply_move(&self, destination: Coord) -> Result<Self, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver(self.condition));
        }
        let origin = self.selected.ok_or(GameError::NoSelection)?;
        if !self
            .legal_destinations
            .get(&origin)
            .is_some_and(|destinations| destinations.contains(&destination))
        {
            warn!(%origin, %destination, "rejected move");
            return Err(GameError::InvalidMove {
                origin,
                destination,
            });
        }
        let mut board = self.board.clone();
        let mut captured = self.captured.clone();
        if let Some(piece) = board.move_piece(origin, destination) {
            debug!(%piece, %destination, "captured");
            captured[piece.color].push(piece);
        }
        debug!(player = %self.current_player, %origin, %destination, "move applied");
        GameState::settle(!self.current_player, board, captured)
    }
    /// Selection-or-move dispatch for a click on `position`.
    ///
    /// A click on a legal destination of the selection plays the move; a click
    /// on one of the mover's pieces (re)selects it, unless it is already
    /// selected; anything else clears the selection.
    pub fn on_square_clicked(&self, position: Coord) -> Result<Self, GameError> {
        if let Some(origin) = self.selected {
            if self.legal_moves_from(origin).any(|destination| destination == position) {
                return self.apply_move(position);
            }
            if origin == position {
                return Ok(self.deselect());
            }
        }
        match self.select(position) {
            Ok(state) => Ok(state),
            Err(GameError::NotSelectable(_)) => Ok(self.deselect()),
            Err(err) => Err(err),
        }
    }
    /// Computes every derived field for `current_player` on `board`.
    fn settle(current_player: Color, board: Board, captured: Captured) -> Result<Self, GameError> {
        let king = board
            .find_king(current_player)
            .ok_or(GameError::MissingKing(current_player))?;
        let attack_map = AttackMap::new(&board, current_player);
        let lifted_attack_map = AttackMap::with_king_lifted(&board, current_player);

        let mut legal = FxHashMap::default();
        for (origin, piece) in board.pieces_of(current_player) {
            if piece.kind != PieceKind::King {
                let destinations =
                    legal_destinations(&board, origin, king, &attack_map, &lifted_attack_map);
                legal.insert(origin, destinations);
            }
        }
        legal.insert(
            king,
            legal_destinations(&board, king, king, &attack_map, &lifted_attack_map),
        );

        let in_check = attack_map.is_attacked(king);
        let has_legal_move = legal.values().any(|destinations| !destinations.is_empty());
        let condition = Condition::classify(in_check, has_legal_move);
        trace!(
            player = %current_player,
            moves = legal.values().map(|destinations| destinations.len()).sum::<usize>(),
            "legal moves computed"
        );
        if condition != Condition::None {
            debug!(player = %current_player, %condition, "condition");
        }
        Ok(GameState {
            current_player,
            board,
            selected: None,
            legal_destinations: legal,
            captured,
            condition,
        })
    }
}
impl Default for GameState {
    fn default() -> Self {
        GameState::initial()
    }
}
/// Keys become `"row,col"` text and destination lists are sorted, so the
/// output is stable.
fn serialize_legal_destinations<S>(
    legal_destinations: &FxHashMap<Coord, FxHashSet<Coord>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut origins: Vec<_> = legal_destinations.keys().copied().collect();
    origins.sort_unstable();
    let mut map = serializer.serialize_map(Some(origins.len()))?;
    for origin in origins {
        let mut destinations: Vec<_> = legal_destinations[&origin].iter().copied().collect();
        destinations.sort_unstable();
        let destinations: Vec<String> = destinations.into_iter().map(Coord::to_key).collect();
        map.serialize_entry(&origin.to_key(), &destinations)?;
    }
    map.end()
}
impl Serialize for GameState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            player: Color,
            board: &'a Board,
            selected: Option<String>,
            #[serde(serialize_with = "serialize_legal_destinations")]
            legal_destinations: &'a FxHashMap<Coord, FxHashSet<Coord>>,
            captured: &'a Captured,
            condition: Condition,
        }
        Snapshot {
            player: self.current_player,
            board: &self.board,
            selected: self.selected.map(Coord::to_key),
            legal_destinations: &self.legal_destinations,
            captured: &self.captured,
            condition: self.condition,
        }
        .serialize(serializer)
    }
}
#[cfg(test)]
mod test {
    use rustc_hash::FxHashSet;

    use crate::{
        attacks::AttackMap,
        color::Color,
        coord::Coord,
        game::{Condition, GameError, GameState},
        piece::{Piece, PieceKind},
    };

    fn symbols(state: &GameState) -> Vec<String> {
        state
            .board()
            .to_symbols()
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect()
    }

    #[test]
    fn pieces_can_be_moved() {
        let state = GameState::from_rows([" PK", "   ", " k "]).unwrap();
        assert_eq!(state.current_player(), Color::White);
        let destinations: Vec<_> = state.legal_moves_from(Coord::new(0, 1)).collect();
        assert_eq!(destinations, [Coord::new(1, 1)]);

        let state = state
            .select(Coord::new(0, 1))
            .unwrap()
            .apply_move(Coord::new(1, 1))
            .unwrap();
        assert_eq!(symbols(&state), ["  K", " P ", " k "]);
        assert_eq!(state.current_player(), Color::Black);
        assert_eq!(state.selected(), None);
    }
    #[test]
    fn rook_on_the_rank_gives_check() {
        let state = GameState::from_rows(["r  K", "    ", "    ", "  k "]).unwrap();
        assert_eq!(state.condition(), Condition::Check);
        assert!(!state.is_over());
    }
    #[test]
    fn cornered_king_is_checkmated() {
        let state = GameState::from_rows(["r K", "   ", " k "]).unwrap();
        assert_eq!(state.condition(), Condition::Checkmate);
        assert!(state.is_over());
        assert_eq!(state.legal_moves().count(), 0);
    }
    #[test]
    fn king_without_moves_and_not_attacked_is_stalemated() {
        // the rook covers (0,1) and (1,0); the black king defends the rook
        let state = GameState::from_rows(["K  ", " r ", "  k"]).unwrap();
        assert_eq!(state.condition(), Condition::Stalemate);
        assert!(state.is_over());
    }
    #[test]
    fn starting_position_has_twenty_moves() {
        let state = GameState::initial();
        assert_eq!(state.condition(), Condition::None);
        assert_eq!(state.legal_moves().count(), 20);
    }
    #[test]
    fn legal_destinations_only_for_player_to_move() {
        let state = GameState::initial();
        assert!(
            state
                .legal_destinations()
                .keys()
                .all(|origin| state.board()[*origin].unwrap().color == Color::White)
        );
        assert_eq!(state.legal_destinations().len(), 16);
    }
    #[test]
    fn move_without_selection_is_rejected() {
        let state = GameState::initial();
        assert_eq!(
            state.apply_move(Coord::new(3, 4)),
            Err(GameError::NoSelection)
        );
    }
    #[test]
    fn illegal_destination_leaves_state_untouched() {
        let state = GameState::initial().select(Coord::new(1, 4)).unwrap();
        let before = state.clone();
        assert_eq!(
            state.apply_move(Coord::new(4, 4)),
            Err(GameError::InvalidMove {
                origin: Coord::new(1, 4),
                destination: Coord::new(4, 4)
            })
        );
        assert_eq!(state, before);
    }
    #[test]
    fn captures_go_to_the_losing_side() {
        let state = GameState::from_rows(["K  ", " r ", "   ", "  k"]).unwrap();
        let state = state
            .select(Coord::new(0, 0))
            .unwrap()
            .apply_move(Coord::new(1, 1))
            .unwrap();
        assert_eq!(
            state.captured()[Color::Black],
            [Piece::new(Color::Black, PieceKind::Rook)]
        );
        assert!(state.captured()[Color::White].is_empty());
    }
    #[test]
    fn earlier_states_are_not_mutated() {
        let first = GameState::initial().select(Coord::new(1, 4)).unwrap();
        let second = first.apply_move(Coord::new(3, 4)).unwrap();
        assert_eq!(first.board()[Coord::new(1, 4)].map(Piece::symbol), Some('P'));
        assert_eq!(first.board()[Coord::new(3, 4)], None);
        assert_eq!(second.board()[Coord::new(3, 4)].map(Piece::symbol), Some('P'));
    }
    #[test]
    fn missing_king_is_fatal() {
        assert!(matches!(
            GameState::from_rows([" P ", "   ", " k "]),
            Err(GameError::InvalidBoard(_))
        ));
    }
    #[test]
    fn selection_rules() {
        let state = GameState::initial();
        assert_eq!(
            state.select(Coord::new(6, 0)),
            Err(GameError::NotSelectable(Coord::new(6, 0)))
        );
        assert_eq!(
            state.select(Coord::new(4, 4)),
            Err(GameError::NotSelectable(Coord::new(4, 4)))
        );
        assert_eq!(
            state.select(Coord::new(8, 0)),
            Err(GameError::OffBoard(Coord::new(8, 0)))
        );
    }
    #[test]
    fn clicks_select_move_and_deselect() {
        let state = GameState::initial();
        let state = state.on_square_clicked(Coord::new(1, 4)).unwrap();
        assert_eq!(state.selected(), Some(Coord::new(1, 4)));

        let state = state.on_square_clicked(Coord::new(0, 6)).unwrap();
        assert_eq!(state.selected(), Some(Coord::new(0, 6)));

        let state = state.on_square_clicked(Coord::new(0, 6)).unwrap();
        assert_eq!(state.selected(), None);

        let state = state.on_square_clicked(Coord::new(1, 4)).unwrap();
        let state = state.on_square_clicked(Coord::new(4, 4)).unwrap();
        assert_eq!(state.selected(), None);
        assert_eq!(state.current_player(), Color::White);

        let state = state.on_square_clicked(Coord::new(1, 4)).unwrap();
        let state = state.on_square_clicked(Coord::new(3, 4)).unwrap();
        assert_eq!(state.current_player(), Color::Black);
    }
    #[test]
    fn fools_mate() {
        let mut state = GameState::initial();
        for (origin, destination) in [((1, 5), (2, 5)), ((6, 4), (4, 4)), ((1, 6), (3, 6)), ((7, 3), (3, 7))] {
            state = state
                .on_square_clicked(Coord::new(origin.0, origin.1))
                .unwrap()
                .on_square_clicked(Coord::new(destination.0, destination.1))
                .unwrap();
        }
        assert_eq!(state.condition(), Condition::Checkmate);
        assert_eq!(
            state
                .select(Coord::new(1, 0))
                .unwrap()
                .apply_move(Coord::new(2, 0)),
            Err(GameError::GameOver(Condition::Checkmate))
        );
    }
    #[test]
    fn legal_moves_never_expose_the_king() {
        let state = GameState::from_rows([
            "  K  R  ",
            " P  N   ",
            "   B    ",
            "  q  b  ",
            "        ",
            "    r   ",
            "        ",
            "  k     ",
        ])
        .unwrap();
        for (origin, destination) in state.legal_moves() {
            let board = state.board().clone_and_move(origin, destination);
            let king = board.find_king(Color::White).unwrap();
            assert!(
                !AttackMap::new(&board, Color::White).is_attacked(king),
                "{origin} to {destination} leaves the king attacked"
            );
        }
        let moves: FxHashSet<_> = state.legal_moves().collect();
        assert!(!moves.is_empty());
    }
    #[test]
    fn serializes_for_rendering() {
        let state = GameState::from_rows([" PK", "   ", " k "])
            .unwrap()
            .select(Coord::new(0, 1))
            .unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "player": "white",
                "board": [[" ", "P", "K"], [" ", " ", " "], [" ", "k", " "]],
                "selected": "0,1",
                "legal_destinations": {
                    "0,1": ["1,1"],
                    "0,2": []
                },
                "captured": { "white": [], "black": [] },
                "condition": "none"
            })
        );
    }
    #[test]
    fn sliders_cross_the_widest_boards() {
        let mut rows = vec![" ".repeat(200); 3];
        rows[0].replace_range(0..2, "KR");
        rows[2].replace_range(0..1, "k");
        let state = GameState::from_rows(&rows).unwrap();
        let destinations: FxHashSet<_> = state.legal_moves_from(Coord::new(0, 1)).collect();
        assert_eq!(destinations.len(), 200);
        assert!(destinations.contains(&Coord::new(0, 199)));
        assert!(destinations.contains(&Coord::new(2, 1)));
    }
}
