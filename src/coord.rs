use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    iter,
    num::ParseIntError,
    str::FromStr,
};

use crate::color::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCoordKeyError {
    MissingSeparator,
    InvalidRow(ParseIntError),
    InvalidCol(ParseIntError),
}
impl Display for ParseCoordKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseCoordKeyError::MissingSeparator => {
                write!(f, "expected `<row>,<col>`, no `,` found")?;
            }
            ParseCoordKeyError::InvalidRow(err) => write!(f, "invalid row: {err}")?,
            ParseCoordKeyError::InvalidCol(err) => write!(f, "invalid column: {err}")?,
        }
        Ok(())
    }
}
impl Error for ParseCoordKeyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseCoordKeyError::MissingSeparator => None,
            ParseCoordKeyError::InvalidRow(err) | ParseCoordKeyError::InvalidCol(err) => Some(err),
        }
    }
}

/// Dimensions of a board. Every bound check derives from this, never from a fixed 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub rows: u8,
    pub cols: u8,
}
impl Size {
    pub const STANDARD: Self = Size { rows: 8, cols: 8 };

    pub fn area(self) -> usize {
        self.rows as usize * self.cols as usize
    }
    pub fn contains(self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }
    pub fn coords(self) -> impl Iterator<Item = Coord> {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Coord::new(row, col)))
    }
}

/// A square address. Row 0 is white's back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}
impl Coord {
    pub fn new(row: u8, col: u8) -> Self {
        Coord { row, col }
    }
    /// On-board iff both components lie in `[0, size)`; negative offsets never produce a `Coord`.
    pub fn on_board(self, size: Size) -> bool {
        size.contains(self)
    }
    pub fn move_by(self, movement: Vector, size: Size) -> Option<Self> {
        let coord = Coord::new(
            self.row.checked_add_signed(movement.row)?,
            self.col.checked_add_signed(movement.col)?,
        );
        coord.on_board(size).then_some(coord)
    }
    /// Squares along `direction`, excluding `self`, until the edge of the board.
    pub fn line_exclusive(self, direction: Vector, size: Size) -> impl Iterator<Item = Self> {
        debug_assert_ne!(direction, Vector::ZERO);
        iter::successors(self.move_by(direction, size), move |coord| {
            coord.move_by(direction, size)
        })
    }
    pub fn to_key(self) -> String {
        self.to_string()
    }
    pub fn from_key(key: &str) -> Result<Self, ParseCoordKeyError> {
        key.parse()
    }
    /// Panics when `self` lies outside `size`.
    pub(crate) fn index(self, size: Size) -> usize {
        assert!(
            self.on_board(size),
            "{self} is off a {}x{} board",
            size.rows,
            size.cols
        );
        self.row as usize * size.cols as usize + self.col as usize
    }
}
impl Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)?;
        Ok(())
    }
}
impl FromStr for Coord {
    type Err = ParseCoordKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or(ParseCoordKeyError::MissingSeparator)?;
        Ok(Coord {
            row: row.trim().parse().map_err(ParseCoordKeyError::InvalidRow)?,
            col: col.trim().parse().map_err(ParseCoordKeyError::InvalidCol)?,
        })
    }
}
pub fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}
pub fn pawn_home_rank(color: Color, size: Size) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => size.rows.saturating_sub(2),
    }
}
pub fn home_rank(color: Color, size: Size) -> u8 {
    match color {
        Color::White => 0,
        Color::Black => size.rows.saturating_sub(1),
    }
}
pub fn last_rank(color: Color, size: Size) -> u8 {
    home_rank(!color, size)
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    pub row: i8,
    pub col: i8,
}
impl Vector {
    pub const ZERO: Self = Vector { row: 0, col: 0 };

    pub const KNIGHT_MOVES: [Self; 8] = [
        Vector { row: -1, col: -2 },
        Vector { row: 1, col: -2 },
        Vector { row: -1, col: 2 },
        Vector { row: 1, col: 2 },
        Vector { row: -2, col: -1 },
        Vector { row: 2, col: -1 },
        Vector { row: -2, col: 1 },
        Vector { row: 2, col: 1 },
    ];
    pub const KING_MOVES: [Self; 8] = [
        Vector { row: -1, col: -1 },
        Vector { row: 0, col: -1 },
        Vector { row: 1, col: -1 },
        Vector { row: -1, col: 0 },
        Vector { row: 1, col: 0 },
        Vector { row: -1, col: 1 },
        Vector { row: 0, col: 1 },
        Vector { row: 1, col: 1 },
    ];
    pub const ROOK_DIRECTIONS: [Self; 4] = [
        Vector { row: -1, col: 0 },
        Vector { row: 1, col: 0 },
        Vector { row: 0, col: -1 },
        Vector { row: 0, col: 1 },
    ];
    pub const BISHOP_DIRECTIONS: [Self; 4] = [
        Vector { row: -1, col: -1 },
        Vector { row: 1, col: -1 },
        Vector { row: -1, col: 1 },
        Vector { row: 1, col: 1 },
    ];
    pub const QUEEN_DIRECTIONS: [Self; 8] = Vector::KING_MOVES;

    pub fn pawn_single_move(color: Color) -> Self {
        Vector {
            row: pawn_direction(color),
            col: 0,
        }
    }
    pub fn pawn_attacks(color: Color) -> [Self; 2] {
        [-1, 1].map(|col| Vector {
            row: pawn_direction(color),
            col,
        })
    }
}
