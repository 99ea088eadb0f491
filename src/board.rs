use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    ops::{Index, IndexMut},
};

use serde::{Deserialize, Serialize};

use crate::{
    board_display::IndexableBoard,
    color::Color,
    coord::{Coord, Size},
    piece::{InvalidSymbol, Piece, PieceKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidBoard {
    Empty,
    TooLarge,
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    InvalidSymbol {
        position: Coord,
        symbol: InvalidSymbol,
    },
    KingCount {
        color: Color,
        found: usize,
    },
}
impl Display for InvalidBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InvalidBoard::Empty => write!(f, "board has no squares")?,
            InvalidBoard::TooLarge => write!(f, "board exceeds 255 rows or columns")?,
            InvalidBoard::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} squares, {expected} were expected"
            )?,
            InvalidBoard::InvalidSymbol { position, symbol } => write!(f, "at {position}: {symbol}")?,
            InvalidBoard::KingCount { color, found } => {
                write!(f, "found {found} {color} kings, exactly 1 was expected")?;
            }
        }
        Ok(())
    }
}
impl Error for InvalidBoard {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InvalidBoard::InvalidSymbol { symbol, .. } => Some(symbol),
            _ => None,
        }
    }
}

/// A rectangular grid of optional occupants, stored row-major.
///
/// Cloning is a deep copy; every game state owns its board outright.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<char>>", into = "Vec<Vec<char>>")]
pub struct Board {
    size: Size,
    squares: Box<[Option<Piece>]>,
}
impl Board {
    pub fn empty(size: Size) -> Self {
        Board {
            size,
            squares: vec![None; size.area()].into_boxed_slice(),
        }
    }
    /// The standard 8×8 layout with white on rows 0 and 1.
    pub fn starting_position() -> Self {
        let mut board = Board::empty(Size::STANDARD);
        for color in Color::BOTH {
            let (back, pawns) = match color {
                Color::White => (0, 1),
                Color::Black => (7, 6),
            };
            for (col, kind) in (0..).zip(PieceKind::STARTING_CONFIGURATION) {
                board[Coord::new(back, col)] = Some(Piece::new(color, kind));
                board[Coord::new(pawns, col)] = Some(Piece::new(color, PieceKind::Pawn));
            }
        }
        board
    }
    /// Reads rows of symbols, one `char` per square.
    pub fn from_rows<I, S>(rows: I) -> Result<Self, InvalidBoard>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cols = None;
        let mut squares = Vec::new();
        let mut row_count = 0;
        for (row, text) in rows.into_iter().enumerate() {
            let row_u8 = u8::try_from(row).map_err(|_| InvalidBoard::TooLarge)?;
            let start = squares.len();
            for (col, symbol) in text.as_ref().chars().enumerate() {
                let col = u8::try_from(col).map_err(|_| InvalidBoard::TooLarge)?;
                let piece = Piece::from_square_symbol(symbol).map_err(|symbol| {
                    InvalidBoard::InvalidSymbol {
                        position: Coord::new(row_u8, col),
                        symbol,
                    }
                })?;
                squares.push(piece);
            }
            let found = squares.len() - start;
            let expected = *cols.get_or_insert(found);
            if found != expected {
                return Err(InvalidBoard::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }
            row_count += 1;
        }
        let cols = cols.unwrap_or(0);
        if row_count == 0 || cols == 0 {
            return Err(InvalidBoard::Empty);
        }
        Ok(Board {
            size: Size {
                rows: u8::try_from(row_count).map_err(|_| InvalidBoard::TooLarge)?,
                cols: u8::try_from(cols).map_err(|_| InvalidBoard::TooLarge)?,
            },
            squares: squares.into_boxed_slice(),
        })
    }
    /// The symbol grid, row-major, blank for empty squares.
    pub fn to_symbols(&self) -> Vec<Vec<char>> {
        self.squares
            .chunks(self.size.cols as usize)
            .map(|row| row.iter().copied().map(Piece::square_symbol).collect())
            .collect()
    }
    pub fn size(&self) -> Size {
        self.size
    }
    pub fn get(&self, position: Coord) -> Option<Piece> {
        if position.on_board(self.size) {
            self[position]
        } else {
            None
        }
    }
    /// Replaces the occupant of `position`, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics when `position` is off the board, the same as indexing.
    pub fn set(&mut self, position: Coord, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self[position], piece)
    }
    /// Relocates the occupant of `origin`, overwriting whatever stood on `destination`.
    ///
    /// # Panics
    ///
    /// Panics when either square is off the board.
    pub fn move_piece(&mut self, origin: Coord, destination: Coord) -> Option<Piece> {
        let piece = self.set(origin, None);
        self.set(destination, piece)
    }
    pub fn clone_and_move(&self, origin: Coord, destination: Coord) -> Self {
        let mut new = self.clone();
        new.move_piece(origin, destination);
        new
    }
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.size
            .coords()
            .zip(self.squares.iter().copied())
            .filter_map(|(position, piece)| piece.map(|piece| (position, piece)))
    }
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }
    /// `None` is a legitimate answer while a move is being simulated.
    pub fn find_king(&self, color: Color) -> Option<Coord> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(position, _)| position)
    }
    pub fn validate(&self) -> Result<(), InvalidBoard> {
        for color in Color::BOTH {
            let found = self
                .pieces_of(color)
                .filter(|(_, piece)| piece.kind == PieceKind::King)
                .count();
            if found != 1 {
                return Err(InvalidBoard::KingCount { color, found });
            }
        }
        Ok(())
    }
}
impl Index<Coord> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.squares[index.index(self.size)]
    }
}
impl IndexMut<Coord> for Board {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        let index = index.index(self.size);
        &mut self.squares[index]
    }
}
impl IndexableBoard for Board {
    fn size(&self) -> Size {
        self.size
    }
    fn index(&self, position: Coord) -> Option<Piece> {
        self[position]
    }
}
impl TryFrom<Vec<Vec<char>>> for Board {
    type Error = InvalidBoard;

    fn try_from(value: Vec<Vec<char>>) -> Result<Self, Self::Error> {
        Board::from_rows(value.iter().map(|row| row.iter().collect::<String>()))
    }
}
impl From<Board> for Vec<Vec<char>> {
    fn from(value: Board) -> Self {
        value.to_symbols()
    }
}
impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.to_symbols() {
            writeln!(f, "[{}]", row.into_iter().collect::<String>())?;
        }
        Ok(())
    }
}
