use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    pub const ALL: [Self; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];
    pub const STARTING_CONFIGURATION: [Self; 8] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
    pub fn uppercase(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
    pub fn lowercase(self) -> char {
        self.uppercase().to_ascii_lowercase()
    }
}
impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn")?,
            PieceKind::Knight => write!(f, "knight")?,
            PieceKind::Bishop => write!(f, "bishop")?,
            PieceKind::Rook => write!(f, "rook")?,
            PieceKind::Queen => write!(f, "queen")?,
            PieceKind::King => write!(f, "king")?,
        }
        Ok(())
    }
}

/// The occupant of a non-empty square. Carries no move history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}
impl Piece {
    pub const BLANK_SYMBOL: char = ' ';

    pub fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }
    /// Uppercase for white, lowercase for black.
    pub fn symbol(self) -> char {
        match self.color {
            Color::White => self.kind.uppercase(),
            Color::Black => self.kind.lowercase(),
        }
    }
    pub fn from_symbol(symbol: char) -> Result<Self, InvalidSymbol> {
        let kind = match symbol.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return Err(InvalidSymbol(symbol)),
        };
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Piece { color, kind })
    }
    /// Reads one square of the symbol grid, where the blank symbol is an empty square.
    pub fn from_square_symbol(symbol: char) -> Result<Option<Self>, InvalidSymbol> {
        if symbol == Piece::BLANK_SYMBOL {
            Ok(None)
        } else {
            Piece::from_symbol(symbol).map(Some)
        }
    }
    pub fn square_symbol(piece: Option<Self>) -> char {
        piece.map_or(Piece::BLANK_SYMBOL, Piece::symbol)
    }
    pub fn figurine(self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }
}
impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)?;
        Ok(())
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidSymbol(pub char);
impl Display for InvalidSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found `{}`, expected a blank or one of `p`, `n`, `b`, `r`, `q`, `k`, or uppercase forms of these letters",
            self.0
        )?;
        Ok(())
    }
}
impl Error for InvalidSymbol {}

#[cfg(test)]
mod test {
    use crate::{
        color::Color,
        piece::{InvalidSymbol, Piece, PieceKind},
    };

    #[test]
    fn case_decides_color() {
        assert_eq!(
            Piece::from_symbol('N'),
            Ok(Piece::new(Color::White, PieceKind::Knight))
        );
        assert_eq!(
            Piece::from_symbol('q'),
            Ok(Piece::new(Color::Black, PieceKind::Queen))
        );
    }
    #[test]
    fn every_piece_symbol_reads_back() {
        for color in Color::BOTH {
            for kind in PieceKind::ALL {
                let piece = Piece::new(color, kind);
                assert_eq!(Piece::from_symbol(piece.symbol()), Ok(piece));
            }
        }
    }
    #[test]
    fn blank_is_empty_square() {
        assert_eq!(Piece::from_square_symbol(' '), Ok(None));
        assert_eq!(Piece::square_symbol(None), ' ');
        assert_eq!(Piece::from_square_symbol('x'), Err(InvalidSymbol('x')));
    }
}
