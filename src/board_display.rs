use std::fmt::{self, Display, Formatter};

use crate::{
    color::Color,
    coord::{Coord, Size},
    piece::Piece,
};

const LIGHT: &str = "\x1b[30;107m";
const DARK: &str = "\x1b[30;47m";
const HIGHLIGHTED: &str = "\x1b[30;103m";
const SELECTED: &str = "\x1b[30;102m";
const RESET: &str = "\x1b[0m";

pub trait IndexableBoard {
    fn size(&self) -> Size;
    fn index(&self, position: Coord) -> Option<Piece>;
}
/// Draws a board for a terminal. `view` is the side drawn at the bottom.
pub struct BoardDisplay<'a, 'b, T> {
    pub board: T,
    pub view: Color,
    pub show_coordinates: bool,
    pub selected: Option<Coord>,
    pub highlighted: &'a [Coord],
    pub info: &'b str,
}
impl<T> BoardDisplay<'_, '_, T> {
    pub fn new(board: T) -> Self {
        BoardDisplay {
            board,
            view: Color::White,
            show_coordinates: true,
            selected: None,
            highlighted: &[],
            info: "",
        }
    }
}
impl<T> Display for BoardDisplay<'_, '_, T>
where
    T: IndexableBoard,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let size = self.board.size();
        let mut lines = self.info.lines().fuse();
        for i in 0..size.rows {
            let row = match self.view {
                Color::White => size.rows - 1 - i,
                Color::Black => i,
            };
            for j in 0..size.cols {
                let col = match self.view {
                    Color::White => j,
                    Color::Black => size.cols - 1 - j,
                };
                let position = Coord::new(row, col);
                let color = if self.selected == Some(position) {
                    SELECTED
                } else if self.highlighted.contains(&position) {
                    HIGHLIGHTED
                } else if (row ^ col) & 1 == 0 {
                    DARK
                } else {
                    LIGHT
                };
                let figurine = self.board.index(position).map_or(' ', Piece::figurine);
                write!(f, "{color}{figurine} {RESET}")?;
            }
            if self.show_coordinates {
                write!(f, " {row:>2}")?;
            }
            if let Some(line) = lines.next() {
                write!(f, " {line}")?;
            }
            writeln!(f)?;
        }
        if self.show_coordinates {
            for j in 0..size.cols {
                let col = match self.view {
                    Color::White => j,
                    Color::Black => size.cols - 1 - j,
                };
                // columns past 9 only show their last digit
                write!(f, "{} ", col % 10)?;
            }
        }
        if let Some(line) = lines.next() {
            write!(f, "   {line}")?;
        }
        writeln!(f)?;
        for line in lines {
            writeln!(f, "{:width$}{line}", "", width = size.cols as usize * 2 + 3)?;
        }
        Ok(())
    }
}
impl<T> IndexableBoard for &T
where
    T: IndexableBoard,
{
    fn size(&self) -> Size {
        (**self).size()
    }
    fn index(&self, position: Coord) -> Option<Piece> {
        (**self).index(position)
    }
}
