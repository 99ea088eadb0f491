#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod attacks;
pub mod board;
pub mod board_display;
pub mod color;
pub mod config;
pub mod coord;
pub mod game;
pub mod legality;
pub mod movement;
pub mod piece;
pub mod repl;

#[cfg(test)]
mod fuzz;

pub use crate::{
    board::{Board, InvalidBoard},
    color::Color,
    coord::Coord,
    game::{Condition, GameError, GameState},
    piece::{Piece, PieceKind},
};
