use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    fs, io,
    path::Path,
};

use serde::Deserialize;

use crate::{
    board::{Board, InvalidBoard},
    color::Color,
};

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Toml(toml::de::Error),
    Board(InvalidBoard),
}
impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        ConfigError::Io(value)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Toml(value)
    }
}
impl From<InvalidBoard> for ConfigError {
    fn from(value: InvalidBoard) -> Self {
        ConfigError::Board(value)
    }
}
impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "cannot read configuration: {err}")?,
            ConfigError::Toml(err) => write!(f, "malformed configuration: {err}")?,
            ConfigError::Board(err) => write!(f, "invalid starting board: {err}")?,
        }
        Ok(())
    }
}
impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Toml(err) => Some(err),
            ConfigError::Board(err) => Some(err),
        }
    }
}

/// Settings of an interactive session, read from TOML:
///
/// ```toml
/// view = "black"
/// coordinates = false
/// board = [
///     " K ",
///     "   ",
///     " k ",
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Rows of symbols, row 0 first. The standard layout when absent.
    board: Option<Vec<String>>,
    pub view: Color,
    pub coordinates: bool,
}
impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board: None,
            view: Color::White,
            coordinates: true,
        }
    }
}
impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: GameConfig = text.parse()?;
        Ok(config)
    }
    /// A fresh board for a new game. Validated when the config was parsed.
    pub fn starting_board(&self) -> Result<Board, InvalidBoard> {
        match &self.board {
            Some(rows) => Board::from_rows(rows),
            None => Ok(Board::starting_position()),
        }
    }
}
impl std::str::FromStr for GameConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: GameConfig = toml::from_str(s)?;
        config.starting_board()?.validate()?;
        Ok(config)
    }
}
