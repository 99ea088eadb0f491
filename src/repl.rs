use std::{
    error::Error,
    fmt::{self, Display, Formatter, Write as _},
    io::{self, BufRead, Write},
    str::FromStr,
};

use tracing::{debug, info};

use crate::{
    board_display::BoardDisplay,
    color::Color,
    config::GameConfig,
    coord::{Coord, ParseCoordKeyError},
    game::{Condition, GameState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Input {
    Help,
    Flip,
    Restart,
    Board,
    Json,
    Quit,
    Square(Coord),
}
impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Input::Help => write!(f, "help")?,
            Input::Flip => write!(f, "flip")?,
            Input::Restart => write!(f, "restart")?,
            Input::Board => write!(f, "board")?,
            Input::Json => write!(f, "json")?,
            Input::Quit => write!(f, "quit")?,
            Input::Square(position) => write!(f, "{position}")?,
        }
        Ok(())
    }
}
impl FromStr for Input {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "help" => Ok(Input::Help),
            "flip" => Ok(Input::Flip),
            "restart" => Ok(Input::Restart),
            "board" => Ok(Input::Board),
            "json" => Ok(Input::Json),
            "quit" | "exit" => Ok(Input::Quit),
            "" => Err(ParseInputError::Empty),
            s => Ok(Input::Square(s.parse()?)),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseInputError {
    Empty,
    Coord(ParseCoordKeyError),
}
impl From<ParseCoordKeyError> for ParseInputError {
    fn from(value: ParseCoordKeyError) -> Self {
        ParseInputError::Coord(value)
    }
}
impl Display for ParseInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseInputError::Empty => write!(f, "empty input")?,
            ParseInputError::Coord(err) => write!(f, "{err}")?,
        }
        Ok(())
    }
}
impl Error for ParseInputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseInputError::Empty => None,
            ParseInputError::Coord(err) => Some(err),
        }
    }
}
fn status(state: &GameState) -> String {
    let mut info = String::new();
    match state.condition() {
        Condition::None => writeln!(info, "{} plays", state.current_player()).unwrap(),
        Condition::Check => writeln!(info, "{} plays, in check", state.current_player()).unwrap(),
        Condition::Checkmate => {
            writeln!(info, "checkmate, {} wins", !state.current_player()).unwrap();
        }
        Condition::Stalemate => writeln!(info, "stalemate").unwrap(),
    }
    for color in Color::BOTH {
        let captured = &state.captured()[color];
        if !captured.is_empty() {
            let figurines: String = captured.iter().map(|piece| piece.figurine()).collect();
            writeln!(info, "{color} lost {figurines}").unwrap();
        }
    }
    info
}
/// Runs an interactive session on stdin and stdout.
pub fn repl(config: &GameConfig) -> io::Result<()> {
    run(
        config,
        io::stdin().lock(),
        io::stdout().lock(),
        io::stderr().lock(),
    )
}
#[allow(
    clippy::too_many_lines,
    reason = "further decomposition could potentially hurt readability"
)]
fn run<R, W, E>(config: &GameConfig, input: R, mut output: W, mut error: E) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let restart = || {
        config
            .starting_board()
            .map_err(Into::into)
            .and_then(GameState::new)
    };
    let mut state = match restart() {
        Ok(state) => state,
        Err(err) => {
            writeln!(error, "Error: {err}")?;
            return Ok(());
        }
    };
    let mut lines = input.lines();
    let mut view = config.view;
    let mut first_time = true;
    let mut redraw = true;
    loop {
        if redraw {
            let mut info = status(&state);
            if first_time {
                writeln!(info, "type `help` for instructions").unwrap();
                first_time = false;
            }
            let highlighted: Vec<_> = state
                .selected()
                .into_iter()
                .flat_map(|origin| state.legal_moves_from(origin))
                .collect();
            writeln!(
                output,
                "{}",
                BoardDisplay {
                    board: state.board(),
                    view,
                    show_coordinates: config.coordinates,
                    selected: state.selected(),
                    highlighted: &highlighted,
                    info: &info,
                },
            )?;
        }
        redraw = true;
        write!(output, "> ")?;
        output.flush()?;
        let Some(text) = lines.next() else {
            return Ok(());
        };
        let text = text?;
        let input = match text.trim().parse() {
            Ok(input) => input,
            Err(err) => {
                writeln!(error, "Error: {err}")?;
                writeln!(error, "for available commands, enter `help`")?;
                redraw = false;
                continue;
            }
        };
        debug!(%input, "input");
        match input {
            Input::Help => {
                writeln!(output, "flip    - flip the board")?;
                writeln!(output, "restart - reset to the starting board")?;
                writeln!(output, "board   - print the board as symbols")?;
                writeln!(output, "json    - print the game state as json")?;
                writeln!(output, "quit    - quit the game")?;
                writeln!(output, "1,4     - select, move to, or deselect a square")?;
                redraw = false;
            }
            Input::Flip => view = !view,
            Input::Restart => match restart() {
                Ok(new_state) => {
                    info!("game restarted");
                    state = new_state;
                }
                Err(err) => writeln!(error, "Error: {err}")?,
            },
            Input::Board => {
                writeln!(output, "{}", state.board())?;
                redraw = false;
            }
            Input::Json => {
                writeln!(output, "{}", serde_json::to_string(&state)?)?;
                redraw = false;
            }
            Input::Quit => return Ok(()),
            Input::Square(position) => match state.on_square_clicked(position) {
                Ok(new_state) => state = new_state,
                Err(err) => {
                    writeln!(error, "Error: {err}")?;
                    redraw = false;
                }
            },
        }
    }
}
