use thiserror::Error;

use brotlink_client::{Key, PointerButton};
use brotlink_core::{ColorScheme, CoreError, Preset, RenderMode};

/// One line of console input, mapped onto the controls of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Command {
    /// Iteration slider moved but not released.
    IterDrag(u32),
    /// Iteration slider released.
    Iter(u32),
    PrecisionDrag(u32),
    Precision(u32),
    Color(ColorScheme),
    Mode(RenderMode),
    Preset(Preset),
    Reset,
    Click { x: f64, y: f64, button: PointerButton },
    Key(Key),
    Benchmark,
    State,
    Save,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum CommandError {
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("`{command}`: {value:?} is not a valid number")]
    InvalidNumber { command: &'static str, value: String },

    #[error("{0}")]
    InvalidButton(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub(crate) const HELP: &str = "\
commands:
  iter <n>               set max iterations and render
  iter-drag <n>          preview the iteration label only
  precision <n>          set precision (bits) and render
  precision-drag <n>     preview the precision label only
  color <scheme>         classic | fire | ocean | grayscale
  mode <cpu|fpga>        choose the backend execution path
  preset <name>          seahorse | elephant | spiral
  reset                  back to the full view
  click <x> <y> [btn]    re-centre on a pixel; primary zooms in, secondary out
  key <name>             up | down | left | right (or ArrowUp, ...)
  bench                  run the CPU vs FPGA benchmark
  state                  print the current view state
  save                   keep the current controls for the next start
  help                   this text
  quit                   exit";

/// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
pub(crate) fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "iter" => Command::Iter(number(&mut words, "iter")?),
        "iter-drag" => Command::IterDrag(number(&mut words, "iter-drag")?),
        "precision" => Command::Precision(number(&mut words, "precision")?),
        "precision-drag" => Command::PrecisionDrag(number(&mut words, "precision-drag")?),
        "color" => Command::Color(word(&mut words, "color", "a color scheme")?.parse()?),
        "mode" => Command::Mode(word(&mut words, "mode", "cpu or fpga")?.parse()?),
        "preset" => Command::Preset(word(&mut words, "preset", "a preset name")?.parse()?),
        "reset" => Command::Reset,
        "click" => {
            let x = coordinate(&mut words)?;
            let y = coordinate(&mut words)?;
            let button = match words.next() {
                Some(b) => b.parse().map_err(CommandError::InvalidButton)?,
                None => PointerButton::Primary,
            };
            Command::Click { x, y, button }
        }
        "key" => Command::Key(Key::from_name(word(&mut words, "key", "a key name")?)),
        "bench" | "benchmark" => Command::Benchmark,
        "state" => Command::State,
        "save" => Command::Save,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(head.to_string())),
    };
    Ok(Some(command))
}

fn word<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    what: &'static str,
) -> Result<&'a str, CommandError> {
    words
        .next()
        .ok_or(CommandError::MissingArgument { command, what })
}

fn number<'a, N: std::str::FromStr>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<N, CommandError> {
    let raw = word(words, command, "a number")?;
    raw.parse().map_err(|_| CommandError::InvalidNumber {
        command,
        value: raw.to_string(),
    })
}

/// Pixel positions from a real pointer are always finite.
fn coordinate<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<f64, CommandError> {
    let raw = word(words, "click", "a number")?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CommandError::InvalidNumber {
            command: "click",
            value: raw.to_string(),
        }),
    }
}
