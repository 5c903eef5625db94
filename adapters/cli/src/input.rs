//! Text commands typed at the prompt.
//!
//! Cells are written as a column letter followed by a one-based row, so `a1`
//! is the top-left tile. Skill slots and draft choices are one-based too.

use anyhow::{bail, Context, Result};
use dungeon_raid_core::CellCoord;

/// Usage shown by `help`.
pub(crate) const HELP: &str = "\
commands:
  select a1 b1 c1   chain the listed cells in order (alias: s)
  skill N           activate skill slot N (alias: k)
  choose N          take upgrade N from the current draft (alias: c)
  show              redraw the board
  restart           start a new run (alias: r)
  help              show this text (alias: ?)
  quit              leave the game (alias: q)";

/// Action requested by one line of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Select(Vec<CellCoord>),
    Skill(usize),
    Choose(usize),
    Show,
    Help,
    Restart,
    Quit,
}

/// Parses a line of input; an empty line redraws the board.
pub(crate) fn parse_action(line: &str) -> Result<Action> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Action::Show);
    };
    let arguments: Vec<&str> = words.collect();

    let action = match verb.to_ascii_lowercase().as_str() {
        "select" | "s" => {
            if arguments.is_empty() {
                bail!("select needs at least one cell, e.g. `select a1 b1 c1`");
            }
            let cells = arguments
                .iter()
                .map(|token| parse_cell(token))
                .collect::<Result<Vec<_>>>()?;
            Action::Select(cells)
        }
        "skill" | "k" => Action::Skill(parse_index(verb, &arguments)?),
        "choose" | "c" => Action::Choose(parse_index(verb, &arguments)?),
        "show" => Action::Show,
        "help" | "?" => Action::Help,
        "restart" | "r" => Action::Restart,
        "quit" | "q" | "exit" => Action::Quit,
        other => bail!("unknown command `{other}`; type `help` for a list"),
    };
    Ok(action)
}

/// Parses `b3` into column 1, row 2.
pub(crate) fn parse_cell(token: &str) -> Result<CellCoord> {
    let mut chars = token.chars();
    let letter = chars
        .next()
        .filter(char::is_ascii_alphabetic)
        .with_context(|| format!("`{token}` is not a cell; expected a letter then a row"))?;
    let row: u32 = chars
        .as_str()
        .parse()
        .with_context(|| format!("`{token}` has no valid row number"))?;
    if row == 0 {
        bail!("rows start at 1 in `{token}`");
    }
    let column = u32::from(letter.to_ascii_lowercase()) - u32::from('a');
    Ok(CellCoord::new(column, row - 1))
}

/// Formats a cell the way [`parse_cell`] reads it.
pub(crate) fn cell_label(cell: CellCoord) -> String {
    let letter = char::from_u32(u32::from('a') + cell.column()).unwrap_or('?');
    format!("{letter}{}", cell.row() + 1)
}

/// Reads a single one-based index argument and converts it to zero-based.
fn parse_index(verb: &str, arguments: &[&str]) -> Result<usize> {
    let [argument] = arguments else {
        bail!("{verb} takes exactly one number");
    };
    let index: usize = argument
        .parse()
        .with_context(|| format!("`{argument}` is not a number"))?;
    index
        .checked_sub(1)
        .with_context(|| format!("{verb} numbers start at 1"))
}
