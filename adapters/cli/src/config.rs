//! Balance loading from TOML with command-line overrides.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use dungeon_raid_core::Balance;

/// Builds the balance for a run: defaults, then the optional file, then overrides.
pub(crate) fn resolve_balance(
    path: Option<&Path>,
    columns: Option<u32>,
    rows: Option<u32>,
) -> Result<Balance> {
    let mut balance = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read balance file {}", path.display()))?;
            parse_balance(&contents)
                .with_context(|| format!("invalid balance file {}", path.display()))?
        }
        None => Balance::default(),
    };

    if let Some(columns) = columns {
        balance.columns = columns;
    }
    if let Some(rows) = rows {
        balance.rows = rows;
    }

    balance.validate().context("balance rejected")?;
    Ok(balance)
}

/// Parses a TOML document; missing keys keep their default values.
fn parse_balance(contents: &str) -> Result<Balance> {
    toml::from_str(contents).context("failed to parse balance TOML")
}
