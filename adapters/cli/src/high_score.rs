//! Best score persisted between runs as a single decimal number.

use std::{
    env,
    ffi::OsString,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::warn;

const APP_DIR: &str = "dungeon-raid";
const FILENAME: &str = "high_score";

/// Location of the high-score file.
#[derive(Clone, Debug)]
pub(crate) struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    /// Uses an explicit file path.
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$XDG_CONFIG_HOME/dungeon-raid/high_score`, else `~/.config/...`, else the working directory.
    pub(crate) fn default_location() -> Self {
        let base = config_base(env::var_os("XDG_CONFIG_HOME"), env::var_os("HOME"));
        Self::new(base.join(APP_DIR).join(FILENAME))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored score; a missing or unreadable file counts as zero.
    pub(crate) fn load(&self) -> u32 {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return 0;
        };
        match contents.trim().parse() {
            Ok(score) => score,
            Err(error) => {
                warn!(%error, path = %self.path.display(), "ignoring corrupt high score file");
                0
            }
        }
    }

    /// Overwrites the stored score, creating parent directories as needed.
    pub(crate) fn save(&self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut file = fs::File::create(&self.path)
            .with_context(|| format!("failed to create {}", self.path.display()))?;
        writeln!(file, "{score}")
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Config directory from `XDG_CONFIG_HOME`, treating an empty value as unset.
fn config_base(xdg_config_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    xdg_config_home
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
}
