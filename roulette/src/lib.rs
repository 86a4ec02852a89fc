//! Study-practice randomizer: picks a random unsolved item from a named sheet,
//! prints a search link for it, and records it as solved.
//!
//! Each sheet keeps its raw data in an idiosyncratic nested JSON shape; a
//! [`SheetHandler`](sheets::SheetHandler) knows how to flatten that shape into a
//! uniform candidate list. The shared [`process`](process::process) workflow
//! then filters out previously-solved items, draws one at random, and appends
//! the draw to the sheet's history file.
//!
//! Designed for one invocation at a time: history files carry no lock, so
//! concurrent runs against the same root directory race.

pub mod errors;
pub mod factory;
pub mod history;
pub mod item;
pub mod process;
pub mod sheets;

use std::path::{Path, PathBuf};

pub use errors::RouletteError;
pub use factory::{SheetKind, resolve_selection};
pub use history::History;
pub use item::{Difficulty, Item};
pub use process::{ProcessOptions, Selection, mark_revision, process, search_link};
pub use sheets::{SheetConfig, SheetHandler};

/// Locations of the per-sheet files under a common root directory.
///
/// Layout matches the on-disk convention: `data/<key>.json` for raw sheet
/// data, `history/<key>.json` for solved ids, `revision/<key>.txt` for the
/// revision log, and one directory per external problem pool.
#[derive(Debug, Clone)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn data_file(&self, file_key: &str) -> PathBuf {
        self.root.join("data").join(format!("{file_key}.json"))
    }

    pub fn history_file(&self, file_key: &str) -> PathBuf {
        self.root.join("history").join(format!("{file_key}.json"))
    }

    pub fn revision_file(&self, file_key: &str) -> PathBuf {
        self.root.join("revision").join(format!("{file_key}.txt"))
    }

    pub fn pool_dir(&self, dir_name: &str) -> PathBuf {
        self.root.join(dir_name)
    }
}

pub(crate) fn read_json(path: &Path) -> Result<serde_json::Value, RouletteError> {
    let content = std::fs::read_to_string(path).map_err(|source| RouletteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| RouletteError::Json {
        path: path.to_path_buf(),
        source,
    })
}
