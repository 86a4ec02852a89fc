use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::RouletteError;

/// Ordered list of solved item ids for one sheet, persisted as
/// `{"solved_ids": [...]}`.
///
/// Append-only during normal operation; the only removal path is
/// [`demote_last`](History::demote_last), used when an item is sent back for
/// revision. Saves replace the whole file atomically so a crash can never
/// leave a half-written history behind.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    solved_ids: Vec<String>,
}

impl History {
    /// Load a sheet's history. A missing or empty file means nothing has been
    /// solved yet; malformed JSON is an error.
    pub fn load(path: &Path) -> Result<Self, RouletteError> {
        if !path.exists() {
            log::warn!(
                "history file {} not found, starting with empty history",
                path.display()
            );
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| RouletteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            log::warn!("history file {} is empty", path.display());
            return Ok(Self::default());
        }
        serde_json::from_str(&content).map_err(|source| RouletteError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.solved_ids.iter().any(|solved| solved == id)
    }

    pub fn push(&mut self, id: String) {
        self.solved_ids.push(id);
    }

    /// Remove and return the most recently appended id.
    pub fn demote_last(&mut self) -> Option<String> {
        self.solved_ids.pop()
    }

    pub fn len(&self) -> usize {
        self.solved_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solved_ids.is_empty()
    }

    /// Write the history back, replacing the file in one atomic rename.
    pub fn save(&self, path: &Path) -> Result<(), RouletteError> {
        let io_err = |source| RouletteError::Io {
            path: path.to_path_buf(),
            source,
        };
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(io_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
        let json = serde_json::to_string_pretty(self).map_err(|source| RouletteError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        log::info!("history saved to {}", path.display());
        Ok(())
    }
}

/// Append one id to the sheet's plain-text revision log, one id per line.
pub fn append_revision(path: &Path, id: &str) -> Result<(), RouletteError> {
    let io_err = |source| RouletteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(io_err)?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    writeln!(file, "{id}").map_err(io_err)?;
    Ok(())
}
