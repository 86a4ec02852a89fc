use std::path::PathBuf;

/// Failures surfaced by the selection/history pipeline.
///
/// I/O and parse failures are fatal and propagate to the caller; nothing is
/// retried here. The typed variants exist so callers can tell "nothing left to
/// study" and bad user input apart from genuine breakage.
#[derive(Debug, thiserror::Error)]
pub enum RouletteError {
    #[error("unknown sheet type: '{0}'")]
    UnknownSheetType(String),

    #[error("invalid sheet selection: {0}")]
    InvalidSelection(String),

    #[error("no unsolved items left in sheet '{sheet}'")]
    SheetExhausted { sheet: String },

    #[error("gave up after {attempts} draws on sheet '{sheet}', every pick was already solved")]
    DrawsExhausted { sheet: String, attempts: usize },

    #[error("no JSON files found in pool directory {dir}")]
    EmptyPool { dir: PathBuf },

    #[error("sheet '{sheet}' has an unexpected data shape")]
    Shape {
        sheet: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read or write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
