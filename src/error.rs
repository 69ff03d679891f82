use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the terminal runtime and its supporting files.
///
/// Game outcomes (a wrong click, an empty points field) are not errors and
/// never show up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not write config to {}: {}", .path.display(), .source)]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode config: {0}")]
    ConfigEncode(#[from] serde_json::Error),

    #[error("no writable state directory for the log file")]
    NoStateDir,

    #[error("could not install log subscriber: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;
