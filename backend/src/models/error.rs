use crate::domains::{farm_client::FarmError, tracking_client::TrackingError};
use katana::KatanaError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a render or submission. Nothing is retried.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Frame range is not valid: {0}")]
    Parse(String),
    #[error("Render node {node} does not declare a {name:?} output")]
    LookupExhausted { node: String, name: String },
    #[error("No version token found in {0:?}")]
    PatternNotFound(String),
    #[error("Unable to stage scene file {path:?}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Farm client error: {0}")]
    Farm(#[from] FarmError),
    #[error("Tracking client error: {0}")]
    Tracking(#[from] TrackingError),
    #[error("Unable to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<KatanaError> for OutputError {
    fn from(err: KatanaError) -> Self {
        match err {
            KatanaError::Parse(value) => OutputError::Parse(format!("{value:?} is not an integer")),
            KatanaError::InvalidRange { start, end } => {
                OutputError::Parse(format!("start {start} is after end {end}"))
            }
            KatanaError::PatternNotFound(name) => OutputError::PatternNotFound(name),
            KatanaError::LookupExhausted { node, name } => {
                OutputError::LookupExhausted { node, name }
            }
            KatanaError::FileSystem { path, source } => OutputError::FileSystem { path, source },
            KatanaError::Spawn { program, source } => OutputError::Launch { program, source },
        }
    }
}
