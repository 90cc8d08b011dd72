use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KatanaError {
    #[error("Frame value is not an integer: {0:?}")]
    Parse(String),
    #[error("Start frame {start} is after end frame {end}")]
    InvalidRange { start: i32, end: i32 },
    #[error("No version token (v<digits>) found in {0:?}")]
    PatternNotFound(String),
    #[error("Render node {node} does not declare a {name:?} output")]
    LookupExhausted { node: String, name: String },
    #[error("File system error on {path:?}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
