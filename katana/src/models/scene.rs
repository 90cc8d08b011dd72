use crate::KatanaError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix marking the staged copy as hidden next to the working file.
pub const STAGE_MARKER: char = '.';

/// Frozen copy of the working scene used as the render source, so later edits
/// to the live file don't leak into a render already in flight.
/// Staged copies are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedScene {
    source: PathBuf,
    staged: PathBuf,
}

impl StagedScene {
    /// `/proj/shots/shot010.katana` stages to `/proj/shots/.shot010.katana`.
    pub fn staged_path(source: &Path) -> Option<PathBuf> {
        let file_name = source.file_name()?.to_str()?;
        let dir = source.parent().unwrap_or_else(|| Path::new(""));
        Some(dir.join(format!("{STAGE_MARKER}{file_name}")))
    }

    /// Copy the working file to its staged path, overwriting any previous copy.
    pub fn create(source: impl AsRef<Path>) -> Result<Self, KatanaError> {
        let source = source.as_ref().to_path_buf();
        let staged = Self::staged_path(&source).ok_or_else(|| KatanaError::FileSystem {
            path: source.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "scene path has no file name",
            ),
        })?;

        if let Some(dir) = staged.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| KatanaError::FileSystem {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        fs::copy(&source, &staged).map_err(|e| KatanaError::FileSystem {
            path: staged.clone(),
            source: e,
        })?;
        debug!(source = %source.display(), staged = %staged.display(), "Staged scene file");

        Ok(Self { source, staged })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn staged(&self) -> &Path {
        &self.staged
    }
}

/// Scene file name up to its first dot: `shot010.v003.katana` -> `shot010`.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_owned))
        .unwrap_or_default()
}
