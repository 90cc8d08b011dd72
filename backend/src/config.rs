use crate::models::publish::RENDERED_IMAGE;
use katana::katana::Launcher;
use katana::models::toolchain::ToolchainConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

const SETTINGS_PATH: &str = "KatanaOutput/";
const SETTINGS_FILE_NAME: &str = "Settings.json";

/// Environment variable holding the tracking script key. Never written to disk.
pub const SCRIPT_KEY_VAR: &str = "SHOTGRID_SCRIPT_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmSettings {
    /// Engine the jobs are spooled to.
    pub host: String,
    pub port: u16,
}

impl Default for FarmSettings {
    fn default() -> Self {
        Self {
            host: "10.0.0.80".to_owned(),
            port: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishSettings {
    /// Only render nodes whose name contains this get published. Case sensitive.
    pub marker: String,
    pub file_type: String,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            marker: "bty".to_owned(),
            file_type: RENDERED_IMAGE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSettings {
    /// e.g. `https://studio.shotgrid.autodesk.com`
    pub site: Option<String>,
    pub script_name: Option<String>,
    pub project_id: Option<i64>,
    /// Login of the submitting artist, defaults to the OS account name.
    pub login: Option<String>,
}

/// User configurable settings, stored as json in the user's config directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub farm: FarmSettings,
    pub launcher: Launcher,
    pub toolchains: ToolchainConfig,
    pub publish: PublishSettings,
    pub tracking: TrackingSettings,
}

impl Settings {
    fn get_config_path() -> io::Result<PathBuf> {
        let path = dirs::config_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Unable to find config dir!"))?
            .join(SETTINGS_PATH);
        fs::create_dir_all(&path)?;
        Ok(path.join(SETTINGS_FILE_NAME))
    }

    pub fn save(&self) -> io::Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    fn save_to(&self, path: &Path) -> io::Result<()> {
        let data = serde_json::to_string_pretty(&self).map_err(io::Error::other)?;
        fs::write(path, data)
    }

    /// Load the settings file, or write out the defaults when there is none.
    pub fn load() -> io::Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// An existing file is never overwritten, even when it cannot be read or parsed.
    fn load_from(path: &Path) -> io::Result<Self> {
        match fs::read_to_string(path) {
            Ok(data) => Ok(Self::from_json(&data).unwrap_or_else(|e| {
                warn!(path = %path.display(), "Unable to parse settings, using defaults: {e}");
                Self::default()
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save_to(path)?;
                info!(path = %path.display(), "Created default settings");
                Ok(settings)
            }
            Err(e) => {
                warn!(path = %path.display(), "Unable to read settings, using defaults: {e}");
                Ok(Self::default())
            }
        }
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}
