//! Configuration file loading.
//!
//! Destinations and allowed formats live in a TOML file rather than on the
//! command line, since they rarely change between runs:
//!
//! ```toml
//! [photos]
//! destination = "/mnt/archive/photos"
//! formats = ["jpg", "arw"]
//!
//! [video]
//! destination = "/mnt/archive/video"
//! formats = ["mp4", "mov"]
//! ```
//!
//! The default location is `~/.sdingest.toml`; `--config` overrides it.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = ".sdingest.toml";

/// Per-kind settings: where the dated directories go and which extensions
/// the source scan should keep.
#[derive(Debug, Deserialize)]
pub struct KindConfig {
    pub destination: PathBuf,
    #[serde(default)]
    pub formats: Vec<String>,
}

/// The whole configuration file.
#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub photos: KindConfig,
    pub video: KindConfig,
}

impl ConfigFile {
    /// Load and parse a configuration file.
    pub fn load(path: &Path) -> Result<ConfigFile, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Can't read config {}: {}", path.display(), e))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Can't parse config {}: {}", path.display(), e))
    }

    /// The default config location: `~/.sdingest.toml`.
    pub fn default_path() -> Result<PathBuf, String> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_CONFIG_NAME))
            .ok_or_else(|| "Can't determine home directory for config lookup".to_string())
    }

    /// Both kinds' format lists, lowercased and merged into the single
    /// allow-list the filter stage consumes.
    pub fn include_formats(&self) -> Vec<String> {
        self.photos
            .formats
            .iter()
            .chain(self.video.formats.iter())
            .map(|ext| ext.to_lowercase())
            .collect()
    }
}
