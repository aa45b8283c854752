//! Application configuration
//!
//! Looked up in order: the file named by `ORRERY_CONFIG`, then
//! `orrery.json` in the platform config directory, then built-in defaults.
//! - macOS: ~/Library/Application Support/orrery/
//! - Linux: ~/.config/orrery/
//! - Windows: %APPDATA%\orrery\config\

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::bodies::{PhaseSource, SystemConfig, defaults};
use crate::camera::CameraSettings;

pub const CONFIG_ENV_VAR: &str = "ORRERY_CONFIG";
const CONFIG_FILE_NAME: &str = "orrery.json";
const DEFAULT_STARFIELD: &str = "textures/stars.jpg";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrreryConfig {
    pub window_title: String,
    pub camera: CameraSettings,
    /// Starfield images relative to the asset folder: six cube faces, or a
    /// single image (six faces stacked vertically, or a plain picture used
    /// on every face). Empty disables the starfield.
    pub starfield: Vec<String>,
    /// Seed for initial orbit phases; random when absent
    pub phase_seed: Option<u64>,
    /// Explicit initial phases handed out in body order; wins over the seed
    pub phases: Option<Vec<f32>>,
    pub system: SystemConfig,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            window_title: "Orrery".to_string(),
            camera: CameraSettings::default(),
            starfield: vec![DEFAULT_STARFIELD.to_string(); 6],
            phase_seed: None,
            phases: None,
            system: defaults::solar_system(),
        }
    }
}

impl OrreryConfig {
    /// Defaults with reproducible phases
    pub fn deterministic(seed: u64) -> Self {
        Self {
            phase_seed: Some(seed),
            ..Self::default()
        }
    }

    /// Resolve and load the active configuration
    ///
    /// Returns the config plus the file it came from, if any.
    pub fn load() -> anyhow::Result<(Self, Option<PathBuf>)> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            let config = Self::from_path(&path)?;
            return Ok((config, Some(path)));
        }

        if let Some(path) = default_config_path()
            && path.exists()
        {
            let config = Self::from_path(&path)?;
            return Ok((config, Some(path)));
        }

        Ok((Self::default(), None))
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Phase generator matching this configuration
    pub fn phase_source(&self) -> PhaseSource {
        match (&self.phases, self.phase_seed) {
            (Some(phases), _) => PhaseSource::fixed(phases.clone()),
            (None, Some(seed)) => PhaseSource::seeded(seed),
            (None, None) => PhaseSource::from_entropy(),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orrery").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
