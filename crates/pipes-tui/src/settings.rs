use pipes_core::{PuzzleConfig, SettleMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors from reading or writing the settings file
#[derive(Debug, Clone)]
pub enum SettingsError {
    /// Could not read or write the file
    Io(String),
    /// The file exists but is not valid settings JSON
    Parse(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Settings I/O error: {}", e),
            Self::Parse(e) => write!(f, "Settings parse error: {}", e),
        }
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub const MIN_SIDE: usize = 1;
pub const MAX_WIDTH: usize = 16;
pub const MAX_HEIGHT: usize = 12;
pub const MAX_SOURCES: usize = 8;
pub const MAX_LOCKS: usize = 20;
pub const MAX_TUNNELS: usize = 8;

/// Persisted puzzle settings, stored as JSON under fixed keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "X")]
    pub width: usize,
    #[serde(rename = "Y")]
    pub height: usize,
    #[serde(rename = "Sources")]
    pub sources: usize,
    #[serde(rename = "Locks")]
    pub locks: usize,
    #[serde(rename = "Tunnels")]
    pub tunnels: usize,
    #[serde(rename = "SourceColors")]
    pub source_colors: bool,
    /// One-shot seed for replaying a puzzle, cleared once used
    #[serde(rename = "Seed", skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Where this store lives (not serialized)
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let preset = PuzzleConfig::medium();
        Self {
            width: preset.width,
            height: preset.height,
            sources: preset.sources,
            locks: preset.locks,
            tunnels: preset.tunnels,
            source_colors: preset.distinct_source_colors,
            seed: None,
            path: None,
        }
    }
}

impl Settings {
    /// Default location of the settings file
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pipes_settings.json")
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::default_path();
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self {
                    path: Some(path),
                    ..Self::default()
                }
            }
        }
    }

    /// Load from `path`. A missing file yields defaults bound to `path`.
    pub fn load_from(path: &Path) -> SettingsResult<Self> {
        let mut settings: Self = match fs::read_to_string(path) {
            Ok(json) => {
                serde_json::from_str(&json).map_err(|e| SettingsError::Parse(e.to_string()))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(SettingsError::Io(e.to_string())),
        };
        settings.path = Some(path.to_path_buf());
        settings.clamp();
        Ok(settings)
    }

    /// Write back to the file this store was loaded from
    pub fn save(&self) -> SettingsResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SettingsError::Parse(e.to_string()))?;
        fs::write(path, json).map_err(|e| SettingsError::Io(e.to_string()))
    }

    /// Copy the shape of a preset, keeping the stored seed
    pub fn apply_preset(&mut self, preset: &PuzzleConfig) {
        self.width = preset.width;
        self.height = preset.height;
        self.sources = preset.sources;
        self.locks = preset.locks;
        self.tunnels = preset.tunnels;
        self.source_colors = preset.distinct_source_colors;
        self.clamp();
    }

    /// Keep every value inside the ranges the menu offers
    pub fn clamp(&mut self) {
        self.width = self.width.clamp(MIN_SIDE, MAX_WIDTH);
        self.height = self.height.clamp(MIN_SIDE, MAX_HEIGHT);
        self.sources = self.sources.clamp(1, MAX_SOURCES);
        self.locks = self.locks.min(MAX_LOCKS);
        self.tunnels = self.tunnels.min(MAX_TUNNELS);
    }

    /// Take the one-shot seed, clearing it from the store
    pub fn take_seed(&mut self) -> Option<u64> {
        self.seed.take()
    }

    /// Build a generation config, consuming the one-shot seed
    pub fn to_config(&mut self, tuning: &GenerationTuning) -> PuzzleConfig {
        let cells = self.width * self.height;
        PuzzleConfig {
            width: self.width,
            height: self.height,
            sources: self.sources,
            locks: self.locks,
            tunnels: self.tunnels,
            distinct_source_colors: self.source_colors,
            connections_to_remove: tuning.connections_to_remove.unwrap_or(cells * 2),
            remove_attempts: tuning.remove_attempts,
            seed: self.take_seed(),
            settle: tuning.settle,
        }
    }
}

/// Generation knobs that come from the command line only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTuning {
    /// Fixed removal target; defaults to twice the cell count
    pub connections_to_remove: Option<usize>,
    pub remove_attempts: usize,
    pub settle: SettleMode,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            connections_to_remove: None,
            remove_attempts: 100,
            settle: SettleMode::Deferred,
        }
    }
}
