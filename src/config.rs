//! User configuration, stored as JSON in the platform config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    batch::{DEFAULT_CAPACITY, MAX_CAPACITY},
    state::{
        DEFAULT_BACKGROUND, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MENU_ANIMATION_STEP,
        SlideMode, UiState,
    },
};

pub const CONFIG_DIR_NAME: &str = "slidemenu";
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No configuration directory on this platform")]
    NoConfigDir,
}

/// Startup settings. Missing fields take their default value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub window_width: i32,
    pub window_height: i32,
    pub frame_delay_ms: u64,
    pub batch_capacity: usize,
    pub animation_step: f32,
    pub slide_mode: SlideMode,
    pub background: [u8; 3],
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Slide Menu".to_string(),
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            frame_delay_ms: 16,
            batch_capacity: DEFAULT_CAPACITY,
            animation_step: MENU_ANIMATION_STEP,
            slide_mode: SlideMode::Slide,
            background: DEFAULT_BACKGROUND,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// The default location of the configuration file.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Loads the configuration from [`Config::default_path`], falling back to
    /// the defaults if the file is missing or invalid.
    pub fn load_or_default() -> Self {
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(e) => {
                log::warn!("{e}, using default configuration");
                return Self::default();
            }
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Could not load {}: {e}, using default configuration", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Brings out-of-range values back into range.
    pub fn validated(mut self) -> Self {
        if !(self.animation_step.is_finite() && self.animation_step > 0.0) {
            self.animation_step = MENU_ANIMATION_STEP;
        }
        self.animation_step = self.animation_step.min(1.0);
        if self.batch_capacity > MAX_CAPACITY {
            log::warn!("batch_capacity {} lowered to {MAX_CAPACITY}", self.batch_capacity);
            self.batch_capacity = MAX_CAPACITY;
        }
        self.window_width = self.window_width.max(1);
        self.window_height = self.window_height.max(1);
        self
    }

    /// Builds the initial UI state described by this configuration.
    pub fn ui_state(&self) -> UiState {
        UiState::new(self.window_width, self.window_height)
            .with_animation_step(self.animation_step)
            .with_slide_mode(self.slide_mode)
            .with_background(self.background)
    }

    /// The configured log level, or `Info` when it does not parse.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
