//! Configuration loading and typed config structures for colony management.
//!
//! The canonical configuration lives in `colony-config.yaml`. Every field
//! has a default, so an empty file (or no file at all) yields a working
//! configuration.

use std::num::NonZeroU32;
use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ColonyConfig {
    /// Colony founding and capacity.
    #[serde(default)]
    pub colony: ColonySettings,

    /// Automation area scheduling.
    #[serde(default)]
    pub areas: AreasConfig,

    /// Client-side prediction and rendering hooks.
    #[serde(default)]
    pub client: ClientConfig,

    /// Profession rules needed by the request handlers.
    #[serde(default)]
    pub professions: ProfessionsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Headless engine loop settings.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl ColonyConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Colony founding and capacity settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColonySettings {
    /// Colonists spawned when the center is first placed.
    #[serde(default = "default_initial_colonists")]
    pub initial_colonists: u32,

    /// Spawn sampling radius around the center, in blocks.
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: i32,

    /// Registered agent kind used for colonists.
    #[serde(default = "default_colonist_kind")]
    pub colonist_kind: String,

    /// Population capacity before any housing is built.
    #[serde(default = "default_max_population")]
    pub max_population: i32,

    /// Side of the colony border square, in blocks.
    #[serde(default = "default_border_size")]
    pub border_size: NonZeroU32,
}

impl Default for ColonySettings {
    fn default() -> Self {
        Self {
            initial_colonists: default_initial_colonists(),
            spawn_radius: default_spawn_radius(),
            colonist_kind: default_colonist_kind(),
            max_population: default_max_population(),
            border_size: default_border_size(),
        }
    }
}

/// Automation area scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AreasConfig {
    /// Ticks per scheduling quantum; one area is refreshed per quantum.
    #[serde(default = "default_refresh_interval_ticks")]
    pub refresh_interval_ticks: NonZeroU32,
}

impl Default for AreasConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ticks: default_refresh_interval_ticks(),
        }
    }
}

/// Client-side prediction and rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Maximum cells scanned vertically when predicting the center.
    #[serde(default = "default_max_scan_height")]
    pub max_scan_height: u32,

    /// Half-size of the region re-rendered around a new candidate center.
    #[serde(default = "default_render_margin")]
    pub render_margin: i32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_scan_height: default_max_scan_height(),
            render_margin: default_render_margin(),
        }
    }
}

/// Profession rules needed by the request handlers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfessionsConfig {
    /// Professions that are hired through a hire screen rather than
    /// assigned directly.
    #[serde(default = "default_hireable")]
    pub hireable: Vec<String>,
}

impl Default for ProfessionsConfig {
    fn default() -> Self {
        Self {
            hireable: default_hireable(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Headless engine loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Ticks to run before persisting and exiting (0 = unlimited).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Where the session record is written on shutdown and read on start.
    #[serde(default = "default_save_path")]
    pub save_path: String,

    /// World seed for spawn sampling.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Surface level of the flat world.
    #[serde(default = "default_ground_level")]
    pub ground_level: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: default_max_ticks(),
            save_path: default_save_path(),
            seed: default_seed(),
            ground_level: default_ground_level(),
        }
    }
}

const fn default_initial_colonists() -> u32 {
    5
}

const fn default_spawn_radius() -> i32 {
    3
}

fn default_colonist_kind() -> String {
    String::from("colonist")
}

const fn default_max_population() -> i32 {
    10
}

const fn default_border_size() -> NonZeroU32 {
    colony_world::DEFAULT_BORDER_SIZE
}

const fn default_refresh_interval_ticks() -> NonZeroU32 {
    match NonZeroU32::new(20) {
        Some(ticks) => ticks,
        None => NonZeroU32::MIN,
    }
}

const fn default_max_scan_height() -> u32 {
    384
}

const fn default_render_margin() -> i32 {
    2
}

fn default_hireable() -> Vec<String> {
    vec![
        String::from("warrior1"),
        String::from("archer1"),
        String::from("miner1"),
        String::from("lumberjack1"),
    ]
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_tick_interval_ms() -> u64 {
    50
}

const fn default_max_ticks() -> u64 {
    200
}

fn default_save_path() -> String {
    String::from("colony-save.json")
}

const fn default_seed() -> u64 {
    42
}

const fn default_ground_level() -> i32 {
    64
}
