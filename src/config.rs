//! Tunable game configuration, loaded from TOML.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides.  A missing file is not an error: `load_or_default` falls back
//! to `GameConfig::default()`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Env var naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SIDE_SHOOTER_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "side_shooter.toml";

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed fine but makes no sense for the game
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Size of the simulated playfield, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Gameplay tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Player movement speed (units per second)
    pub player_speed: f32,
    /// Minimum time between two player shots (ms)
    pub shot_cooldown_ms: f64,
    /// How long the pointer must be held before it acts as continuous fire (ms)
    pub fire_hold_ms: f64,
    /// Vertical positions the boss fires from; one is picked per shot
    pub boss_fire_bands: Vec<f32>,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            player_speed: 300.0,
            shot_cooldown_ms: 200.0,
            fire_hold_ms: 500.0,
            boss_fire_bands: vec![15.0, 150.0, 350.0],
        }
    }
}

/// Terminal front-end settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Target frame duration (ms)
    pub frame_ms: u64,
    /// A key counts as held if its last press/repeat arrived within this window (ms)
    pub key_hold_ms: u64,
    /// Where log output goes while the terminal is in raw mode
    pub log_file: PathBuf,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            key_hold_ms: 130,
            log_file: PathBuf::from("side_shooter.log"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas: Canvas,
    pub gameplay: GameplayConfig,
    pub frontend: FrontendConfig,
}

impl GameConfig {
    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Resolve the config location (env var, then working directory) and load it.
    ///
    /// Returns the defaults when no file is found.  An explicitly named file
    /// that does not exist is still an error.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            log::info!("loading config from ${} = {}", CONFIG_ENV_VAR, path);
            return Self::load_from_file(path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            log::info!("loading config from {}", local.display());
            return Self::load_from_file(local);
        }
        log::info!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("canvas.width", self.canvas.width)?;
        positive("canvas.height", self.canvas.height)?;
        positive("gameplay.player_speed", self.gameplay.player_speed)?;
        if self.gameplay.shot_cooldown_ms < 0.0 {
            return Err(ConfigError::Invalid {
                field: "gameplay.shot_cooldown_ms",
                reason: "must not be negative".to_string(),
            });
        }
        if self.gameplay.boss_fire_bands.is_empty() {
            return Err(ConfigError::Invalid {
                field: "gameplay.boss_fire_bands",
                reason: "needs at least one band".to_string(),
            });
        }
        if self.frontend.frame_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "frontend.frame_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a positive number, got {}", value),
        })
    }
}
