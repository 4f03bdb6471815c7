//! Game tunables.
//!
//! Every value has a default matching the classic arcade feel (800×600 canvas,
//! 60 Hz tick, a shot every 100 ms while fire is held, an enemy every 2 s).
//! A TOML file may override any subset of them.

use std::path::Path;

use serde::Deserialize;

/// Highest accepted simulation rate.
pub const MAX_TICK_HZ: u32 = 1000;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value that would make the game unplayable
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Size and per-tick speed of a player projectile.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            width: 5.0,
            height: 10.0,
            speed: 7.0,
        }
    }
}

/// Size and per-tick speed of a descending enemy.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
            speed: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Gap between the player's bottom edge and the canvas bottom.
    pub bottom_margin: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
            speed: 5.0,
            bottom_margin: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Fixed simulation rate.
    pub tick_hz: u32,
    /// How often the held fire flag is polled.
    pub fire_period_ms: u64,
    /// How often an enemy is spawned.
    pub spawn_period_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            fire_period_ms: 100,
            spawn_period_ms: 2000,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas: CanvasConfig,
    pub player: PlayerConfig,
    pub bullet: BulletConfig,
    pub enemy: EnemyConfig,
    pub timing: TimingConfig,
}

impl GameConfig {
    /// Load configuration from a TOML file.  Missing keys keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&contents)?;
        log::info!("Loaded configuration from {:?}", path.as_ref());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f32); 11] = [
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("player.speed", self.player.speed),
            ("bullet.width", self.bullet.width),
            ("bullet.height", self.bullet.height),
            ("bullet.speed", self.bullet.speed),
            ("enemy.width", self.enemy.width),
            ("enemy.height", self.enemy.height),
            ("enemy.speed", self.enemy.speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        if self.player.bottom_margin < 0.0 {
            return Err(ConfigError::Invalid {
                field: "player.bottom_margin",
                reason: "must not be negative".into(),
            });
        }
        if self.player.width > self.canvas.width
            || self.player.height + self.player.bottom_margin > self.canvas.height
        {
            return Err(ConfigError::Invalid {
                field: "player",
                reason: "does not fit on the canvas".into(),
            });
        }
        if self.enemy.width > self.canvas.width {
            return Err(ConfigError::Invalid {
                field: "enemy.width",
                reason: "wider than the canvas".into(),
            });
        }

        let timing: [(&'static str, u64); 3] = [
            ("timing.tick_hz", u64::from(self.timing.tick_hz)),
            ("timing.fire_period_ms", self.timing.fire_period_ms),
            ("timing.spawn_period_ms", self.timing.spawn_period_ms),
        ];
        for (field, value) in timing {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".into(),
                });
            }
        }
        if self.timing.tick_hz > MAX_TICK_HZ {
            return Err(ConfigError::Invalid {
                field: "timing.tick_hz",
                reason: format!("must be at most {MAX_TICK_HZ}, got {}", self.timing.tick_hz),
            });
        }
        Ok(())
    }
}
