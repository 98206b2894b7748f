//! Tunable game settings.
//!
//! Every field has a default matching the classic 15x15 layout, so a config
//! file only needs to name what it changes:
//!
//! ```
//! use games::config::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "rows": 21, "cols": 31, "seed": 7 }"#).unwrap();
//! assert_eq!(config.item_count, 5);
//! assert_eq!(config.seed, Some(7));
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::maze::map::Dimensions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    // pixels; light distances are measured in this space
    pub cell_size: f32,
    pub light_radius: f32,
    pub tick_rate: u32,
    pub item_count: usize,
    pub item_reward: u32,
    pub exit_bonus: u32,
    pub effect_duration: f32,
    pub seed: Option<u64>,
}

impl GameConfig {
    pub const DEFAULT_ROWS: usize = 15;
    pub const DEFAULT_COLS: usize = 15;
    pub const DEFAULT_CELL_SIZE: f32 = 40.0;
    pub const DEFAULT_LIGHT_RADIUS: f32 = 120.0;
    pub const DEFAULT_TICK_RATE: u32 = 15;
    pub const DEFAULT_ITEM_COUNT: usize = 5;
    pub const DEFAULT_ITEM_REWARD: u32 = 10;
    pub const DEFAULT_EXIT_BONUS: u32 = 50;
    pub const DEFAULT_EFFECT_DURATION: f32 = 1.0;

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn dimensions(&self) -> Result<Dimensions> {
        Dimensions::new(self.rows, self.cols)
    }

    pub fn tick_interval(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Checks every setting, including that `item_count` fits in a maze of the
    /// configured size, so that nothing fails once the game is running.
    pub fn validate(&self) -> Result<Dimensions> {
        let dims = self.dimensions()?;

        positive("cell_size", self.cell_size)?;
        positive("light_radius", self.light_radius)?;
        if self.tick_rate == 0 {
            return Err(GameError::InvalidSetting {
                name: "tick_rate",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.effect_duration.is_finite() || self.effect_duration < 0.0 {
            return Err(GameError::InvalidSetting {
                name: "effect_duration",
                reason: format!("must be a non-negative number, got {}", self.effect_duration),
            });
        }

        let available = dims.item_capacity();
        if self.item_count > available {
            return Err(GameError::NotEnoughRoom {
                requested: self.item_count,
                available,
            });
        }
        Ok(dims)
    }
}

fn positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidSetting {
            name,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: Self::DEFAULT_ROWS,
            cols: Self::DEFAULT_COLS,
            cell_size: Self::DEFAULT_CELL_SIZE,
            light_radius: Self::DEFAULT_LIGHT_RADIUS,
            tick_rate: Self::DEFAULT_TICK_RATE,
            item_count: Self::DEFAULT_ITEM_COUNT,
            item_reward: Self::DEFAULT_ITEM_REWARD,
            exit_bonus: Self::DEFAULT_EXIT_BONUS,
            effect_duration: Self::DEFAULT_EFFECT_DURATION,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let dims = GameConfig::default().validate().unwrap();
        assert_eq!((dims.rows(), dims.cols()), (15, 15));
    }

    #[test]
    fn even_dimensions_rejected() {
        let config = GameConfig {
            rows: 16,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidDimensions { rows: 16, cols: 15 })
        ));
    }

    #[test]
    fn huge_dimensions_rejected_before_allocating() {
        let config = GameConfig::from_json_str(r#"{ "rows": 999999999, "cols": 999999999 }"#)
            .unwrap();
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn effective_config_dumps_as_json() {
        let config = GameConfig::default().with_seed(12);
        let json = config.to_json().unwrap();
        assert!(json.contains("\"seed\":12"));
        assert_eq!(GameConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn too_many_items_rejected_up_front() {
        let config = GameConfig {
            rows: 5,
            cols: 5,
            item_count: 8,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::NotEnoughRoom {
                requested: 8,
                available: 7
            })
        ));
    }

    #[test]
    fn bad_numbers_rejected() {
        for config in [
            GameConfig {
                light_radius: 0.0,
                ..GameConfig::default()
            },
            GameConfig {
                cell_size: f32::NAN,
                ..GameConfig::default()
            },
            GameConfig {
                tick_rate: 0,
                ..GameConfig::default()
            },
            GameConfig {
                effect_duration: -1.0,
                ..GameConfig::default()
            },
        ] {
            assert!(matches!(
                config.validate(),
                Err(GameError::InvalidSetting { .. })
            ));
        }
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = GameConfig::from_json_str(r#"{ "colums": 9 }"#).unwrap_err();
        assert!(matches!(err, GameError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, GameError::Io(_)));
    }
}
