use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    grid::MAX_TILE,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Side length of the square grid.
    pub size: usize,
    /// Tile value that wins the game.
    pub win_tile: u32,
    /// Chance that a spawned tile is a 4 instead of a 2.
    pub four_probability: f64,
    /// Maximum number of undo snapshots kept. `None` keeps all of them.
    pub history_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size: 4,
            win_tile: 2048,
            four_probability: 0.1,
            history_limit: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.size < 2 {
            return Err(EngineError::InvalidConfig(format!(
                "grid size must be at least 2, got {}",
                self.size
            )));
        }
        if !(4..=MAX_TILE).contains(&self.win_tile) || !self.win_tile.is_power_of_two() {
            return Err(EngineError::InvalidConfig(format!(
                "win tile must be a power of two between 4 and {MAX_TILE}, got {}",
                self.win_tile
            )));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(EngineError::InvalidConfig(format!(
                "four probability must be within [0, 1], got {}",
                self.four_probability
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Config;

    #[test]
    fn default_is_classic_game() {
        let c = Config::default();
        assert_eq!(c.size, 4);
        assert_eq!(c.win_tile, 2048);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            Config {
                size: 1,
                ..Config::default()
            },
            Config {
                win_tile: 1000,
                ..Config::default()
            },
            Config {
                win_tile: 2,
                ..Config::default()
            },
            Config {
                win_tile: 1 << 31,
                ..Config::default()
            },
            Config {
                four_probability: f64::NAN,
                ..Config::default()
            },
        ];
        for c in bad {
            assert!(c.validate().is_err(), "{c:?} should be rejected");
        }
    }

    #[test]
    fn missing_fields_take_defaults() {
        let c: Config = serde_json::from_str(r#"{"size": 5, "history_limit": 10}"#).unwrap();
        assert_eq!(c.size, 5);
        assert_eq!(c.win_tile, 2048);
        assert_eq!(c.history_limit, Some(10));
    }
}
