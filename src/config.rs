use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable rule parameters. Lifespans are fixed per flavor and live in `particle`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Per-direction chance that a plant tries to grow (Up, Left, Right in order).
    pub grow_chance: f64,
    /// Per-neighbor chance that fire ignites a plant or flower.
    pub ignite_chance: f64,
    /// Fountains emit water on ticks divisible by this.
    pub fountain_interval: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            grow_chance: 0.5,
            ignite_chance: 0.4,
            fountain_interval: 4,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("grow_chance", self.grow_chance),
            ("ignite_chance", self.ignite_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }
        if self.fountain_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Params::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_probability() {
        let params = Params {
            ignite_chance: 1.5,
            ..Params::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::Probability {
                name: "ignite_chance",
                value: 1.5
            })
        );
    }

    #[test]
    fn rejects_zero_interval() {
        let params = Params {
            fountain_interval: 0,
            ..Params::default()
        };
        assert_eq!(params.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: Params = serde_json::from_str(r#"{"grow_chance": 0.1}"#).unwrap();
        assert_eq!(params.grow_chance, 0.1);
        assert_eq!(params.ignite_chance, 0.4);
        assert_eq!(params.fountain_interval, 4);
    }
}
