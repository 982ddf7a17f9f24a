//! Decoration streaming configuration

use serde::{Deserialize, Serialize};

use crate::core::types::Result;

/// Settings for one decoration stream.
///
/// `terrain_seed` is shared with terrain generation so decoration stays
/// spatially coherent with the ground it sits on; `decor_seed` is private
/// to placement jitter and variant selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorConfig {
    /// Cell size in world units
    pub spacing: f32,
    /// Instances attempted per cell
    pub density: u32,
    /// Generation extent around the anchor, in cells
    pub radius: u32,
    /// Seed shared with terrain generation
    pub terrain_seed: u32,
    /// Seed private to decoration placement
    pub decor_seed: u32,
}

impl Default for DecorConfig {
    fn default() -> Self {
        Self {
            spacing: 8.0,
            density: 4,
            radius: 5,
            terrain_seed: 12345,
            decor_seed: 54321,
        }
    }
}

impl DecorConfig {
    /// Parse a config from host-supplied JSON; missing fields use defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = DecorConfig::default();
        assert!(cfg.spacing > 0.0);
        assert!(cfg.density > 0);
        assert!(cfg.radius > 0);
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = DecorConfig::from_json_str(r#"{"spacing": 4.0, "density": 9}"#).unwrap();
        assert_eq!(cfg.spacing, 4.0);
        assert_eq!(cfg.density, 9);
        // Unspecified fields fall back to defaults
        assert_eq!(cfg.radius, DecorConfig::default().radius);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(DecorConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_round_trip() {
        let cfg = DecorConfig {
            spacing: 2.5,
            density: 7,
            radius: 3,
            terrain_seed: 1,
            decor_seed: 2,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back = DecorConfig::from_json_str(&json).unwrap();
        assert_eq!(back.spacing, 2.5);
        assert_eq!(back.decor_seed, 2);
    }
}
