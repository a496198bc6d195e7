//! Engine configuration document
//!
//! One YAML document tunes layout, growth, particles and colours. Every
//! section is optional and every field inside a section defaults, so a
//! document only needs to name what it overrides.

use serde::{Deserialize, Serialize};
use crate::animation::GrowthParams;
use crate::layout::LayoutParams;
use crate::particles::{ParticleParams, Season};
use crate::render::Palette;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub season: Season,
    pub layout: LayoutParams,
    pub growth: GrowthParams,
    pub particles: ParticleParams,
    pub palette: Palette,
}

impl EngineConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: EngineConfig =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, String> {
        serde_yaml::to_string(self).map_err(|e| format!("Failed to write config: {}", e))
    }

    pub fn validate(&self) -> Result<(), String> {
        self.layout.validate()?;
        self.growth.validate()?;
        self.particles.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Easing;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EngineConfig::from_yaml("").unwrap(), EngineConfig::default());
        assert_eq!(EngineConfig::from_yaml("  \n").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let yaml = r#"
season: autumn
layout: { horizontal_padding: 60, top_offset: 100 }
growth: { growth_rate: 0.05, easing: ease_in_out }
particles: { max_particles: 200, seed: 7 }
"#;
        let config = EngineConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.season, Season::Autumn);
        assert_eq!(config.layout.horizontal_padding, 60.0);
        assert_eq!(config.layout.top_offset, 100.0);
        assert_eq!(config.layout.goal_spacing, LayoutParams::default().goal_spacing);
        assert!((config.growth.growth_rate - 0.05).abs() < 1e-6);
        assert_eq!(config.growth.easing, Easing::EaseInOut);
        assert_eq!(config.particles.max_particles, 200);
        assert_eq!(config.particles.seed, Some(7));
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(EngineConfig::from_yaml("growth: { growth_rate: 0.0 }").is_err());
        assert!(EngineConfig::from_yaml("growth: { growth_rate: 2.0 }").is_err());
        assert!(EngineConfig::from_yaml("particles: { max_particles: 0 }").is_err());
        assert!(EngineConfig::from_yaml("particles: { life_min: 90, life_max: 30 }").is_err());
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let err = EngineConfig::from_yaml("season: [").unwrap_err();
        assert!(err.starts_with("Failed to parse config"));
        assert!(EngineConfig::from_yaml("season: monsoon").is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = EngineConfig::default();
        config.season = Season::Winter;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(EngineConfig::from_yaml(&yaml).unwrap(), config);
    }
}
