use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Externally selected theme; only changes how ambient particles look
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// How an ambient particle is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleShape {
    /// Elongated soft blossom
    Petal,
    /// Round glowing dot
    Firefly,
    /// Wide flat ellipse
    Leaf,
    /// Small six-armed star
    Flake,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn shape(&self) -> ParticleShape {
        match self {
            Season::Spring => ParticleShape::Petal,
            Season::Summer => ParticleShape::Firefly,
            Season::Autumn => ParticleShape::Leaf,
            Season::Winter => ParticleShape::Flake,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            other => Err(format!("unknown season '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_season() {
        assert_eq!("Winter".parse::<Season>(), Ok(Season::Winter));
        assert_eq!(" fall ".parse::<Season>(), Ok(Season::Autumn));
        assert!("monsoon".parse::<Season>().is_err());
    }

    #[test]
    fn test_each_season_has_distinct_shape() {
        let shapes: Vec<ParticleShape> = Season::ALL.iter().map(|s| s.shape()).collect();
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_name_roundtrip() {
        for season in Season::ALL {
            assert_eq!(season.name().parse::<Season>(), Ok(season));
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let s: Season = serde_yaml::from_str("autumn").unwrap();
        assert_eq!(s, Season::Autumn);
    }
}
