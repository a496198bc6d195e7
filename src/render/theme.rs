use serde::{Deserialize, Serialize};
use super::canvas::Rgba;
use crate::layout::ColorClass;
use crate::particles::{ParticleKind, Season};

/// Colours and stroke widths for everything the pipeline draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgba,
    pub trunk: Rgba,
    pub branch: Rgba,
    pub leaf_active: Rgba,
    pub leaf_dim: Rgba,
    pub branch_width: f32,
    pub leaf_width: f32,
    pub spring: Rgba,
    pub summer: Rgba,
    pub autumn: Rgba,
    pub winter: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(0x07, 0x0b, 0x16),
            trunk: Rgba::rgb(0xb8, 0xf3, 0xff),
            branch: Rgba::rgb(0x42, 0xe8, 0xff),
            leaf_active: Rgba::rgb(0x59, 0xff, 0xc9),
            leaf_dim: Rgba::rgb(0x5b, 0x8c, 0xff),
            branch_width: 4.0,
            leaf_width: 2.0,
            spring: Rgba::rgb(0xff, 0xb7, 0xd5),
            summer: Rgba::rgb(0xff, 0xe0, 0x66),
            autumn: Rgba::rgb(0xff, 0x8c, 0x42),
            winter: Rgba::rgb(0xe8, 0xf4, 0xff),
        }
    }
}

impl Palette {
    pub fn edge(&self, class: ColorClass) -> Rgba {
        match class {
            ColorClass::Branch => self.branch,
            ColorClass::LeafActive => self.leaf_active,
            ColorClass::LeafDim => self.leaf_dim,
        }
    }

    pub fn edge_width(&self, class: ColorClass) -> f32 {
        match class {
            ColorClass::Branch => self.branch_width,
            ColorClass::LeafActive | ColorClass::LeafDim => self.leaf_width,
        }
    }

    pub fn ambient(&self, season: Season) -> Rgba {
        match season {
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Autumn => self.autumn,
            Season::Winter => self.winter,
        }
    }

    pub fn particle(&self, kind: ParticleKind, season: Season) -> Rgba {
        match kind {
            ParticleKind::Burst(class) => self.edge(class),
            ParticleKind::Ambient => self.ambient(season),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_colors_are_distinct() {
        let p = Palette::default();
        assert_ne!(p.edge(ColorClass::Branch), p.edge(ColorClass::LeafActive));
        assert_ne!(p.edge(ColorClass::LeafActive), p.edge(ColorClass::LeafDim));
        assert!(p.edge_width(ColorClass::Branch) > p.edge_width(ColorClass::LeafDim));
    }

    #[test]
    fn test_particle_colors_follow_kind() {
        let p = Palette::default();
        assert_eq!(p.particle(ParticleKind::Burst(ColorClass::LeafDim), Season::Winter), p.leaf_dim);
        assert_eq!(p.particle(ParticleKind::Ambient, Season::Autumn), p.autumn);
    }

    #[test]
    fn test_partial_yaml_override() {
        let p: Palette = serde_yaml::from_str("branch: '#ff0000'\nleaf_width: 3.0").unwrap();
        assert_eq!(p.branch, Rgba::rgb(255, 0, 0));
        assert_eq!(p.leaf_width, 3.0);
        assert_eq!(p.background, Palette::default().background);
    }
}
