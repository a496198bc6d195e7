//! Particle field: short-lived emission bursts and seasonal ambient drift.
//!
//! Motion is random by design; the random source is a seedable `SmallRng`
//! so tests can check population and lifetime properties reproducibly.

mod field;
mod season;

pub use field::{Particle, ParticleField, ParticleKind, ParticleParams};
pub use season::{ParticleShape, Season};
