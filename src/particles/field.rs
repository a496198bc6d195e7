use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use super::season::Season;
use crate::layout::ColorClass;
use crate::math::Vec2;

const DEFAULT_SEED: u64 = 0x5eed_1ea5;
/// Ambient particles live this many times longer than burst particles
const AMBIENT_LIFE_FACTOR: f32 = 2.0;
/// Storage reserved up front, whatever the configured cap
const RESERVED_PARTICLES: usize = 512;

/// Parameters controlling particle emission and motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
    /// Total population above which nothing new is emitted
    pub max_particles: usize,
    /// Ambient particles never exceed this count
    pub ambient_cap: usize,
    /// Ambient particles spawned per tick
    pub ambient_rate: f32,
    /// Largest single burst
    pub max_burst: usize,
    /// Burst size used when a segment starts growing
    pub burst_count: usize,
    /// Burst velocity range is +/- this, per axis, in px per tick
    pub burst_speed: f32,
    /// Burst lifetime band in ticks
    pub life_min: f32,
    pub life_max: f32,
    /// Downward drift added to vy every tick
    pub gravity: f32,
    /// Ambient velocity range
    pub ambient_speed: f32,
    /// Fixed seed for reproducible motion; random when absent
    pub seed: Option<u64>,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            max_particles: 160,
            ambient_cap: 60,
            ambient_rate: 0.5,
            max_burst: 24,
            burst_count: 12,
            burst_speed: 1.6,
            life_min: 60.0,
            life_max: 100.0,
            gravity: 0.04,
            ambient_speed: 0.4,
            seed: None,
        }
    }
}

impl ParticleParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_particles == 0 {
            return Err("particles.max_particles must be positive".to_string());
        }
        if self.ambient_cap > self.max_particles {
            return Err("particles.ambient_cap must not exceed max_particles".to_string());
        }
        if !(self.life_min > 0.0 && self.life_min <= self.life_max && self.life_max.is_finite()) {
            return Err("particles.life_min must be positive and <= life_max".to_string());
        }
        let non_negative = [
            ("ambient_rate", self.ambient_rate),
            ("burst_speed", self.burst_speed),
            ("gravity", self.gravity),
            ("ambient_speed", self.ambient_speed),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("particles.{} must be non-negative", name));
            }
        }
        Ok(())
    }
}

/// Where a particle came from, which decides its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Emitted when an edge starts growing
    Burst(ColorClass),
    /// Seasonal background drift
    Ambient,
}

/// A single particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining ticks
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Fade in quickly, fade out over the last third of life
    pub fn alpha(&self) -> f32 {
        let t = (self.life / self.max_life).clamp(0.0, 1.0);
        let fade_in = ((1.0 - t) * 6.0).min(1.0);
        let fade_out = (t * 3.0).min(1.0);
        fade_in * fade_out
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Bounded particle population owned by the render loop
#[derive(Debug, Clone)]
pub struct ParticleField {
    params: ParticleParams,
    particles: Vec<Particle>,
    rng: SmallRng,
    season: Season,
    /// Spawn area for ambient particles (surface size)
    bounds: Vec2,
    ambient_accumulator: f32,
}

impl ParticleField {
    pub fn new(params: ParticleParams) -> Self {
        let seed = params.seed.unwrap_or(DEFAULT_SEED);
        Self::with_seed(params, seed)
    }

    /// Inject the random source's seed
    pub fn with_seed(params: ParticleParams, seed: u64) -> Self {
        Self {
            params,
            particles: Vec::with_capacity(
                params
                    .max_particles
                    .saturating_add(params.max_burst)
                    .min(RESERVED_PARTICLES),
            ),
            rng: SmallRng::seed_from_u64(seed),
            season: Season::default(),
            bounds: Vec2::new(800.0, 600.0),
            ambient_accumulator: 0.0,
        }
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }

    pub fn set_params(&mut self, params: ParticleParams) {
        if let Some(seed) = params.seed {
            if self.params.seed != Some(seed) {
                self.rng = SmallRng::seed_from_u64(seed);
            }
        }
        self.params = params;
        let limit = self.population_limit();
        self.particles.truncate(limit);
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn set_season(&mut self, season: Season) {
        self.season = season;
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.bounds = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// Hard ceiling: the cap plus one burst that started just below it
    pub fn population_limit(&self) -> usize {
        self.params.max_particles.saturating_add(self.params.max_burst)
    }

    /// Emit a burst at `origin`; returns how many particles were added.
    ///
    /// Nothing is emitted once the population has reached `max_particles`.
    pub fn emit_burst(&mut self, origin: Vec2, color: ColorClass, count: usize) -> usize {
        if self.particles.len() >= self.params.max_particles {
            return 0;
        }
        let count = count.min(self.params.max_burst);
        let speed = self.params.burst_speed;

        for _ in 0..count {
            let velocity = Vec2::new(
                self.rng.random_range(-speed..=speed),
                self.rng.random_range(-speed..=speed),
            );
            let life = self.rng.random_range(self.params.life_min..=self.params.life_max);
            let size = self.rng.random_range(1.5..=3.0);
            self.particles.push(Particle {
                position: origin,
                velocity,
                life,
                max_life: life,
                size,
                kind: ParticleKind::Burst(color),
            });
        }
        count
    }

    /// Spawn ambient particles at `ambient_rate`; returns how many were added.
    ///
    /// Spawns that would exceed `ambient_cap` or `max_particles` are dropped,
    /// not saved up.
    pub fn emit_ambient(&mut self, ticks: f32) -> usize {
        let owed = self.ambient_accumulator + ticks.max(0.0) * self.params.ambient_rate;
        let owed = owed.min(self.params.ambient_cap as f32 + 1.0);
        let due = owed.floor();
        self.ambient_accumulator = owed - due;

        let room = self
            .params
            .ambient_cap
            .saturating_sub(self.ambient_count())
            .min(self.params.max_particles.saturating_sub(self.particles.len()));
        let spawned = (due as usize).min(room);
        for _ in 0..spawned {
            self.spawn_ambient();
        }
        spawned
    }

    fn spawn_ambient(&mut self) {
        let speed = self.params.ambient_speed;
        let position = Vec2::new(
            self.rng.random_range(0.0..=self.bounds.x),
            self.rng.random_range(0.0..=self.bounds.y),
        );
        let velocity = Vec2::new(
            self.rng.random_range(-speed..=speed),
            self.rng.random_range(-speed..=0.0),
        );
        let life = self.rng.random_range(self.params.life_min..=self.params.life_max)
            * AMBIENT_LIFE_FACTOR;
        let size = self.rng.random_range(2.0..=4.0);

        self.particles.push(Particle {
            position,
            velocity,
            life,
            max_life: life,
            size,
            kind: ParticleKind::Ambient,
        });
    }

    /// Integrate motion, age every particle and drop the dead ones
    pub fn advance(&mut self, ticks: f32) {
        let ticks = ticks.max(0.0);
        let gravity = self.params.gravity * ticks;

        for p in &mut self.particles {
            p.position = p.position + p.velocity.scale(ticks);
            p.velocity.y += gravity;
            p.life -= ticks;
        }

        self.particles.retain(|p| p.is_alive());
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.ambient_accumulator = 0.0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn ambient_count(&self) -> usize {
        self.particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Ambient)
            .count()
    }
}
