//! Render loop and command surface
//!
//! `Engine` owns the tree, the current layout, the growth set, the particle
//! field and the frame canvas. Commands mutate the tree synchronously and
//! hand any newly visible edges to the growth set; `frame` draws whatever the
//! current state is. Nothing here touches the DOM, so the whole loop runs
//! natively under `cargo test`.

use log::{debug, info, warn};
use crate::config::EngineConfig;
use crate::data::{GoalId, LifeTree, StructureId, TreeError};
use crate::interaction::{Hit, NodePicker};
use crate::layout::{compute_layout, new_edges, ColorClass, Layout};
use crate::math::Vec2;
use crate::particles::{ParticleField, Season};
use crate::animation::GrowthSet;
use crate::render::{PixelCanvas, RenderPipeline};

/// Host frames are assumed to target 60 Hz; one tick is one such frame
pub const TICKS_PER_SECOND: f32 = 60.0;
/// A stalled tab must not fast-forward animations
pub const MAX_TICKS_PER_FRAME: f32 = 4.0;

/// Click tolerance around node markers, as a multiple of the node radius
const PICK_RADIUS_FACTOR: f32 = 1.5;

/// Convert a frame delta in seconds to animation ticks
pub fn frame_ticks(dt_seconds: f32) -> f32 {
    if !dt_seconds.is_finite() {
        return 0.0;
    }
    (dt_seconds * TICKS_PER_SECOND).clamp(0.0, MAX_TICKS_PER_FRAME)
}

/// A fully drawn still, ready for the host to encode
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major
    pub pixels: Vec<u8>,
}

pub struct Engine {
    config: EngineConfig,
    tree: LifeTree,
    width: f32,
    height: f32,
    layout: Layout,
    growth: GrowthSet,
    particles: ParticleField,
    pipeline: RenderPipeline,
    canvas: PixelCanvas,
    last_timestamp: Option<f64>,
}

impl Engine {
    pub fn new(width: f32, height: f32, config: EngineConfig) -> Self {
        let layout = Layout::empty(width, height, &config.layout);
        let mut particles = ParticleField::new(config.particles);
        particles.set_season(config.season);
        particles.set_bounds(layout.width, layout.surface_height);
        let (canvas_width, canvas_height) = RenderPipeline::surface_size(&layout);

        Self {
            growth: GrowthSet::new(config.growth),
            pipeline: RenderPipeline::new(config.palette),
            canvas: PixelCanvas::new(canvas_width, canvas_height),
            tree: LifeTree::new(),
            width,
            height,
            layout,
            particles,
            config,
            last_timestamp: None,
        }
    }

    // === Loading ===

    /// Load a persisted snapshot; unusable input yields an empty tree
    pub fn load_snapshot(&mut self, json: &str) {
        let tree = LifeTree::from_json_or_empty(json);
        self.set_tree(tree);
    }

    /// Replace the tree and grow it from scratch: branches first, their
    /// leaves one generation later
    pub fn set_tree(&mut self, tree: LifeTree) {
        self.tree = tree;
        self.growth.clear();
        self.relayout();

        let empty = Layout::empty(self.width, self.height, &self.config.layout);
        self.start_growth(&empty, false);
        info!(
            "loaded tree with {} structures and {} goals",
            self.tree.len(),
            self.tree.goal_count()
        );
    }

    // === Commands ===

    pub fn add_structure(&mut self, name: &str) -> Result<StructureId, TreeError> {
        let id = self.tree.add_structure(name).inspect_err(log_rejection)?;
        self.grow_new_edges();
        Ok(id)
    }

    pub fn add_goal(&mut self, structure: &StructureId, name: &str) -> Result<GoalId, TreeError> {
        let id = self.tree.add_goal(structure, name).inspect_err(log_rejection)?;
        self.grow_new_edges();
        Ok(id)
    }

    /// Returns the goal's new completion state
    pub fn toggle_goal(&mut self, structure: &StructureId, goal: &GoalId) -> Result<bool, TreeError> {
        let complete = self.tree.toggle_goal(structure, goal).inspect_err(log_rejection)?;
        debug!("goal {} in {} complete={}", goal, structure, complete);
        self.grow_new_edges();
        Ok(complete)
    }

    /// Returns the structure's new collapsed state
    pub fn toggle_collapsed(&mut self, structure: &StructureId) -> Result<bool, TreeError> {
        let collapsed = self.tree.toggle_collapsed(structure).inspect_err(log_rejection)?;
        debug!("structure {} collapsed={}", structure, collapsed);
        self.grow_new_edges();
        Ok(collapsed)
    }

    pub fn clear_all(&mut self) {
        self.tree.clear_all();
        self.growth.clear();
        self.relayout();
    }

    /// Toggle whatever node sits under `(x, y)` in canvas coordinates
    pub fn click(&mut self, x: f32, y: f32) -> Result<Option<Hit>, TreeError> {
        let radius = self.layout.params.node_radius * PICK_RADIUS_FACTOR;
        let hit = NodePicker::from_layout(&self.layout, radius).pick(x, y);
        match &hit {
            Some(Hit::Structure(sid)) => {
                self.toggle_collapsed(sid)?;
            }
            Some(Hit::Goal(sid, gid)) => {
                self.toggle_goal(sid, gid)?;
            }
            None => {}
        }
        Ok(hit)
    }

    // === Host settings ===

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.relayout();
    }

    pub fn set_season(&mut self, season: Season) {
        self.config.season = season;
        self.particles.set_season(season);
        info!("season set to {}", season);
    }

    /// Apply a validated configuration; the tree is left untouched
    pub fn configure(&mut self, config: EngineConfig) -> Result<(), String> {
        config.validate()?;
        self.growth.set_params(config.growth);
        self.particles.set_params(config.particles);
        self.particles.set_season(config.season);
        self.pipeline = RenderPipeline::new(config.palette);
        self.config = config;
        self.relayout();
        info!("configuration applied");
        Ok(())
    }

    // === Frame loop ===

    /// Advance and draw one frame `dt_seconds` after the previous one
    pub fn frame(&mut self, dt_seconds: f32) -> &PixelCanvas {
        let ticks = frame_ticks(dt_seconds);

        self.relayout();
        let edges = self.layout.edges();
        self.growth.retarget(&edges);

        let easing = self.growth.params().easing;
        for seg in self.growth.tick_pending(ticks) {
            self.burst(seg.tip(easing), seg.color);
        }
        self.particles.emit_ambient(ticks);

        self.pipeline
            .draw_scene(&mut self.canvas, &self.layout, &edges, &self.growth, &self.particles);

        self.growth.advance(ticks);
        self.growth.prune_grown();
        self.particles.advance(ticks);

        &self.canvas
    }

    /// Advance using the host's frame timestamp in milliseconds
    pub fn frame_at(&mut self, timestamp_ms: f64) -> &PixelCanvas {
        let dt = match self.last_timestamp {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.frame(dt)
    }

    /// Jump every growing edge to its final state
    pub fn complete_growth(&mut self) {
        self.growth.complete_all();
        self.growth.prune_grown();
    }

    /// Draw the still export: every visible edge solid, no particles.
    ///
    /// Uses its own canvas; the live frame and animation state are untouched.
    pub fn snapshot(&self) -> Snapshot {
        let mut canvas = PixelCanvas::new(1, 1);
        self.pipeline
            .draw_snapshot(&mut canvas, &self.layout, &self.layout.edges());
        Snapshot {
            width: canvas.width(),
            height: canvas.height(),
            pixels: canvas.into_pixels(),
        }
    }

    // === Accessors ===

    pub fn tree(&self) -> &LifeTree {
        &self.tree
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn growth(&self) -> &GrowthSet {
        &self.growth
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn content_height(&self) -> f32 {
        self.layout.content_height
    }

    /// Pixel size of frames and snapshots for the current layout
    pub fn surface_size(&self) -> (u32, u32) {
        RenderPipeline::surface_size(&self.layout)
    }

    // === Internals ===

    fn relayout(&mut self) {
        self.layout = compute_layout(&self.tree, self.width, self.height, &self.config.layout);
        self.particles
            .set_bounds(self.layout.width, self.layout.surface_height);
    }

    /// Recompute layout after a command and start growing what appeared
    fn grow_new_edges(&mut self) {
        let previous = std::mem::replace(
            &mut self.layout,
            compute_layout(&self.tree, self.width, self.height, &self.config.layout),
        );
        self.particles
            .set_bounds(self.layout.width, self.layout.surface_height);
        self.growth.retarget(&self.layout.edges());
        self.start_growth(&previous, true);
    }

    /// Enqueue every edge of the current layout missing from `previous`.
    ///
    /// Edges hanging off a new branch wait one generation per level. Without
    /// bursts, delayed edges also sprout silently.
    fn start_growth(&mut self, previous: &Layout, with_bursts: bool) {
        let delay = self.config.growth.generation_delay;
        for fresh in new_edges(previous, &self.layout) {
            if fresh.generation > 0 {
                let wait = fresh.generation as f32 * delay;
                if with_bursts {
                    self.growth.enqueue_after(fresh.edge, wait);
                } else {
                    self.growth.enqueue_after_quietly(fresh.edge, wait);
                }
                continue;
            }
            let origin = fresh.edge.from;
            let color = fresh.edge.color;
            self.growth.enqueue(fresh.edge);
            if with_bursts {
                self.burst(origin, color);
            }
        }
    }

    fn burst(&mut self, origin: Vec2, color: ColorClass) {
        let count = self.config.particles.burst_count;
        self.particles.emit_burst(origin, color, count);
    }
}

fn log_rejection(err: &TreeError) {
    warn!("command rejected: {}", err);
}
