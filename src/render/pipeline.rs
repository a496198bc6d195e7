use std::collections::HashMap;
use super::canvas::{clamp_size, PixelCanvas, Rgba};
use super::theme::Palette;
use crate::animation::{ease, Easing, GrowthSet};
use crate::layout::{Edge, EdgeKey, Layout};
use crate::math::{EdgeCurve, Vec2};
use crate::particles::{Particle, ParticleField, ParticleKind, ParticleShape, Season};

/// Draws layouts, growing edges and particles onto a `PixelCanvas`
#[derive(Debug, Clone, Default)]
pub struct RenderPipeline {
    pub palette: Palette,
}

impl RenderPipeline {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Pixel size of the surface a layout is drawn on, after the raster cap
    pub fn surface_size(layout: &Layout) -> (u32, u32) {
        clamp_size(layout.width.ceil() as u32, layout.surface_height.ceil() as u32)
    }

    /// Size the canvas to the layout's full drawing surface
    pub fn fit_canvas(canvas: &mut PixelCanvas, layout: &Layout) {
        let (width, height) = Self::surface_size(layout);
        canvas.resize(width, height);
    }

    /// Render one animated frame.
    ///
    /// Edges are drawn in layout order; an edge that is still growing is
    /// drawn at its eased progress, every other edge solid. Particles go on
    /// top.
    pub fn draw_scene(
        &self,
        canvas: &mut PixelCanvas,
        layout: &Layout,
        edges: &[Edge],
        growth: &GrowthSet,
        particles: &ParticleField,
    ) {
        let progress = growth.progress_index();
        self.draw_tree(canvas, layout, edges, &progress, growth.params().easing);

        let season = particles.season();
        for particle in particles.iter() {
            self.draw_particle(canvas, particle, season);
        }
    }

    /// Render the still used for export: every visible edge fully grown,
    /// no particles
    pub fn draw_snapshot(&self, canvas: &mut PixelCanvas, layout: &Layout, edges: &[Edge]) {
        self.draw_tree(canvas, layout, edges, &HashMap::new(), Easing::Linear);
    }

    fn draw_tree(
        &self,
        canvas: &mut PixelCanvas,
        layout: &Layout,
        edges: &[Edge],
        progress: &HashMap<&EdgeKey, f32>,
        easing: Easing,
    ) {
        Self::fit_canvas(canvas, layout);
        canvas.clear(self.palette.background);

        let radius = layout.params.node_radius;
        canvas.fill_circle(layout.trunk, radius * 1.4, self.palette.trunk.with_alpha(0.35));

        let visible = |key: &EdgeKey| progress.get(key).map_or(1.0, |p| ease(*p, easing));

        for edge in edges {
            let shown = visible(&edge.key);
            if shown <= 0.0 {
                continue;
            }
            let curve = EdgeCurve::growing(edge.from, edge.to, layout.params.bow, shown);
            let points = curve.sample(curve.samples_for_length());
            canvas.stroke_path(&points, self.palette.edge_width(edge.color), self.palette.edge(edge.color));
        }

        // Node markers sit on top of the edge ends. They swell with their
        // edge and are full size once grown.
        canvas.fill_circle(layout.trunk, radius, self.palette.trunk);
        for branch in &layout.branches {
            let shown = visible(&EdgeKey::Trunk(branch.structure_id.clone()));
            if shown <= 0.0 {
                continue;
            }
            if branch.collapsed && branch.goal_count > 0 {
                canvas.stroke_circle(branch.position, radius * shown, 2.0, self.palette.branch);
                canvas.fill_circle(branch.position, radius * 0.35 * shown, self.palette.branch);
            } else {
                canvas.fill_circle(branch.position, radius * shown, self.palette.branch);
            }
        }
        for leaf in &layout.leaves {
            let shown = visible(&EdgeKey::Leaf(leaf.structure_id.clone(), leaf.goal_id.clone()));
            if shown <= 0.0 {
                continue;
            }
            let color = if leaf.complete {
                self.palette.leaf_active
            } else {
                self.palette.leaf_dim
            };
            canvas.fill_circle(leaf.position, radius * 0.6 * shown, color);
        }
    }

    fn draw_particle(&self, canvas: &mut PixelCanvas, p: &Particle, season: Season) {
        let alpha = p.alpha();
        if alpha <= 0.0 {
            return;
        }
        let color = self.palette.particle(p.kind, season).with_alpha(alpha);
        let shape = match p.kind {
            ParticleKind::Burst(_) => ParticleShape::Firefly,
            ParticleKind::Ambient => season.shape(),
        };

        match shape {
            ParticleShape::Petal => canvas.fill_ellipse(p.position, p.size, p.size * 0.55, color),
            ParticleShape::Leaf => canvas.fill_ellipse(p.position, p.size * 1.4, p.size * 0.7, color),
            ParticleShape::Firefly => {
                canvas.fill_circle(p.position, p.size * 1.8, color.with_alpha(0.3));
                canvas.fill_circle(p.position, p.size * 0.7, color);
            }
            ParticleShape::Flake => {
                for arm in 0..3 {
                    let angle = arm as f32 * std::f32::consts::FRAC_PI_3;
                    let offset = Vec2::new(angle.cos(), angle.sin()).scale(p.size);
                    canvas.stroke_path(&[p.position - offset, p.position + offset], 1.0, color);
                }
            }
        }
    }

    pub fn background(&self) -> Rgba {
        self.palette.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::GrowthParams;
    use crate::data::{Goal, LifeTree, Structure};
    use crate::layout::{compute_layout, ColorClass, LayoutParams};
    use crate::particles::ParticleParams;

    fn sample_layout() -> Layout {
        let tree = LifeTree::from_structures(vec![
            Structure::new("health", "Health")
                .with_goals(vec![Goal::new("sleep", "Sleep 8h").completed(), Goal::new("run", "Run")]),
            Structure::new("work", "Work").with_goals(vec![Goal::new("ship", "Ship")]),
        ]);
        compute_layout(&tree, 400.0, 300.0, &LayoutParams::default())
    }

    fn color_at(canvas: &PixelCanvas, p: Vec2) -> Rgba {
        canvas.pixel(p.x as u32, p.y as u32).unwrap()
    }

    #[test]
    fn test_snapshot_sized_to_surface() {
        let layout = sample_layout();
        let mut canvas = PixelCanvas::new(1, 1);
        RenderPipeline::default().draw_snapshot(&mut canvas, &layout, &layout.edges());

        assert_eq!(canvas.width(), 400);
        assert_eq!(canvas.height(), layout.surface_height as u32);
        assert_eq!((canvas.width(), canvas.height()), RenderPipeline::surface_size(&layout));
    }

    #[test]
    fn test_lowest_leaf_drawn_whole() {
        let goals = (0..4).map(|i| Goal::new(&format!("g{}", i), "Goal")).collect();
        let tree = LifeTree::from_structures(vec![Structure::new("health", "Health").with_goals(goals)]);
        let layout = compute_layout(&tree, 400.0, 300.0, &LayoutParams::default());
        let pipeline = RenderPipeline::default();
        let mut canvas = PixelCanvas::new(1, 1);
        pipeline.draw_snapshot(&mut canvas, &layout, &layout.edges());

        let lowest = layout.leaves[3].position;
        assert_eq!(lowest.y, layout.content_height);
        let below = lowest + Vec2::new(0.0, layout.params.node_radius * 0.3);
        assert_eq!(color_at(&canvas, below), pipeline.palette.leaf_dim);
    }

    #[test]
    fn test_snapshot_draws_nodes() {
        let layout = sample_layout();
        let pipeline = RenderPipeline::default();
        let mut canvas = PixelCanvas::new(1, 1);
        pipeline.draw_snapshot(&mut canvas, &layout, &layout.edges());

        assert_eq!(color_at(&canvas, layout.trunk), pipeline.palette.trunk);
        assert_eq!(color_at(&canvas, layout.branches[0].position), pipeline.palette.branch);
        assert_eq!(color_at(&canvas, layout.leaves[0].position), pipeline.palette.leaf_active);
        assert_eq!(color_at(&canvas, layout.leaves[1].position), pipeline.palette.leaf_dim);
        assert_eq!(canvas.pixel(2, 2), Some(pipeline.background()));
    }

    #[test]
    fn test_grown_frame_matches_snapshot() {
        let layout = sample_layout();
        let edges = layout.edges();
        let pipeline = RenderPipeline::default();

        let mut growth = GrowthSet::new(GrowthParams::default());
        for edge in &edges {
            growth.enqueue(edge.clone());
        }
        growth.complete_all();
        let particles = ParticleField::with_seed(ParticleParams::default(), 1);

        let mut frame = PixelCanvas::new(1, 1);
        pipeline.draw_scene(&mut frame, &layout, &edges, &growth, &particles);
        let mut still = PixelCanvas::new(1, 1);
        pipeline.draw_snapshot(&mut still, &layout, &edges);

        assert_eq!(frame, still);
    }

    #[test]
    fn test_ungrown_edges_are_hidden() {
        let layout = sample_layout();
        let edges = layout.edges();
        let pipeline = RenderPipeline::default();

        let mut growth = GrowthSet::new(GrowthParams::default());
        for edge in &edges {
            growth.enqueue(edge.clone());
        }
        let particles = ParticleField::with_seed(ParticleParams::default(), 1);
        let mut frame = PixelCanvas::new(1, 1);
        pipeline.draw_scene(&mut frame, &layout, &edges, &growth, &particles);

        // Nothing but the trunk is visible before growth starts
        assert_eq!(color_at(&frame, layout.branches[0].position), pipeline.background());
        assert_eq!(color_at(&frame, layout.leaves[0].position), pipeline.background());
        assert_eq!(color_at(&frame, layout.trunk), pipeline.palette.trunk);
    }

    #[test]
    fn test_particles_are_drawn() {
        let layout = compute_layout(&LifeTree::new(), 200.0, 200.0, &LayoutParams::default());
        let pipeline = RenderPipeline::default();
        let growth = GrowthSet::new(GrowthParams::default());
        let mut particles = ParticleField::with_seed(
            ParticleParams {
                burst_speed: 0.0,
                gravity: 0.0,
                ..Default::default()
            },
            3,
        );
        let origin = Vec2::new(100.0, 400.0);
        particles.emit_burst(origin, ColorClass::LeafActive, 4);
        particles.advance(20.0);

        let mut frame = PixelCanvas::new(1, 1);
        pipeline.draw_scene(&mut frame, &layout, &[], &growth, &particles);
        assert_ne!(color_at(&frame, origin), pipeline.background());
    }
}
