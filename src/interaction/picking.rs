use crate::data::{GoalId, StructureId};
use crate::layout::Layout;
use crate::math::Vec2;

/// What a click landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Structure(StructureId),
    Goal(StructureId, GoalId),
}

/// Information about a click-node hit
#[derive(Debug, Clone, PartialEq)]
pub struct HitInfo {
    pub hit: Hit,
    pub distance: f32,
    pub position: Vec2,
}

#[derive(Debug, Clone)]
struct Target {
    hit: Hit,
    position: Vec2,
}

/// Point picking against the node markers of one layout
#[derive(Debug, Clone, Default)]
pub struct NodePicker {
    targets: Vec<Target>,
    radius: f32,
}

impl NodePicker {
    pub fn new(radius: f32) -> Self {
        Self {
            targets: Vec::new(),
            radius,
        }
    }

    /// Cache every branch and visible leaf position of `layout`
    pub fn from_layout(layout: &Layout, radius: f32) -> Self {
        let mut picker = Self::new(radius);
        picker.set_layout(layout);
        picker
    }

    pub fn set_layout(&mut self, layout: &Layout) {
        self.targets.clear();
        self.targets.reserve(layout.node_count());
        for branch in &layout.branches {
            self.targets.push(Target {
                hit: Hit::Structure(branch.structure_id.clone()),
                position: branch.position,
            });
        }
        for leaf in &layout.leaves {
            self.targets.push(Target {
                hit: Hit::Goal(leaf.structure_id.clone(), leaf.goal_id.clone()),
                position: leaf.position,
            });
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Closest node within the pick radius of `(x, y)`
    pub fn pick(&self, x: f32, y: f32) -> Option<Hit> {
        self.pick_info(x, y).map(|info| info.hit)
    }

    pub fn pick_info(&self, x: f32, y: f32) -> Option<HitInfo> {
        let point = Vec2::new(x, y);
        if !point.is_finite() {
            return None;
        }

        let mut closest: Option<HitInfo> = None;
        let mut min_dist = self.radius;

        for target in &self.targets {
            let dist = target.position.distance(&point);
            if dist <= min_dist {
                min_dist = dist;
                closest = Some(HitInfo {
                    hit: target.hit.clone(),
                    distance: dist,
                    position: target.position,
                });
            }
        }

        closest
    }
}
