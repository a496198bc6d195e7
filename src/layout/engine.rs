use serde::{Deserialize, Serialize};
use crate::data::{GoalId, LifeTree, StructureId};
use crate::math::Vec2;

/// Parameters controlling where nodes land on the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Left/right margin excluded from the branch columns
    pub horizontal_padding: f32,
    /// Y of the trunk point
    pub trunk_offset: f32,
    /// Y of the branch row
    pub top_offset: f32,
    /// Gap between a branch and its first leaf
    pub vertical_headroom: f32,
    /// Gap between consecutive leaves
    pub goal_spacing: f32,
    /// Surface is at least `top_offset + minimum_height` tall
    pub minimum_height: f32,
    /// Edge curvature as a fraction of edge length
    pub bow: f32,
    /// Radius of branch knots; leaves are drawn slightly smaller
    pub node_radius: f32,
    /// Room left below the lowest leaf on the drawing surface
    pub bottom_margin: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            horizontal_padding: 40.0,
            trunk_offset: 40.0,
            top_offset: 120.0,
            vertical_headroom: 150.0,
            goal_spacing: 150.0,
            minimum_height: 480.0,
            bow: 0.12,
            node_radius: 10.0,
            bottom_margin: 60.0,
        }
    }
}

impl LayoutParams {
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("horizontal_padding", self.horizontal_padding),
            ("trunk_offset", self.trunk_offset),
            ("top_offset", self.top_offset),
            ("vertical_headroom", self.vertical_headroom),
            ("minimum_height", self.minimum_height),
            ("bow", self.bow),
            ("bottom_margin", self.bottom_margin),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("layout.{} must be a non-negative number", name));
            }
        }
        if !(self.goal_spacing.is_finite() && self.goal_spacing > 0.0) {
            return Err("layout.goal_spacing must be positive".to_string());
        }
        if !(self.node_radius.is_finite() && self.node_radius > 0.0) {
            return Err("layout.node_radius must be positive".to_string());
        }
        Ok(())
    }
}

/// Placed structure
#[derive(Debug, Clone, PartialEq)]
pub struct BranchPosition {
    pub structure_id: StructureId,
    pub name: String,
    pub position: Vec2,
    pub collapsed: bool,
    /// All goals, including hidden ones
    pub goal_count: usize,
    pub completed_count: usize,
    /// Index of this branch's first leaf in `Layout::leaves`
    pub first_leaf: usize,
    /// Number of placed leaves (0 when collapsed)
    pub leaf_count: usize,
}

/// Placed goal
#[derive(Debug, Clone, PartialEq)]
pub struct LeafPosition {
    pub structure_id: StructureId,
    pub goal_id: GoalId,
    pub name: String,
    pub position: Vec2,
    pub complete: bool,
    /// Index of the owning branch in `Layout::branches`
    pub branch: usize,
}

/// Result of a layout pass
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub trunk: Vec2,
    pub branches: Vec<BranchPosition>,
    pub leaves: Vec<LeafPosition>,
    /// Lowest point of the content: tallest leaf, viewport or minimum height
    pub content_height: f32,
    /// Height of the drawing surface: `content_height`, stretched so the
    /// lowest leaf keeps `bottom_margin` below it
    pub surface_height: f32,
    pub width: f32,
    pub height: f32,
    pub params: LayoutParams,
}

impl Layout {
    /// Layout of an empty tree; used before anything is loaded
    pub fn empty(width: f32, height: f32, params: &LayoutParams) -> Self {
        compute_layout(&LifeTree::new(), width, height, params)
    }

    pub fn branch(&self, id: &StructureId) -> Option<&BranchPosition> {
        self.branches.iter().find(|b| &b.structure_id == id)
    }

    /// Leaves placed under one branch
    pub fn leaves_of(&self, branch: &BranchPosition) -> &[LeafPosition] {
        &self.leaves[branch.first_leaf..branch.first_leaf + branch.leaf_count]
    }

    pub fn leaf(&self, structure: &StructureId, goal: &GoalId) -> Option<&LeafPosition> {
        self.leaves
            .iter()
            .find(|l| &l.structure_id == structure && &l.goal_id == goal)
    }

    pub fn node_count(&self) -> usize {
        1 + self.branches.len() + self.leaves.len()
    }
}

/// Place the trunk, one branch per structure and one leaf per visible goal.
///
/// Structures split the padded width into equal columns; a structure's goals
/// stack straight down its column in insertion order. A collapsed structure
/// contributes its branch but no leaves.
pub fn compute_layout(tree: &LifeTree, width: f32, height: f32, params: &LayoutParams) -> Layout {
    let width = sanitize_extent(width);
    let height = sanitize_extent(height);

    let trunk = Vec2::new(width / 2.0, params.trunk_offset);

    // N is floored to 1 for spacing only; branch count still follows the tree
    let columns = tree.structures.len().max(1) as f32;
    let column_width = (width - 2.0 * params.horizontal_padding) / columns;

    let mut branches = Vec::with_capacity(tree.structures.len());
    let mut leaves = Vec::with_capacity(tree.goal_count());
    let mut tallest_leaf = 0.0f32;

    for (i, structure) in tree.structures.iter().enumerate() {
        let x = params.horizontal_padding + column_width * (i as f32 + 0.5);
        let position = Vec2::new(x, params.top_offset);
        let first_leaf = leaves.len();

        for (k, goal) in structure.visible_goals().iter().enumerate() {
            let y = params.top_offset + params.vertical_headroom + k as f32 * params.goal_spacing;
            tallest_leaf = tallest_leaf.max(y);
            leaves.push(LeafPosition {
                structure_id: structure.id.clone(),
                goal_id: goal.id.clone(),
                name: goal.name.clone(),
                position: Vec2::new(x, y),
                complete: goal.complete,
                branch: i,
            });
        }

        branches.push(BranchPosition {
            structure_id: structure.id.clone(),
            name: structure.name.clone(),
            position,
            collapsed: structure.collapsed,
            goal_count: structure.goals.len(),
            completed_count: structure.completed_count(),
            first_leaf,
            leaf_count: leaves.len() - first_leaf,
        });
    }

    let content_height = tallest_leaf
        .max(height)
        .max(params.top_offset + params.minimum_height);
    let surface_height = if leaves.is_empty() {
        content_height
    } else {
        content_height.max(tallest_leaf + params.bottom_margin)
    };

    Layout {
        trunk,
        branches,
        leaves,
        content_height,
        surface_height,
        width,
        height,
        params: *params,
    }
}

fn sanitize_extent(v: f32) -> f32 {
    if v.is_finite() && v >= 1.0 {
        v
    } else {
        1.0
    }
}
