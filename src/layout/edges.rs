use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::data::{GoalId, StructureId};
use crate::math::Vec2;
use super::engine::Layout;

/// Colour role of an edge or emission particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    /// Trunk to structure
    Branch,
    /// Structure to a completed goal
    LeafActive,
    /// Structure to an open goal
    LeafDim,
}

impl ColorClass {
    pub fn for_goal(complete: bool) -> Self {
        if complete {
            ColorClass::LeafActive
        } else {
            ColorClass::LeafDim
        }
    }
}

/// Identity of an edge that survives coordinate changes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeKey {
    Trunk(StructureId),
    Leaf(StructureId, GoalId),
}

/// A visible connection between two placed nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub key: EdgeKey,
    pub from: Vec2,
    pub to: Vec2,
    pub color: ColorClass,
}

/// An edge that was not visible in the previous layout
#[derive(Debug, Clone, PartialEq)]
pub struct NewEdge {
    pub edge: Edge,
    /// 1 when the edge hangs off a branch that is itself new, else 0
    pub generation: usize,
}

impl Layout {
    /// All visible edges in draw order: each trunk edge, then its leaves
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.branches.len() + self.leaves.len());
        for branch in &self.branches {
            edges.push(Edge {
                key: EdgeKey::Trunk(branch.structure_id.clone()),
                from: self.trunk,
                to: branch.position,
                color: ColorClass::Branch,
            });
            for leaf in self.leaves_of(branch) {
                edges.push(Edge {
                    key: EdgeKey::Leaf(leaf.structure_id.clone(), leaf.goal_id.clone()),
                    from: branch.position,
                    to: leaf.position,
                    color: ColorClass::for_goal(leaf.complete),
                });
            }
        }
        edges
    }

    pub fn edge_keys(&self) -> HashSet<EdgeKey> {
        let mut keys = HashSet::with_capacity(self.branches.len() + self.leaves.len());
        for branch in &self.branches {
            keys.insert(EdgeKey::Trunk(branch.structure_id.clone()));
        }
        for leaf in &self.leaves {
            keys.insert(EdgeKey::Leaf(leaf.structure_id.clone(), leaf.goal_id.clone()));
        }
        keys
    }
}

/// Edges visible in `next` that were not visible in `previous`.
///
/// Matching is by key, so an edge whose endpoints merely moved (a column
/// shift after adding a structure, a resize) is not reported.
pub fn new_edges(previous: &Layout, next: &Layout) -> Vec<NewEdge> {
    let known = previous.edge_keys();
    let mut fresh_branches: HashSet<StructureId> = HashSet::new();

    next.edges()
        .into_iter()
        .filter(|edge| !known.contains(&edge.key))
        .map(|edge| {
            let generation = match &edge.key {
                EdgeKey::Trunk(sid) => {
                    fresh_branches.insert(sid.clone());
                    0
                }
                EdgeKey::Leaf(sid, _) if fresh_branches.contains(sid) => 1,
                EdgeKey::Leaf(..) => 0,
            };
            NewEdge { edge, generation }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Goal, LifeTree, Structure};
    use crate::layout::{compute_layout, LayoutParams};

    fn layout(tree: &LifeTree) -> Layout {
        compute_layout(tree, 800.0, 600.0, &LayoutParams::default())
    }

    fn sample_tree() -> LifeTree {
        LifeTree::from_structures(vec![
            Structure::new("health", "Health").with_goals(vec![
                Goal::new("sleep", "Sleep 8h").completed(),
                Goal::new("run", "Run"),
            ]),
            Structure::new("work", "Work").with_goals(vec![Goal::new("ship", "Ship")]),
        ])
    }

    #[test]
    fn test_edges_in_draw_order() {
        let edges = layout(&sample_tree()).edges();
        let kinds: Vec<&str> = edges
            .iter()
            .map(|e| match e.key {
                EdgeKey::Trunk(_) => "trunk",
                EdgeKey::Leaf(..) => "leaf",
            })
            .collect();
        assert_eq!(kinds, vec!["trunk", "leaf", "leaf", "trunk", "leaf"]);
    }

    #[test]
    fn test_edge_colors() {
        let edges = layout(&sample_tree()).edges();
        assert_eq!(edges[0].color, ColorClass::Branch);
        assert_eq!(edges[1].color, ColorClass::LeafActive);
        assert_eq!(edges[2].color, ColorClass::LeafDim);
    }

    #[test]
    fn test_leaf_edge_connects_branch_to_leaf() {
        let l = layout(&sample_tree());
        let edges = l.edges();
        assert_eq!(edges[1].from, l.branches[0].position);
        assert_eq!(edges[1].to, l.leaves[0].position);
        assert_eq!(edges[0].from, l.trunk);
    }

    #[test]
    fn test_everything_new_on_first_layout() {
        let empty = layout(&LifeTree::new());
        let fresh = new_edges(&empty, &layout(&sample_tree()));

        assert_eq!(fresh.len(), 5);
        assert_eq!(fresh[0].generation, 0);
        // Leaves of a brand new branch wait one generation
        assert_eq!(fresh[1].generation, 1);
        assert_eq!(fresh[2].generation, 1);
    }

    #[test]
    fn test_unchanged_layout_has_no_new_edges() {
        let l = layout(&sample_tree());
        assert!(new_edges(&l, &l).is_empty());
    }

    #[test]
    fn test_moved_edges_are_not_new() {
        let mut tree = sample_tree();
        let before = layout(&tree);
        tree.structures.push(Structure::new("play", "Play"));
        let after = layout(&tree);

        // Existing columns shifted, but only the new trunk edge is reported
        let fresh = new_edges(&before, &after);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].edge.key, EdgeKey::Trunk(StructureId::new("play")));
    }

    #[test]
    fn test_resize_reports_nothing() {
        let tree = sample_tree();
        let small = compute_layout(&tree, 640.0, 480.0, &LayoutParams::default());
        let large = compute_layout(&tree, 1920.0, 1080.0, &LayoutParams::default());
        assert!(new_edges(&small, &large).is_empty());
    }

    #[test]
    fn test_expand_reports_leaves_at_generation_zero() {
        let mut tree = sample_tree();
        tree.structures[0].collapsed = true;
        let collapsed = layout(&tree);
        tree.structures[0].collapsed = false;
        let expanded = layout(&tree);

        let fresh = new_edges(&collapsed, &expanded);
        assert_eq!(fresh.len(), 2);
        assert!(fresh.iter().all(|n| n.generation == 0));
        assert!(fresh.iter().all(|n| matches!(n.edge.key, EdgeKey::Leaf(..))));
    }

    #[test]
    fn test_toggling_completion_is_not_new() {
        let mut tree = sample_tree();
        let before = layout(&tree);
        tree.structures[1].goals[0].complete = true;
        let after = layout(&tree);

        assert!(new_edges(&before, &after).is_empty());
        assert_eq!(after.edges()[4].color, ColorClass::LeafActive);
    }
}
