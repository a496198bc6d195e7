use std::collections::HashSet;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use super::error::TreeError;
use super::structure::{Goal, GoalId, Structure, StructureId};

/// The user's blueprint: an ordered list of structures, each with goals.
///
/// This is the single source of truth for structural data. Layout and
/// animation only ever read it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifeTree {
    #[serde(default)]
    pub structures: Vec<Structure>,
    /// Counter for generated ids; never rewinds, so ids stay unique after a clear
    #[serde(skip)]
    next_id: u64,
}

impl PartialEq for LifeTree {
    fn eq(&self, other: &Self) -> bool {
        self.structures == other.structures
    }
}

impl LifeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_structures(structures: Vec<Structure>) -> Self {
        Self { structures, next_id: 0 }
    }

    /// Parse a persisted snapshot (`{"structures": [...]}`)
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let tree: LifeTree = serde_json::from_str(json)
            .map_err(|e| TreeError::MalformedSnapshot(e.to_string()))?;
        tree.validate()?;
        Ok(tree)
    }

    /// Parse a snapshot, falling back to an empty tree when it is unusable
    pub fn from_json_or_empty(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tree) => tree,
            Err(e) => {
                warn!("discarding persisted tree: {}", e);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> String {
        // Only strings and bools inside; serialization cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"structures":[]}"#.to_string())
    }

    fn validate(&self) -> Result<(), TreeError> {
        let mut seen = HashSet::new();
        for s in &self.structures {
            if !seen.insert(&s.id) {
                return Err(TreeError::MalformedSnapshot(format!(
                    "duplicate structure id '{}'",
                    s.id
                )));
            }
            let mut goals = HashSet::new();
            for g in &s.goals {
                if !goals.insert(&g.id) {
                    return Err(TreeError::MalformedSnapshot(format!(
                        "duplicate goal id '{}' in structure '{}'",
                        g.id, s.id
                    )));
                }
            }
        }
        Ok(())
    }

    // === Commands ===

    /// Append a new structure; returns its id
    pub fn add_structure(&mut self, name: &str) -> Result<StructureId, TreeError> {
        let name = clean_name(name, "structure")?;
        let id = StructureId::new(self.fresh_id("s", |tree, id| {
            tree.structures.iter().any(|s| s.id.as_str() == id)
        }));

        self.structures.push(Structure::new(id.as_str(), &name));
        debug!("added structure {} ({})", id, name);
        Ok(id)
    }

    /// Append a goal to an existing structure; returns the goal id
    pub fn add_goal(&mut self, structure: &StructureId, name: &str) -> Result<GoalId, TreeError> {
        let name = clean_name(name, "goal")?;
        let index = self.index_of(structure)?;
        let id = GoalId::new(self.fresh_id("g", |tree, id| {
            tree.structures[index].goals.iter().any(|g| g.id.as_str() == id)
        }));

        self.structures[index].goals.push(Goal::new(id.as_str(), &name));
        debug!("added goal {} to {}", id, structure);
        Ok(id)
    }

    /// Flip a goal's completion; returns the new state
    pub fn toggle_goal(&mut self, structure: &StructureId, goal: &GoalId) -> Result<bool, TreeError> {
        let index = self.index_of(structure)?;
        let g = self.structures[index].goal_mut(goal).ok_or_else(|| TreeError::UnknownGoal {
            structure: structure.to_string(),
            goal: goal.to_string(),
        })?;
        g.complete = !g.complete;
        Ok(g.complete)
    }

    /// Flip a structure's collapsed flag; returns the new state
    pub fn toggle_collapsed(&mut self, structure: &StructureId) -> Result<bool, TreeError> {
        let index = self.index_of(structure)?;
        let s = &mut self.structures[index];
        s.collapsed = !s.collapsed;
        Ok(s.collapsed)
    }

    pub fn clear_all(&mut self) {
        debug!("clearing {} structures", self.structures.len());
        self.structures.clear();
    }

    // === Queries ===

    pub fn structure(&self, id: &StructureId) -> Option<&Structure> {
        self.structures.iter().find(|s| &s.id == id)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn goal_count(&self) -> usize {
        self.structures.iter().map(|s| s.goals.len()).sum()
    }

    pub fn completed_goal_count(&self) -> usize {
        self.structures.iter().map(|s| s.completed_count()).sum()
    }

    fn index_of(&self, id: &StructureId) -> Result<usize, TreeError> {
        self.structures
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| TreeError::UnknownStructure(id.to_string()))
    }

    fn fresh_id(&mut self, prefix: &str, taken: impl Fn(&Self, &str) -> bool) -> String {
        loop {
            self.next_id += 1;
            let candidate = format!("{}-{}", prefix, self.next_id);
            if !taken(self, &candidate) {
                return candidate;
            }
        }
    }
}

fn clean_name(name: &str, kind: &'static str) -> Result<String, TreeError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        warn!("rejected empty {} name", kind);
        return Err(TreeError::InvalidName { kind });
    }
    Ok(trimmed.to_string())
}
