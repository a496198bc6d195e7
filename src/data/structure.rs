use std::fmt;
use serde::{Deserialize, Serialize};

/// Identifier of a structure (a branch of the tree)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureId(pub String);

/// Identifier of a goal, unique within its structure
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(pub String);

impl StructureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl GoalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A leaf item with a binary completion state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    #[serde(default)]
    pub complete: bool,
}

impl Goal {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: GoalId::new(id),
            name: name.to_string(),
            complete: false,
        }
    }

    pub fn completed(mut self) -> Self {
        self.complete = true;
        self
    }
}

/// A top-level category, rendered as a branch.
///
/// `goals` keeps insertion order; layout stacks leaves in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: StructureId,
    pub name: String,
    /// Hides goals from layout without deleting them
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Structure {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: StructureId::new(id),
            name: name.to_string(),
            collapsed: false,
            goals: Vec::new(),
        }
    }

    pub fn with_goals(mut self, goals: Vec<Goal>) -> Self {
        self.goals = goals;
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn goal(&self, id: &GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| &g.id == id)
    }

    pub fn goal_mut(&mut self, id: &GoalId) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| &g.id == id)
    }

    /// Goals that layout will place (none while collapsed)
    pub fn visible_goals(&self) -> &[Goal] {
        if self.collapsed {
            &[]
        } else {
            &self.goals
        }
    }

    pub fn completed_count(&self) -> usize {
        self.goals.iter().filter(|g| g.complete).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_builder() {
        let s = Structure::new("s1", "Health")
            .with_goals(vec![Goal::new("g1", "Sleep 8h"), Goal::new("g2", "Run").completed()]);

        assert_eq!(s.goals.len(), 2);
        assert_eq!(s.completed_count(), 1);
        assert!(s.goal(&GoalId::new("g2")).unwrap().complete);
        assert!(s.goal(&GoalId::new("missing")).is_none());
    }

    #[test]
    fn test_collapsed_hides_goals() {
        let s = Structure::new("s1", "Health")
            .with_goals(vec![Goal::new("g1", "Sleep 8h")])
            .with_collapsed(true);

        assert!(s.visible_goals().is_empty());
        // Collapsing never removes goals
        assert_eq!(s.goals.len(), 1);
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let goal = Goal::new("g1", "Read");
        let json = serde_json::to_string(&goal).unwrap();
        assert_eq!(json, r#"{"id":"g1","name":"Read","complete":false}"#);
    }

    #[test]
    fn test_missing_flags_default_false() {
        let s: Structure = serde_json::from_str(r#"{"id":"a","name":"Work"}"#).unwrap();
        assert!(!s.collapsed);
        assert!(s.goals.is_empty());
    }
}
