pub mod error;
pub mod structure;
pub mod life_tree;

pub use error::TreeError;
pub use structure::{Goal, GoalId, Structure, StructureId};
pub use life_tree::LifeTree;
