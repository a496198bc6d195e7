//! Animation module for edge growth
//!
//! Newly visible edges grow from their source node toward their target with
//! an ease-out curve; children wait in an explicit worklist until their
//! parent edge has had time to appear.

mod growth_set;
mod easing;

pub use growth_set::{GrowthParams, GrowthSet, Segment};
pub use easing::{Easing, ease};
