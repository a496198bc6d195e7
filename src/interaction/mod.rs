pub mod picking;

pub use picking::{Hit, HitInfo, NodePicker};
