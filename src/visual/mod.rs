//! Visual evaluation for rendered frames
//!
//! Lets tests (and the host page) check drawn output programmatically.

pub mod metrics;

pub use metrics::{analyze_frame, FrameMetrics, InkBounds, VisualAnalyzer};
