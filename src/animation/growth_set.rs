//! Growth animation set
//!
//! Tracks edges that are still growing. Each live segment carries a
//! progress value advanced once per frame tick; saturated segments are pruned
//! and the edge is drawn solid from the layout from then on. Edges that must
//! wait for a parent (leaves of a brand new branch) sit in a pending
//! worklist with a tick countdown instead of scheduling themselves.

use std::collections::{HashMap, VecDeque};
use serde::{Deserialize, Serialize};
use super::easing::{Easing, ease};
use crate::layout::{ColorClass, Edge, EdgeKey};
use crate::math::Vec2;

/// Parameters controlling growth speed and staggering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParams {
    /// Progress added per tick (one tick = 1/60 s)
    pub growth_rate: f32,
    /// Ticks a child edge waits per generation
    pub generation_delay: f32,
    /// Easing applied to progress when placing the visible tip
    pub easing: Easing,
    /// Live segments beyond this complete instantly, oldest first
    pub max_live: usize,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            growth_rate: 0.035,      // ~half a second per edge
            generation_delay: 18.0,  // leaves sprout once the branch is mostly out
            easing: Easing::EaseOut,
            max_live: 512,
        }
    }
}

impl GrowthParams {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.growth_rate > 0.0 && self.growth_rate <= 1.0) {
            return Err("growth.growth_rate must be in (0, 1]".to_string());
        }
        if !(self.generation_delay.is_finite() && self.generation_delay >= 0.0) {
            return Err("growth.generation_delay must be non-negative".to_string());
        }
        if self.max_live == 0 {
            return Err("growth.max_live must be positive".to_string());
        }
        Ok(())
    }
}

/// An edge in the middle of its growth animation
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub key: EdgeKey,
    pub from: Vec2,
    pub to: Vec2,
    pub color: ColorClass,
    /// 0.0 = not started, 1.0 = fully grown
    pub progress: f32,
}

impl Segment {
    fn start(edge: Edge) -> Self {
        Self {
            key: edge.key,
            from: edge.from,
            to: edge.to,
            color: edge.color,
            progress: 0.0,
        }
    }

    pub fn is_grown(&self) -> bool {
        self.progress >= 1.0
    }

    /// Current visible end of the edge
    pub fn tip(&self, easing: Easing) -> Vec2 {
        self.from.lerp(&self.to, ease(self.progress, easing))
    }
}

#[derive(Debug, Clone)]
struct Pending {
    edge: Edge,
    delay: f32,
    /// Reported by `tick_pending` when it starts
    announce: bool,
}

/// Live growth segments plus the worklist of edges waiting to start
#[derive(Debug, Clone, Default)]
pub struct GrowthSet {
    params: GrowthParams,
    live: Vec<Segment>,
    pending: VecDeque<Pending>,
}

impl GrowthSet {
    pub fn new(params: GrowthParams) -> Self {
        Self {
            params,
            live: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    pub fn set_params(&mut self, params: GrowthParams) {
        self.params = params;
        self.enforce_live_cap();
    }

    /// Start growing an edge now, at progress 0.
    ///
    /// An edge that is already growing or waiting restarts instead of being
    /// tracked twice.
    pub fn enqueue(&mut self, edge: Edge) {
        self.pending.retain(|p| p.edge.key != edge.key);
        if let Some(seg) = self.live.iter_mut().find(|s| s.key == edge.key) {
            *seg = Segment::start(edge);
            return;
        }
        self.live.push(Segment::start(edge));
        self.enforce_live_cap();
    }

    /// Start growing an edge after `delay` ticks
    pub fn enqueue_after(&mut self, edge: Edge, delay: f32) {
        self.push_pending(edge, delay, true);
    }

    /// Like `enqueue_after`, but `tick_pending` starts the edge silently
    pub fn enqueue_after_quietly(&mut self, edge: Edge, delay: f32) {
        self.push_pending(edge, delay, false);
    }

    fn push_pending(&mut self, edge: Edge, delay: f32, announce: bool) {
        if !(delay > 0.0) {
            self.enqueue(edge);
            return;
        }
        self.live.retain(|s| s.key != edge.key);
        if let Some(p) = self.pending.iter_mut().find(|p| p.edge.key == edge.key) {
            p.edge = edge;
            p.delay = delay;
            p.announce = announce;
            return;
        }
        self.pending.push_back(Pending { edge, delay, announce });
    }

    /// Count down pending edges; those that are due become live segments.
    ///
    /// Returns the newly started segments so the caller can mark their birth;
    /// edges queued quietly start without being reported.
    pub fn tick_pending(&mut self, ticks: f32) -> Vec<Segment> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let ticks = ticks.max(0.0);
        let mut waiting = VecDeque::with_capacity(self.pending.len());
        let mut announced = Vec::new();

        for mut p in self.pending.drain(..) {
            p.delay -= ticks;
            if p.delay > 0.0 {
                waiting.push_back(p);
                continue;
            }
            let seg = Segment::start(p.edge);
            if p.announce {
                announced.push(seg.clone());
            }
            self.live.push(seg);
        }
        self.pending = waiting;
        self.enforce_live_cap();
        announced
    }

    /// Advance every live segment by `growth_rate * ticks`, saturating at 1
    pub fn advance(&mut self, ticks: f32) {
        let step = self.params.growth_rate * ticks.max(0.0);
        for seg in &mut self.live {
            seg.progress = (seg.progress + step).clamp(0.0, 1.0);
        }
    }

    /// Drop segments that reached full growth; returns how many were removed
    pub fn prune_grown(&mut self) -> usize {
        let before = self.live.len();
        self.live.retain(|s| !s.is_grown());
        before - self.live.len()
    }

    /// Follow layout changes: same edge, new coordinates.
    ///
    /// Segments whose edge is no longer visible (collapsed or cleared while
    /// growing) are dropped.
    pub fn retarget(&mut self, edges: &[Edge]) {
        if self.live.is_empty() && self.pending.is_empty() {
            return;
        }
        let by_key: HashMap<&EdgeKey, &Edge> = edges.iter().map(|e| (&e.key, e)).collect();

        self.live.retain_mut(|seg| match by_key.get(&seg.key) {
            Some(edge) => {
                seg.from = edge.from;
                seg.to = edge.to;
                seg.color = edge.color;
                true
            }
            None => false,
        });
        self.pending.retain_mut(|p| match by_key.get(&p.edge.key) {
            Some(edge) => {
                p.edge = (*edge).clone();
                true
            }
            None => false,
        });
    }

    /// Progress of an edge: live progress, 0 while pending, `None` when grown
    pub fn progress_of(&self, key: &EdgeKey) -> Option<f32> {
        if let Some(seg) = self.live.iter().find(|s| &s.key == key) {
            return Some(seg.progress);
        }
        self.pending.iter().find(|p| &p.edge.key == key).map(|_| 0.0)
    }

    /// Per-frame lookup of every tracked edge's progress
    pub fn progress_index(&self) -> HashMap<&EdgeKey, f32> {
        let mut index = HashMap::with_capacity(self.live.len() + self.pending.len());
        for p in &self.pending {
            index.insert(&p.edge.key, 0.0);
        }
        for seg in &self.live {
            index.insert(&seg.key, seg.progress);
        }
        index
    }

    /// Eased fraction of an edge's length that is visible
    pub fn visible_fraction(&self, progress: f32) -> f32 {
        ease(progress, self.params.easing)
    }

    /// Jump every tracked edge to full growth
    pub fn complete_all(&mut self) {
        for p in self.pending.drain(..) {
            self.live.push(Segment::start(p.edge));
        }
        for seg in &mut self.live {
            seg.progress = 1.0;
        }
    }

    /// Cancel all growth; affected edges are drawn solid
    pub fn clear(&mut self) {
        self.live.clear();
        self.pending.clear();
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.live.iter()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.live.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.pending.is_empty()
    }

    fn enforce_live_cap(&mut self) {
        let max = self.params.max_live.max(1);
        if self.live.len() > max {
            let excess = self.live.len() - max;
            self.live.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{GoalId, StructureId};

    fn trunk_edge(id: &str, x: f32) -> Edge {
        Edge {
            key: EdgeKey::Trunk(StructureId::new(id)),
            from: Vec2::new(400.0, 40.0),
            to: Vec2::new(x, 120.0),
            color: ColorClass::Branch,
        }
    }

    fn leaf_edge(sid: &str, gid: &str) -> Edge {
        Edge {
            key: EdgeKey::Leaf(StructureId::new(sid), GoalId::new(gid)),
            from: Vec2::new(400.0, 120.0),
            to: Vec2::new(400.0, 270.0),
            color: ColorClass::LeafDim,
        }
    }

    fn params(rate: f32) -> GrowthParams {
        GrowthParams {
            growth_rate: rate,
            ..Default::default()
        }
    }

    #[test]
    fn test_enqueue_starts_at_zero() {
        let mut set = GrowthSet::new(GrowthParams::default());
        set.enqueue(trunk_edge("a", 200.0));

        assert_eq!(set.live_count(), 1);
        assert_eq!(set.segments().next().unwrap().progress, 0.0);
    }

    #[test]
    fn test_progress_monotonic_and_saturates() {
        let mut set = GrowthSet::new(params(0.3));
        set.enqueue(trunk_edge("a", 200.0));

        let mut prev = 0.0;
        for _ in 0..10 {
            set.advance(1.0);
            let p = set.segments().next().unwrap().progress;
            assert!(p >= prev);
            assert!(p <= 1.0);
            prev = p;
        }
        assert_eq!(prev, 1.0);
    }

    #[test]
    fn test_prune_after_full_growth() {
        let mut set = GrowthSet::new(params(0.5));
        set.enqueue(trunk_edge("a", 200.0));
        set.enqueue(trunk_edge("b", 600.0));

        set.advance(1.0);
        assert_eq!(set.prune_grown(), 0);
        set.advance(1.0);
        assert_eq!(set.prune_grown(), 2);
        assert!(set.is_empty());
    }

    #[test]
    fn test_enqueue_same_key_restarts() {
        let mut set = GrowthSet::new(params(0.25));
        set.enqueue(trunk_edge("a", 200.0));
        set.advance(2.0);
        set.enqueue(trunk_edge("a", 200.0));

        assert_eq!(set.live_count(), 1);
        assert_eq!(set.progress_of(&EdgeKey::Trunk(StructureId::new("a"))), Some(0.0));
    }

    #[test]
    fn test_pending_waits_for_delay() {
        let mut set = GrowthSet::new(GrowthParams::default());
        set.enqueue_after(leaf_edge("a", "g"), 10.0);
        let key = EdgeKey::Leaf(StructureId::new("a"), GoalId::new("g"));

        assert_eq!(set.pending_count(), 1);
        assert_eq!(set.progress_of(&key), Some(0.0));

        assert!(set.tick_pending(4.0).is_empty());
        let started = set.tick_pending(6.0);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].key, key);
        assert_eq!(set.pending_count(), 0);
        assert_eq!(set.live_count(), 1);
    }

    #[test]
    fn test_quiet_pending_starts_unreported() {
        let mut set = GrowthSet::new(GrowthParams::default());
        set.enqueue_after_quietly(leaf_edge("a", "g"), 5.0);
        set.enqueue_after(leaf_edge("a", "h"), 5.0);

        let started = set.tick_pending(5.0);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].key, EdgeKey::Leaf(StructureId::new("a"), GoalId::new("h")));
        assert_eq!(set.live_count(), 2);
        assert_eq!(set.pending_count(), 0);
    }

    #[test]
    fn test_zero_delay_enqueues_immediately() {
        let mut set = GrowthSet::new(GrowthParams::default());
        set.enqueue_after(leaf_edge("a", "g"), 0.0);
        assert_eq!(set.live_count(), 1);
        assert_eq!(set.pending_count(), 0);
    }

    #[test]
    fn test_retarget_moves_and_drops() {
        let mut set = GrowthSet::new(GrowthParams::default());
        set.enqueue(trunk_edge("a", 200.0));
        set.enqueue(trunk_edge("b", 600.0));
        set.enqueue_after(leaf_edge("b", "g"), 5.0);

        // "a" moved, "b" and its leaf vanished
        set.retarget(&[trunk_edge("a", 250.0)]);

        assert_eq!(set.live_count(), 1);
        assert_eq!(set.pending_count(), 0);
        assert_eq!(set.segments().next().unwrap().to, Vec2::new(250.0, 120.0));
    }

    #[test]
    fn test_retarget_keeps_progress() {
        let mut set = GrowthSet::new(params(0.2));
        set.enqueue(trunk_edge("a", 200.0));
        set.advance(2.0);
        set.retarget(&[trunk_edge("a", 300.0)]);

        let p = set.segments().next().unwrap().progress;
        assert!((p - 0.4).abs() < 0.0001);
    }

    #[test]
    fn test_progress_of_grown_edge_is_none() {
        let mut set = GrowthSet::new(params(1.0));
        set.enqueue(trunk_edge("a", 200.0));
        set.advance(1.0);
        set.prune_grown();
        assert_eq!(set.progress_of(&EdgeKey::Trunk(StructureId::new("a"))), None);
    }

    #[test]
    fn test_complete_all() {
        let mut set = GrowthSet::new(GrowthParams::default());
        set.enqueue(trunk_edge("a", 200.0));
        set.enqueue_after(leaf_edge("a", "g"), 30.0);
        set.complete_all();

        assert_eq!(set.pending_count(), 0);
        assert!(set.segments().all(|s| s.progress == 1.0));
        assert_eq!(set.prune_grown(), 2);
    }

    #[test]
    fn test_live_cap_completes_oldest() {
        let mut set = GrowthSet::new(GrowthParams {
            max_live: 2,
            ..Default::default()
        });
        set.enqueue(trunk_edge("a", 100.0));
        set.enqueue(trunk_edge("b", 200.0));
        set.enqueue(trunk_edge("c", 300.0));

        assert_eq!(set.live_count(), 2);
        assert_eq!(set.progress_of(&EdgeKey::Trunk(StructureId::new("a"))), None);
    }

    #[test]
    fn test_tip_uses_ease_out() {
        let mut set = GrowthSet::new(params(0.5));
        set.enqueue(leaf_edge("a", "g"));
        set.advance(1.0);

        let seg = set.segments().next().unwrap();
        // ease_out(0.5) = 0.75 of the 150px edge
        assert!((seg.tip(Easing::EaseOut).y - 232.5).abs() < 0.001);
    }

    #[test]
    fn test_clear_cancels_everything() {
        let mut set = GrowthSet::new(GrowthParams::default());
        set.enqueue(trunk_edge("a", 100.0));
        set.enqueue_after(leaf_edge("a", "g"), 10.0);
        set.clear();
        assert!(set.is_empty());
        assert!(set.tick_pending(100.0).is_empty());
    }

    #[test]
    fn test_params_validation() {
        assert!(GrowthParams::default().validate().is_ok());
        assert!(params(0.0).validate().is_err());
        assert!(params(1.5).validate().is_err());
    }
}
