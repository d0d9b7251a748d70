//! Sweep-set conductance minimisation.
//!
//! Given a vector over vertices, the sweep sorts its support by decreasing
//! value and scans the nested prefix sets `S_1 ⊂ S_2 ⊂ ...`, returning the one
//! with the smallest conductance
//!
//! ```text
//! phi(S) = cut(S, V \ S) / min(vol(S), vol(V \ S))
//! ```
//!
//! Cut and volume are updated incrementally from [`LocalGraph`] degree and
//! neighbour queries, so the cost is proportional to the total degree of the
//! support and the graph is never materialised.
//!
//! When the graph does not report its total volume
//! ([`LocalGraph::known_volume`] is `None`) the denominator is `vol(S)` alone.
//! That is only accurate while `vol(S) <= vol(V) / 2`, which is the regime of
//! small local clusters that the sweep is meant for.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, warn};

use crate::traits::LocalGraph;
use crate::types::SparseVector;

/// Incremental cut/volume bookkeeping for a growing vertex set.
#[derive(Debug, Default)]
struct CutTracker {
    members: HashSet<usize>,
    cut: f64,
    volume: f64,
}

impl CutTracker {
    /// Add `v` to the set, updating the cut and volume.
    fn insert<G: LocalGraph + ?Sized>(&mut self, graph: &G, v: usize) {
        if !self.members.insert(v) {
            return;
        }
        let degree = graph.degree(v);
        let mut self_loop = 0.0f64;
        let mut into_set = 0.0f64;
        for edge in graph.neighbors(v) {
            if edge.v == v {
                self_loop += edge.weight;
            } else if self.members.contains(&edge.v) {
                into_set += edge.weight;
            }
        }
        // Edges from v to the set stop crossing; its other edges start to.
        self.cut += degree - self_loop - 2.0 * into_set;
        self.volume += degree;
    }

    /// Conductance of the current set, `None` when the denominator is zero.
    fn conductance(&self, total_volume: Option<f64>) -> Option<f64> {
        let denominator = match total_volume {
            Some(total) => self.volume.min(total - self.volume),
            None => self.volume,
        };
        (denominator > 0.0).then(|| self.cut.max(0.0) / denominator)
    }
}

/// Find the sweep set of `vec` with minimum conductance.
///
/// The support of `vec` (its non-zero entries) is sorted by decreasing value,
/// breaking ties by ascending vertex id, and the prefix with the smallest
/// conductance is returned as a sorted list of vertex ids. When several
/// prefixes share the minimum, the smallest one wins.
///
/// `vec` is used as given; callers that want degree-normalised sweeps divide
/// by the degree first.
///
/// Prefixes whose denominator is zero (no volume, or no volume left outside)
/// are skipped. If no prefix has a defined conductance the first prefix is
/// returned; an empty support returns an empty set.
///
/// # Example
///
/// ```rust
/// use ruvector_spectral::graph::cycle_graph;
/// use ruvector_spectral::sweep::sweep_set_conductance;
/// use ruvector_spectral::types::SparseVector;
///
/// let graph = cycle_graph(8);
/// let vec = SparseVector::from_pairs(vec![(0, 0.4), (1, 0.3), (2, 0.2), (3, 0.1)]);
/// assert_eq!(sweep_set_conductance(&graph, &vec), vec![0, 1, 2, 3]);
/// ```
pub fn sweep_set_conductance<G: LocalGraph + ?Sized>(graph: &G, vec: &SparseVector) -> Vec<usize> {
    let mut order: Vec<(usize, f64)> = vec.iter().filter(|(_, value)| *value != 0.0).collect();
    if order.is_empty() {
        return Vec::new();
    }
    order.sort_by(|a, b| descending(a.1, b.1).then_with(|| a.0.cmp(&b.0)));

    let total_volume = graph.known_volume();
    let mut tracker = CutTracker::default();
    let mut best: Option<(usize, f64)> = None;

    for (i, &(v, _)) in order.iter().enumerate() {
        tracker.insert(graph, v);
        if let Some(phi) = tracker.conductance(total_volume) {
            // Strict comparison keeps the earliest prefix on ties.
            if best.map_or(true, |(_, best_phi)| phi < best_phi) {
                best = Some((i + 1, phi));
            }
        }
    }

    if let Some(total) = total_volume {
        if tracker.volume > total / 2.0 {
            warn!(
                support_volume = tracker.volume,
                total_volume = total,
                "sweep support exceeds half the graph volume; the cluster may not be local"
            );
        }
    }

    let (prefix, phi) = match best {
        Some((prefix, phi)) => (prefix, Some(phi)),
        None => (1, None),
    };
    debug!(prefix, support = order.len(), ?phi, "sweep set selected");

    let mut cluster: Vec<usize> = order[..prefix].iter().map(|&(v, _)| v).collect();
    cluster.sort_unstable();
    cluster
}

/// Conductance of an arbitrary vertex set, or `None` when its denominator is
/// zero.
///
/// Uses the same denominator rule as [`sweep_set_conductance`]. Duplicate ids
/// are counted once.
pub fn conductance<G: LocalGraph + ?Sized>(graph: &G, set: &[usize]) -> Option<f64> {
    let mut tracker = CutTracker::default();
    for &v in set {
        tracker.insert(graph, v);
    }
    tracker.conductance(graph.known_volume())
}

/// Order for sorting values from largest to smallest.
#[inline]
fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
