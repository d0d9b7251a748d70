//! ACL local clustering.
//!
//! Finds a low-conductance cluster around a seed vertex without looking at
//! the whole graph:
//!
//! 1. approximate personalized PageRank from a one-hot seed, with
//!    `alpha = locality` and `epsilon = error`;
//! 2. divide each estimate entry by the degree of its vertex;
//! 3. sweep the normalised vector and keep the prefix of minimum conductance.
//!
//! Every step talks to the graph through [`LocalGraph`], so the work is
//! proportional to the size of the cluster found.

use tracing::{debug, instrument};

use crate::error::SpectralError;
use crate::pagerank::ApproxPageRankSolver;
use crate::sweep::sweep_set_conductance;
use crate::traits::LocalGraph;
use crate::types::{AclConfig, SparseVector};
use crate::validation::validate_positive;

/// ACL local clusterer configured by an [`AclConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AclClusterer {
    config: AclConfig,
}

impl AclClusterer {
    /// Create a clusterer with the given configuration.
    pub fn new(config: AclConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &AclConfig {
        &self.config
    }

    /// Find a local cluster containing vertices around `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterOutOfRange`](crate::error::ValidationError)
    /// if `locality` is outside `(0, 1]` or `error` is not positive.
    #[instrument(skip(self, graph), fields(locality = self.config.locality, error = self.config.error))]
    pub fn cluster<G: LocalGraph + ?Sized>(
        &self,
        graph: &G,
        seed: usize,
    ) -> Result<Vec<usize>, SpectralError> {
        let apr = ApproxPageRankSolver::new(self.config.locality, self.config.error)
            .compute_from_vertex(graph, seed)?;

        let normalised: SparseVector = apr
            .estimate
            .iter()
            .map(|(v, value)| {
                let degree = graph.degree(v);
                if degree > 0.0 {
                    (v, value / degree)
                } else {
                    (v, value)
                }
            })
            .collect();

        let cluster = sweep_set_conductance(graph, &normalised);
        debug!(
            pushes = apr.pushes,
            support = normalised.len(),
            cluster_size = cluster.len(),
            "local cluster found"
        );
        Ok(cluster)
    }
}

/// Find a local cluster around `seed` with the ACL algorithm.
///
/// `locality` is the PageRank teleport probability, in `(0, 1]`: larger
/// values keep the cluster closer to the seed, and `1.0` returns the seed
/// alone. `error` is the push threshold per unit degree.
///
/// # Errors
///
/// Same as [`AclClusterer::cluster`].
///
/// # Example
///
/// ```rust
/// use ruvector_spectral::cluster::local_cluster_acl;
/// use ruvector_spectral::graph::cycle_graph;
///
/// let graph = cycle_graph(20);
/// let cluster = local_cluster_acl(&graph, 0, 0.5, 0.001).unwrap();
/// assert!(cluster.contains(&0));
/// ```
pub fn local_cluster_acl<G: LocalGraph + ?Sized>(
    graph: &G,
    seed: usize,
    locality: f64,
    error: f64,
) -> Result<Vec<usize>, SpectralError> {
    AclClusterer::new(AclConfig::new(locality).with_error(error)).cluster(graph, seed)
}

/// Find a local cluster around `seed` sized for roughly `target_volume`.
///
/// Runs [`local_cluster_acl`] with `locality = error = min(1, 1 / target_volume)`.
///
/// # Errors
///
/// Returns [`ValidationError::ParameterOutOfRange`](crate::error::ValidationError)
/// if `target_volume` is not positive and finite.
pub fn local_cluster<G: LocalGraph + ?Sized>(
    graph: &G,
    seed: usize,
    target_volume: f64,
) -> Result<Vec<usize>, SpectralError> {
    validate_positive("target_volume", target_volume)?;
    let locality = (1.0 / target_volume).min(1.0);
    local_cluster_acl(graph, seed, locality, locality)
}
