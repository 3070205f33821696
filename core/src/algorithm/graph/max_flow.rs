//! Edmonds-Karp Maximum Flow Implementation
//!
//! This module implements the Edmonds-Karp specialisation of Ford-Fulkerson:
//! every augmenting path is found by breadth-first search over edges with
//! positive residual capacity, so each path is a shortest one in edge count.
//!
//! # Theoretical Foundation
//!
//! Shortest augmenting paths make the BFS distance of every vertex from the
//! source non-decreasing across augmentations. Each augmentation saturates at
//! least one critical edge, and an edge can become critical at most `V/2`
//! times, which bounds the number of augmentations by `O(VE)` and the total
//! running time by `O(VE²)` independently of capacity values.
//!
//! ## Loop Structure
//!
//! 1. **Search**: BFS from the source, adjacency order, FIFO frontier,
//!    stopping as soon as the sink is discovered
//! 2. **Bottleneck**: minimum residual capacity along the parent chain
//! 3. **Augment**: `apply_flow` on every edge of the chain
//! 4. **Accumulate**: add the bottleneck to the running total
//!
//! The `O(VE)` bound doubles as an iteration guard; exceeding it can only
//! mean corrupted residual state and aborts the solve.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use log::{debug, error, info, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, Capacity, Flow, FlowError, FlowResult, NodeId,
};
use crate::data_structures::flow_network::{EdgeId, FlowNetwork};
use crate::execution::history::AugmentationHistory;

/// Solver configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Overrides the derived `V * E + 1` augmentation guard
    pub max_iterations: Option<usize>,
    /// Keep every applied augmenting path in the result
    pub record_history: bool,
}

/// Flow algorithm performance metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Number of augmenting paths applied
    pub augmentations: usize,
    /// Vertices discovered over all breadth-first searches
    pub nodes_visited: usize,
    /// Algorithm execution time
    pub execution_time_ms: f64,
}

/// Maximum flow result with detailed flow information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxFlowResult {
    /// Flow pushed from source to sink by this solve
    pub max_flow: Flow,
    /// Source side of a minimum cut: vertices still reachable in the residual graph
    pub min_cut: Vec<NodeId>,
    /// Algorithm performance metrics
    pub metrics: FlowMetrics,
    /// Applied augmenting paths, when recording was requested
    pub history: Option<AugmentationHistory>,
}

/// Edmonds-Karp maximum flow solver
#[derive(Debug, Clone, Default)]
pub struct EdmondsKarp {
    config: SolverConfig,
}

impl EdmondsKarp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Upper bound on augmentations for one solve over `network`
    pub fn iteration_limit(&self, network: &FlowNetwork) -> usize {
        self.config.max_iterations.unwrap_or_else(|| {
            network
                .node_count()
                .saturating_mul(network.edge_count())
                .saturating_add(1)
        })
    }

    /// Push as much flow as possible from `source` to `sink`.
    ///
    /// The network is mutated in place. A second call on the same network
    /// continues from the residual state left by the first and returns only
    /// the additional flow it pushed.
    pub fn solve(
        &self,
        network: &mut FlowNetwork,
        source: NodeId,
        sink: NodeId,
    ) -> FlowResult<MaxFlowResult> {
        network.check_node(source)?;
        network.check_node(sink)?;
        if source == sink {
            return Err(FlowError::InvalidArgument(format!(
                "source and sink must differ (both are {})",
                source
            )));
        }

        let start = Instant::now();
        let limit = self.iteration_limit(network);
        let mut history = self.config.record_history.then(AugmentationHistory::new);
        let mut metrics = FlowMetrics::default();
        let mut total_flow: Flow = 0;

        while let Some(path) = find_augmenting_path(network, source, sink, &mut metrics)? {
            if metrics.augmentations == limit {
                error!(
                    "Edmonds-Karp exceeded {} augmentations between {} and {}",
                    limit, source, sink
                );
                return Err(FlowError::IterationLimitExceeded { limit });
            }

            let bottleneck = bottleneck(network, &path)?;
            // Checked before any edge is touched so a failure leaves no partial augmentation
            let Some(next_total) = total_flow.checked_add(bottleneck) else {
                error!(
                    "total flow {} + {} overflows between {} and {}",
                    total_flow, bottleneck, source, sink
                );
                return Err(FlowError::FlowOverflow { context: "total flow" });
            };
            for &id in &path {
                network.apply_flow(id, bottleneck)?;
            }

            total_flow = next_total;
            metrics.augmentations += 1;
            debug!(
                "augmentation {}: {} edges, bottleneck {}, total {}",
                metrics.augmentations,
                path.len(),
                bottleneck,
                total_flow
            );

            if let Some(history) = history.as_mut() {
                history.record(path_vertices(network, source, &path)?, bottleneck);
            }
        }

        let min_cut = network.residual_reachable(source)?;
        metrics.execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            "max flow {} -> {} = {} after {} augmentations in {:.3} ms",
            source, sink, total_flow, metrics.augmentations, metrics.execution_time_ms
        );

        Ok(MaxFlowResult {
            max_flow: total_flow,
            min_cut,
            metrics,
            history,
        })
    }
}

/// Compute the maximum flow value with the default solver configuration
pub fn max_flow(network: &mut FlowNetwork, source: NodeId, sink: NodeId) -> FlowResult<Flow> {
    EdmondsKarp::new()
        .solve(network, source, sink)
        .map(|result| result.max_flow)
}

/// Breadth-first search for a shortest augmenting path.
///
/// Returns the path's edges in source-to-sink order, or `None` once the sink
/// is unreachable through positive residual capacity.
fn find_augmenting_path(
    network: &FlowNetwork,
    source: NodeId,
    sink: NodeId,
    metrics: &mut FlowMetrics,
) -> FlowResult<Option<Vec<EdgeId>>> {
    let mut parent: Vec<Option<EdgeId>> = vec![None; network.node_count()];
    let mut visited = vec![false; network.node_count()];
    let mut queue = VecDeque::from([source]);
    visited[source.as_usize()] = true;

    'search: while let Some(node) = queue.pop_front() {
        for (id, edge) in network.edges_from(node)? {
            let next = edge.to();
            if edge.residual_capacity() > 0 && !visited[next.as_usize()] {
                visited[next.as_usize()] = true;
                parent[next.as_usize()] = Some(id);
                metrics.nodes_visited += 1;
                trace!("discovered {} via {}", next, id);

                if next == sink {
                    break 'search;
                }
                queue.push_back(next);
            }
        }
    }

    if !visited[sink.as_usize()] {
        return Ok(None);
    }

    let mut path = Vec::new();
    let mut node = sink;
    while node != source {
        let Some(id) = parent[node.as_usize()] else {
            return Ok(None);
        };
        path.push(id);
        node = network.edge(id)?.from();
    }
    path.reverse();
    Ok(Some(path))
}

/// Minimum residual capacity along `path`
fn bottleneck(network: &FlowNetwork, path: &[EdgeId]) -> FlowResult<Capacity> {
    let mut bottleneck = Capacity::MAX;
    for &id in path {
        bottleneck = bottleneck.min(network.residual_capacity(id)?);
    }
    Ok(bottleneck)
}

fn path_vertices(network: &FlowNetwork, source: NodeId, path: &[EdgeId]) -> FlowResult<Vec<NodeId>> {
    let mut vertices = Vec::with_capacity(path.len() + 1);
    vertices.push(source);
    for &id in path {
        vertices.push(network.edge(id)?.to());
    }
    Ok(vertices)
}

impl Algorithm for EdmondsKarp {
    fn name(&self) -> &'static str {
        "Edmonds-Karp"
    }

    fn category(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> &'static str {
        "Maximum flow by repeated shortest augmenting paths found with breadth-first search over the residual graph."
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(VE²)",
            space_complexity: "O(V + E)",
        }
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> FlowResult<()> {
        match name {
            "max_iterations" => {
                if value == "auto" {
                    self.config.max_iterations = None;
                    return Ok(());
                }
                let limit = value.parse::<usize>().map_err(|_| FlowError::InvalidParameter {
                    name: name.to_string(),
                    reason: "must be a non-negative integer or \"auto\"".to_string(),
                })?;
                self.config.max_iterations = Some(limit);
                Ok(())
            }
            "record_history" => {
                self.config.record_history =
                    value.parse::<bool>().map_err(|_| FlowError::InvalidParameter {
                        name: name.to_string(),
                        reason: "must be true or false".to_string(),
                    })?;
                Ok(())
            }
            _ => Err(FlowError::InvalidParameter {
                name: name.to_string(),
                reason: "unknown parameter".to_string(),
            }),
        }
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        match name {
            "max_iterations" => Some(
                self.config
                    .max_iterations
                    .map_or_else(|| "auto".to_string(), |limit| limit.to_string()),
            ),
            "record_history" => Some(self.config.record_history.to_string()),
            _ => None,
        }
    }

    fn parameters(&self) -> HashMap<String, String> {
        ["max_iterations", "record_history"]
            .into_iter()
            .filter_map(|name| Some((name.to_string(), self.get_parameter(name)?)))
            .collect()
    }
}
