//! Flow Correctness Verification
//!
//! Checks the structural invariants a residual network must satisfy after
//! any sequence of `apply_flow` calls or solver runs:
//!
//! - **Capacity bound**: `0 <= flow <= capacity` on forward edges
//! - **Reverse symmetry**: `flow(e) == -flow(reverse(e))`
//! - **Pair presence**: each edge's reverse runs the opposite way and sits
//!   in the adjacency list of the other endpoint
//! - **Conservation**: zero net flow at every node except the terminals
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::Serialize;
use thiserror::Error;

use crate::algorithm::traits::{Capacity, Flow, FlowResult, NodeId};
use crate::data_structures::flow_network::{EdgeId, FlowNetwork};

/// A single broken invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum InvariantViolation {
    #[error("Edge {edge} carries flow {flow} outside [0, {capacity}]")]
    CapacityBound {
        edge: EdgeId,
        flow: Flow,
        capacity: Capacity,
    },

    #[error("Edge {edge} has flow {flow} but its reverse {reverse} has {reverse_flow}")]
    ReverseSymmetry {
        edge: EdgeId,
        reverse: EdgeId,
        flow: Flow,
        reverse_flow: Flow,
    },

    #[error("Reverse pair of edge {edge} is not linked back correctly")]
    BrokenPair { edge: EdgeId },

    #[error("Node {node} has net flow {net_flow}")]
    Conservation { node: NodeId, net_flow: Flow },
}

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<InvariantViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Invariant checker for residual flow networks
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowValidator {
    terminals: Option<(NodeId, NodeId)>,
}

impl FlowValidator {
    /// Validator that checks conservation at every node
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator that exempts `source` and `sink` from conservation
    pub fn with_terminals(source: NodeId, sink: NodeId) -> Self {
        Self {
            terminals: Some((source, sink)),
        }
    }

    fn is_terminal(&self, node: NodeId) -> bool {
        matches!(self.terminals, Some((source, sink)) if node == source || node == sink)
    }

    /// Run every check and collect all violations
    pub fn validate(&self, network: &FlowNetwork) -> FlowResult<ValidationReport> {
        let mut report = ValidationReport::default();

        for (id, edge) in network.edges() {
            if id.is_forward() && !(0..=edge.capacity()).contains(&edge.flow()) {
                report.violations.push(InvariantViolation::CapacityBound {
                    edge: id,
                    flow: edge.flow(),
                    capacity: edge.capacity(),
                });
            }

            let reverse = network.edge(edge.reverse())?;
            if reverse.reverse() != id || reverse.from() != edge.to() || reverse.to() != edge.from() {
                report.violations.push(InvariantViolation::BrokenPair { edge: id });
            } else if reverse.flow() != -edge.flow() {
                report.violations.push(InvariantViolation::ReverseSymmetry {
                    edge: id,
                    reverse: edge.reverse(),
                    flow: edge.flow(),
                    reverse_flow: reverse.flow(),
                });
            }
        }

        for index in 0..network.node_count() {
            let node = NodeId(index);
            for (id, edge) in network.edges_from(node)? {
                let partner = edge.reverse();
                let listed = network
                    .edges_from(edge.to())?
                    .any(|(other, _)| other == partner);
                if edge.from() != node || !listed {
                    report.violations.push(InvariantViolation::BrokenPair { edge: id });
                }
            }

            if self.is_terminal(node) {
                continue;
            }
            let net_flow = network.net_flow(node)?;
            if net_flow != 0 {
                report
                    .violations
                    .push(InvariantViolation::Conservation { node, net_flow });
            }
        }

        Ok(report)
    }
}
