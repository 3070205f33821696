//! Core algorithm trait definitions for the flow workspace
//!
//! This module establishes the shared vocabulary of the solver layer: the
//! node identifier newtype, the capacity and flow scalar types, the error
//! taxonomy surfaced by every fallible operation, and the parameterised
//! `Algorithm` trait through which solvers expose their configuration.
//!
//! # Key Design Principles
//! - Node indices are dense and typed, never mixed with edge indices
//! - Every violation is reported synchronously as a typed `FlowError`
//! - Solver configuration is reachable both as a typed struct and as
//!   string parameters for command-line and file-driven front ends
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Flow capacity type. Signed so that negative input can be rejected
/// instead of wrapping.
pub type Capacity = i64;

/// Flow value type. Reverse edges carry the negation of their partner's flow.
pub type Flow = i64;

/// Node identifier ensuring type safety and preventing mixing with other numeric types
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error taxonomy for network construction, flow updates and solving
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Node index {index} out of range for network with {node_count} nodes")]
    OutOfRange { index: usize, node_count: usize },

    #[error("Edge id {index} out of range for network with {edge_slots} edge slots")]
    UnknownEdge { index: usize, edge_slots: usize },

    #[error("Negative capacity {capacity} on edge {from} -> {to}")]
    NegativeCapacity {
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
    },

    #[error("Augmentation loop exceeded its iteration limit of {limit}")]
    IterationLimitExceeded { limit: usize },

    #[error("Flow sum overflows the flow type while computing {context}")]
    FlowOverflow { context: &'static str },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// Convenience alias used throughout the crate
pub type FlowResult<T> = Result<T, FlowError>;

/// Algorithm complexity information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: &'static str,
    pub space_complexity: &'static str,
}

/// Parameterised algorithm interface shared by the solvers
pub trait Algorithm {
    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g., max_flow)
    fn category(&self) -> &'static str;

    /// Returns the algorithm's formal description
    fn description(&self) -> &'static str;

    /// Returns the algorithm's asymptotic complexity in Big-O notation
    fn complexity(&self) -> AlgorithmComplexity;

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, value: &str) -> FlowResult<()>;

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String>;

    /// Returns every supported parameter with its current value
    fn parameters(&self) -> HashMap<String, String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_type_safety() {
        let node1 = NodeId(42);
        let node2 = NodeId::from(42);
        let node3 = NodeId(43);

        assert_eq!(node1, node2);
        assert_ne!(node1, node3);
        assert_eq!(node1.as_usize(), 42);
        assert_eq!(node3.to_string(), "43");
    }

    #[test]
    fn test_error_messages() {
        let err = FlowError::OutOfRange { index: 7, node_count: 3 };
        assert_eq!(
            err.to_string(),
            "Node index 7 out of range for network with 3 nodes"
        );

        let err = FlowError::NegativeCapacity {
            from: NodeId(0),
            to: NodeId(1),
            capacity: -4,
        };
        assert_eq!(err.to_string(), "Negative capacity -4 on edge 0 -> 1");

        let err = FlowError::FlowOverflow { context: "total flow" };
        assert_eq!(
            err.to_string(),
            "Flow sum overflows the flow type while computing total flow"
        );
    }
}
