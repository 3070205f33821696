//! Maximum flow in directed capacitated networks
//!
//! The crate is built bottom-up from two components:
//!
//! - [`FlowNetwork`]: a residual graph storing every physical edge as a
//!   forward/reverse pair in an edge arena, with capacity, flow and
//!   residual-capacity queries and a single flow-update path
//! - [`EdmondsKarp`]: the shortest-augmenting-path solver that repeatedly
//!   searches the residual graph breadth-first and saturates bottlenecks
//!
//! ```
//! use maxflow_core::{max_flow, FlowNetwork, NodeId};
//!
//! let mut network = FlowNetwork::from_edges(4, [(0, 1, 100), (1, 2, 5), (2, 3, 100)])?;
//! assert_eq!(max_flow(&mut network, NodeId(0), NodeId(3))?, 5);
//! # Ok::<(), maxflow_core::FlowError>(())
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod execution;
pub mod validation;

pub use crate::algorithm::{
    max_flow, Algorithm, AlgorithmComplexity, Capacity, EdmondsKarp, Flow, FlowError,
    FlowMetrics, FlowResult, MaxFlowResult, NodeId, SolverConfig,
};
pub use crate::data_structures::{EdgeId, FlowEdge, FlowNetwork, Route, RouteStatus};
pub use crate::execution::{Augmentation, AugmentationHistory};
pub use crate::validation::{FlowValidator, InvariantViolation, ValidationReport};
