//! Augmentation history for solver tracing
//!
//! Records every augmenting path the solver applies, in application order,
//! so that callers can inspect how the final flow was assembled.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Capacity, Flow, NodeId};

/// One applied augmenting path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Augmentation {
    /// Path vertices from source to sink
    pub path: Vec<NodeId>,
    /// Amount pushed along the path
    pub bottleneck: Capacity,
}

impl Augmentation {
    /// Number of edges on the path
    #[inline]
    pub fn len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered record of augmentations for one solve
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentationHistory {
    entries: Vec<Augmentation>,
}

impl AugmentationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: Vec<NodeId>, bottleneck: Capacity) {
        self.entries.push(Augmentation { path, bottleneck });
    }

    pub fn entries(&self) -> &[Augmentation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all recorded bottlenecks
    pub fn total_flow(&self) -> Flow {
        self.entries.iter().map(|entry| entry.bottleneck).sum()
    }

    /// Path lengths never decrease across Edmonds-Karp augmentations.
    pub fn is_monotone(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].len() <= pair[1].len())
    }
}
