//! JSON reports for solved networks and timing runs
//!
//! The route report classifies every physical route by utilisation so a
//! renderer can distinguish saturated bottlenecks from partially used and
//! idle routes without re-deriving anything from the residual graph.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use log::info;
use maxflow_core::{Flow, FlowNetwork, MaxFlowResult, NodeId, Route, RouteStatus};
use serde::Serialize;

/// One route with its utilisation class
#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry {
    #[serde(flatten)]
    pub route: Route,
    pub status: RouteStatus,
}

/// Counts of routes per utilisation class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub saturated: usize,
    pub partial: usize,
    pub unused: usize,
}

/// Solved network as handed to renderers
#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    pub max_flow: Flow,
    pub source: NodeId,
    pub sink: NodeId,
    pub node_count: usize,
    pub augmentations: usize,
    pub execution_time_ms: f64,
    pub min_cut: Vec<NodeId>,
    pub summary: RouteSummary,
    pub routes: Vec<RouteEntry>,
}

impl FlowReport {
    pub fn new(network: &FlowNetwork, source: NodeId, sink: NodeId, result: &MaxFlowResult) -> Self {
        let mut summary = RouteSummary::default();
        let routes: Vec<RouteEntry> = network
            .routes()
            .map(|route| {
                let status = route.status();
                match status {
                    RouteStatus::Saturated => summary.saturated += 1,
                    RouteStatus::Partial => summary.partial += 1,
                    RouteStatus::Unused => summary.unused += 1,
                }
                RouteEntry { route, status }
            })
            .collect();

        Self {
            max_flow: result.max_flow,
            source,
            sink,
            node_count: network.node_count(),
            augmentations: result.metrics.augmentations,
            execution_time_ms: result.metrics.execution_time_ms,
            min_cut: result.min_cut.clone(),
            summary,
            routes,
        }
    }
}

/// Timing of one benchmark size
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkEntry {
    pub nodes: usize,
    pub edges: usize,
    pub max_flow: Flow,
    pub seconds: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BenchmarkReport {
    pub density: f64,
    pub entries: Vec<BenchmarkEntry>,
}

/// Serialise `value` as pretty JSON into `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("report saved to: {}", path.display());
    Ok(())
}
