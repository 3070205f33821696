//! Residual flow network with arena-allocated edge pairs
//!
//! Every physical edge `u -> v` is stored as two adjacent arena slots: the
//! forward edge carrying the real capacity, followed by its zero-capacity
//! reverse companion `v -> u`. Each edge holds the arena index of its
//! partner instead of a reference, so the network owns all edges and no
//! ownership cycle exists.
//!
//! # Invariants
//! 1. **Capacity bound**: `0 <= flow <= capacity` on every forward edge
//! 2. **Reverse symmetry**: `flow(e) == -flow(reverse(e))` on every edge
//! 3. **Pair presence**: each edge's reverse sits in the adjacency list of
//!    the opposite endpoint
//! 4. **Insertion order**: adjacency lists keep the order edges were added,
//!    which fixes the tie-breaking of breadth-first searches
//!
//! `apply_flow` is the only writer of `flow`, which is what keeps
//! invariants 1 and 2 intact across repeated augmentation.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;
use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Capacity, Flow, FlowError, FlowResult, NodeId};

/// Index of an edge inside the network's edge arena
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub usize);

impl EdgeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }

    /// Forward edges occupy even arena slots, their reverses the odd slot after.
    #[inline]
    pub fn is_forward(self) -> bool {
        self.0 % 2 == 0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Flow edge representation with residual capacity tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEdge {
    from: NodeId,
    to: NodeId,
    capacity: Capacity,
    flow: Flow,
    reverse: EdgeId,
}

impl FlowEdge {
    fn new(from: NodeId, to: NodeId, capacity: Capacity, reverse: EdgeId) -> Self {
        Self {
            from,
            to,
            capacity,
            flow: 0,
            reverse,
        }
    }

    /// Source vertex
    #[inline]
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// Target vertex
    #[inline]
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// Original edge capacity, zero for reverse edges
    #[inline]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Current flow through edge
    #[inline]
    pub fn flow(&self) -> Flow {
        self.flow
    }

    /// Arena index of the paired reverse edge
    #[inline]
    pub fn reverse(&self) -> EdgeId {
        self.reverse
    }

    /// Get residual capacity: the amount by which flow could still increase
    #[inline]
    pub fn residual_capacity(&self) -> Capacity {
        self.capacity - self.flow
    }
}

/// Utilisation class of a physical route after solving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    /// `flow == capacity`; the route is a bottleneck
    Saturated,
    /// `0 < flow < capacity`
    Partial,
    /// No flow at all
    Unused,
}

/// Read-only view of a forward edge for reporting and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub from: NodeId,
    pub to: NodeId,
    pub capacity: Capacity,
    pub flow: Flow,
}

impl Route {
    pub fn status(&self) -> RouteStatus {
        if self.flow == self.capacity {
            RouteStatus::Saturated
        } else if self.flow > 0 {
            RouteStatus::Partial
        } else {
            RouteStatus::Unused
        }
    }
}

/// Flow network representation with residual graph
#[derive(Debug, Clone, Serialize)]
pub struct FlowNetwork {
    /// Number of vertices in network
    vertex_count: usize,
    /// Adjacency lists of edge ids, in insertion order
    adjacency: Vec<Vec<EdgeId>>,
    /// All edges in the network
    edges: Vec<FlowEdge>,
}

impl FlowNetwork {
    /// Create new flow network with specified vertex count
    pub fn new(vertex_count: usize) -> FlowResult<Self> {
        if vertex_count < 1 {
            return Err(FlowError::InvalidArgument(
                "flow network needs at least one node".to_string(),
            ));
        }

        Ok(Self {
            vertex_count,
            adjacency: vec![Vec::new(); vertex_count],
            edges: Vec::new(),
        })
    }

    /// Build a network from `(source, target, capacity)` triples.
    ///
    /// Stops at the first invalid triple and reports it.
    pub fn from_edges<I>(vertex_count: usize, edges: I) -> FlowResult<Self>
    where
        I: IntoIterator<Item = (usize, usize, Capacity)>,
    {
        let mut network = Self::new(vertex_count)?;
        for (from, to, capacity) in edges {
            network.add_edge(from, to, capacity)?;
        }
        Ok(network)
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of physical edges, reverse companions not counted
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// Number of arena slots, i.e. forward and reverse edges together
    #[inline]
    pub fn edge_slots(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.0 < self.vertex_count
    }

    /// Fails with `OutOfRange` unless `node` lies in `[0, node_count)`
    pub fn check_node(&self, node: NodeId) -> FlowResult<()> {
        if self.contains_node(node) {
            Ok(())
        } else {
            Err(FlowError::OutOfRange {
                index: node.0,
                node_count: self.vertex_count,
            })
        }
    }

    /// Add edge to flow network with its zero-capacity reverse companion.
    ///
    /// Returns the id of the forward edge. All arguments are validated before
    /// anything is pushed, so a failed call leaves the network unchanged.
    pub fn add_edge(
        &mut self,
        from: usize,
        to: usize,
        capacity: Capacity,
    ) -> FlowResult<EdgeId> {
        let (from, to) = (NodeId(from), NodeId(to));
        self.check_node(from)?;
        self.check_node(to)?;
        if capacity < 0 {
            return Err(FlowError::NegativeCapacity { from, to, capacity });
        }

        let forward_id = EdgeId(self.edges.len());
        let reverse_id = EdgeId(forward_id.0 + 1);

        self.edges.push(FlowEdge::new(from, to, capacity, reverse_id));
        self.edges.push(FlowEdge::new(to, from, 0, forward_id));
        self.adjacency[from.0].push(forward_id);
        self.adjacency[to.0].push(reverse_id);

        trace!("added edge {} -> {} (capacity {}) as {}", from, to, capacity, forward_id);
        Ok(forward_id)
    }

    /// Look up an edge by arena id
    pub fn edge(&self, id: EdgeId) -> FlowResult<&FlowEdge> {
        self.edges.get(id.0).ok_or(FlowError::UnknownEdge {
            index: id.0,
            edge_slots: self.edges.len(),
        })
    }

    pub fn residual_capacity(&self, id: EdgeId) -> FlowResult<Capacity> {
        self.edge(id).map(FlowEdge::residual_capacity)
    }

    /// Push `amount` units along `id` and cancel the same amount on its reverse.
    ///
    /// Requires `0 <= amount <= residual_capacity(id)`.
    pub fn apply_flow(&mut self, id: EdgeId, amount: Flow) -> FlowResult<()> {
        let edge = self.edge(id)?;
        if amount < 0 {
            return Err(FlowError::InvalidArgument(format!(
                "cannot apply negative flow {} to {}",
                amount, id
            )));
        }
        let residual = edge.residual_capacity();
        if amount > residual {
            return Err(FlowError::InvalidArgument(format!(
                "flow {} exceeds residual capacity {} of {}",
                amount, residual, id
            )));
        }

        let reverse = edge.reverse;
        self.edges[id.0].flow += amount;
        self.edges[reverse.0].flow -= amount;
        Ok(())
    }

    /// Edges leaving `node`, in insertion order
    pub fn edges_from(
        &self,
        node: NodeId,
    ) -> FlowResult<impl Iterator<Item = (EdgeId, &FlowEdge)> + '_> {
        self.check_node(node)?;
        Ok(self.adjacency[node.0]
            .iter()
            .map(move |&id| (id, &self.edges[id.0])))
    }

    /// Every arena slot with its id, forward and reverse edges interleaved
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &FlowEdge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(index, edge)| (EdgeId(index), edge))
    }

    /// Forward edges with positive capacity, as seen by a renderer
    pub fn routes(&self) -> impl Iterator<Item = Route> + '_ {
        self.edges
            .iter()
            .step_by(2)
            .filter(|edge| edge.capacity > 0)
            .map(|edge| Route {
                from: edge.from,
                to: edge.to,
                capacity: edge.capacity,
                flow: edge.flow,
            })
    }

    /// Outgoing minus incoming flow at `node`.
    ///
    /// Reverse edges carry negated flow, so summing the adjacency list
    /// yields the net value directly. The sum is widened so that mixed
    /// signs never overflow midway; only a result outside `Flow` is an error.
    pub fn net_flow(&self, node: NodeId) -> FlowResult<Flow> {
        let total = self
            .edges_from(node)?
            .map(|(_, edge)| i128::from(edge.flow))
            .sum::<i128>();
        Flow::try_from(total).map_err(|_| FlowError::FlowOverflow { context: "net flow" })
    }

    /// Nodes reachable from `source` through edges with positive residual
    /// capacity, in discovery order
    pub fn residual_reachable(&self, source: NodeId) -> FlowResult<Vec<NodeId>> {
        self.check_node(source)?;

        let mut visited = vec![false; self.vertex_count];
        let mut order = vec![source];
        let mut queue = VecDeque::from([source]);
        visited[source.0] = true;

        while let Some(node) = queue.pop_front() {
            for &id in &self.adjacency[node.0] {
                let edge = &self.edges[id.0];
                if edge.residual_capacity() > 0 && !visited[edge.to.0] {
                    visited[edge.to.0] = true;
                    order.push(edge.to);
                    queue.push_back(edge.to);
                }
            }
        }

        Ok(order)
    }

    /// Total capacity of forward edges leaving the node set `side`
    pub fn cut_capacity(&self, side: &[NodeId]) -> FlowResult<Capacity> {
        let mut inside = vec![false; self.vertex_count];
        for &node in side {
            self.check_node(node)?;
            inside[node.0] = true;
        }

        self.edges
            .iter()
            .step_by(2)
            .filter(|edge| inside[edge.from.0] && !inside[edge.to.0])
            .try_fold(0 as Capacity, |total, edge| total.checked_add(edge.capacity))
            .ok_or(FlowError::FlowOverflow { context: "cut capacity" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_network_creation() {
        let mut network = FlowNetwork::new(4).unwrap();
        network.add_edge(0, 1, 10).unwrap();
        network.add_edge(1, 2, 5).unwrap();
        network.add_edge(2, 3, 8).unwrap();

        assert_eq!(network.node_count(), 4);
        assert_eq!(network.edge_count(), 3);
        assert_eq!(network.edge_slots(), 6); // 3 forward + 3 reverse edges
    }

    #[test]
    fn test_zero_nodes_rejected() {
        assert!(matches!(
            FlowNetwork::new(0),
            Err(FlowError::InvalidArgument(_))
        ));
        assert!(FlowNetwork::new(1).is_ok());
    }

    #[test]
    fn test_edge_pair_linkage() {
        let mut network = FlowNetwork::new(2).unwrap();
        let forward = network.add_edge(0, 1, 7).unwrap();

        let edge = network.edge(forward).unwrap();
        assert!(forward.is_forward());
        assert_eq!(edge.from(), NodeId(0));
        assert_eq!(edge.to(), NodeId(1));
        assert_eq!(edge.capacity(), 7);
        assert_eq!(edge.flow(), 0);

        let reverse = network.edge(edge.reverse()).unwrap();
        assert!(!edge.reverse().is_forward());
        assert_eq!(reverse.from(), NodeId(1));
        assert_eq!(reverse.to(), NodeId(0));
        assert_eq!(reverse.capacity(), 0);
        assert_eq!(reverse.reverse(), forward);

        let from_one: Vec<_> = network.edges_from(NodeId(1)).unwrap().map(|(id, _)| id).collect();
        assert_eq!(from_one, vec![edge.reverse()]);
    }

    #[test]
    fn test_add_edge_is_atomic_on_failure() {
        let mut network = FlowNetwork::new(3).unwrap();
        network.add_edge(0, 1, 4).unwrap();

        assert_eq!(
            network.add_edge(0, 3, 5),
            Err(FlowError::OutOfRange { index: 3, node_count: 3 })
        );
        assert_eq!(
            network.add_edge(9, 1, 5),
            Err(FlowError::OutOfRange { index: 9, node_count: 3 })
        );
        assert!(matches!(
            network.add_edge(1, 2, -1),
            Err(FlowError::NegativeCapacity { capacity: -1, .. })
        ));

        assert_eq!(network.edge_slots(), 2);
        assert_eq!(network.edges_from(NodeId(0)).unwrap().count(), 1);
        assert_eq!(network.edges_from(NodeId(2)).unwrap().count(), 0);
    }

    #[test]
    fn test_self_loop_is_accepted() {
        let mut network = FlowNetwork::new(2).unwrap();
        network.add_edge(1, 1, 3).unwrap();
        assert_eq!(network.edges_from(NodeId(1)).unwrap().count(), 2);
    }

    #[test]
    fn test_apply_flow_updates_both_directions() {
        let mut network = FlowNetwork::new(2).unwrap();
        let forward = network.add_edge(0, 1, 10).unwrap();
        let reverse = network.edge(forward).unwrap().reverse();

        network.apply_flow(forward, 6).unwrap();
        assert_eq!(network.edge(forward).unwrap().flow(), 6);
        assert_eq!(network.edge(reverse).unwrap().flow(), -6);
        assert_eq!(network.residual_capacity(forward).unwrap(), 4);
        assert_eq!(network.residual_capacity(reverse).unwrap(), 6);

        // Cancelling along the reverse edge
        network.apply_flow(reverse, 2).unwrap();
        assert_eq!(network.edge(forward).unwrap().flow(), 4);
        assert_eq!(network.edge(reverse).unwrap().flow(), -4);
    }

    #[test]
    fn test_apply_flow_rejects_illegal_amounts() {
        let mut network = FlowNetwork::new(2).unwrap();
        let forward = network.add_edge(0, 1, 10).unwrap();
        let reverse = network.edge(forward).unwrap().reverse();

        assert!(matches!(
            network.apply_flow(forward, 11),
            Err(FlowError::InvalidArgument(_))
        ));
        assert!(matches!(
            network.apply_flow(forward, -1),
            Err(FlowError::InvalidArgument(_))
        ));
        assert!(matches!(
            network.apply_flow(reverse, 1),
            Err(FlowError::InvalidArgument(_))
        ));
        assert_eq!(
            network.apply_flow(EdgeId(8), 1),
            Err(FlowError::UnknownEdge { index: 8, edge_slots: 2 })
        );
        assert_eq!(network.edge(forward).unwrap().flow(), 0);

        network.apply_flow(forward, 0).unwrap();
        assert_eq!(network.edge(forward).unwrap().flow(), 0);
    }

    #[test]
    fn test_residual_capacity_is_idempotent() {
        let mut network = FlowNetwork::new(2).unwrap();
        let forward = network.add_edge(0, 1, 9).unwrap();
        network.apply_flow(forward, 3).unwrap();

        let first = network.residual_capacity(forward).unwrap();
        let second = network.residual_capacity(forward).unwrap();
        assert_eq!(first, 6);
        assert_eq!(first, second);
    }

    #[test]
    fn test_edges_from_preserves_insertion_order() {
        let mut network = FlowNetwork::new(4).unwrap();
        network.add_edge(0, 3, 1).unwrap();
        network.add_edge(0, 1, 1).unwrap();
        network.add_edge(2, 0, 1).unwrap();
        network.add_edge(0, 2, 1).unwrap();

        let targets: Vec<_> = network
            .edges_from(NodeId(0))
            .unwrap()
            .map(|(_, edge)| edge.to().as_usize())
            .collect();
        assert_eq!(targets, vec![3, 1, 2, 2]);
        assert!(network.edges_from(NodeId(4)).is_err());
    }

    #[test]
    fn test_routes_skip_reverse_and_zero_capacity_edges() {
        let mut network = FlowNetwork::new(3).unwrap();
        let a = network.add_edge(0, 1, 4).unwrap();
        network.add_edge(1, 2, 0).unwrap();
        let c = network.add_edge(0, 2, 6).unwrap();
        network.apply_flow(a, 4).unwrap();
        network.apply_flow(c, 2).unwrap();

        let routes: Vec<_> = network.routes().collect();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].status(), RouteStatus::Saturated);
        assert_eq!(routes[1].status(), RouteStatus::Partial);
        assert_eq!(routes[1].flow, 2);

        let mut unused = FlowNetwork::new(2).unwrap();
        unused.add_edge(0, 1, 5).unwrap();
        assert_eq!(unused.routes().next().unwrap().status(), RouteStatus::Unused);
    }

    #[test]
    fn test_net_flow_and_cut_capacity() {
        let mut network = FlowNetwork::new(3).unwrap();
        let a = network.add_edge(0, 1, 5).unwrap();
        let b = network.add_edge(1, 2, 3).unwrap();
        network.apply_flow(a, 3).unwrap();
        network.apply_flow(b, 3).unwrap();

        assert_eq!(network.net_flow(NodeId(0)).unwrap(), 3);
        assert_eq!(network.net_flow(NodeId(1)).unwrap(), 0);
        assert_eq!(network.net_flow(NodeId(2)).unwrap(), -3);

        let side = network.residual_reachable(NodeId(0)).unwrap();
        assert_eq!(side, vec![NodeId(0), NodeId(1)]);
        assert_eq!(network.cut_capacity(&side).unwrap(), 3);
    }

    #[test]
    fn test_sums_report_overflow_instead_of_panicking() {
        let mut network =
            FlowNetwork::from_edges(3, [(0, 1, Capacity::MAX), (0, 2, Capacity::MAX)]).unwrap();
        assert_eq!(
            network.cut_capacity(&[NodeId(0)]),
            Err(FlowError::FlowOverflow { context: "cut capacity" })
        );
        assert_eq!(network.cut_capacity(&[NodeId(0), NodeId(2)]).unwrap(), Capacity::MAX);

        network.apply_flow(EdgeId(0), Capacity::MAX).unwrap();
        assert_eq!(network.net_flow(NodeId(0)).unwrap(), Capacity::MAX);
        network.apply_flow(EdgeId(2), Capacity::MAX).unwrap();
        assert_eq!(
            network.net_flow(NodeId(0)),
            Err(FlowError::FlowOverflow { context: "net flow" })
        );
        assert_eq!(network.net_flow(NodeId(1)).unwrap(), -Capacity::MAX);
    }

    #[test]
    fn test_net_flow_tolerates_mixed_sign_extremes() {
        // MAX out, MAX out, MAX in: partial sums exceed i64 but the total does not
        let mut network = FlowNetwork::from_edges(
            4,
            [(0, 1, Capacity::MAX), (0, 2, Capacity::MAX), (3, 0, Capacity::MAX)],
        )
        .unwrap();
        for id in [EdgeId(0), EdgeId(2), EdgeId(4)] {
            network.apply_flow(id, Capacity::MAX).unwrap();
        }
        assert_eq!(network.net_flow(NodeId(0)).unwrap(), Capacity::MAX);
    }
}
