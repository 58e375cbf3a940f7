//! # Weighted Graph
//!
//! Generic adjacency-list graph with breadth-first shortest paths and
//! Prim's minimum spanning tree.
//!
//! Vertices live in a [`Set`] for membership and in an insertion-ordered
//! list for enumeration. Each vertex owns a list of outgoing edges in the
//! order `add_edge` wrote them; BFS expands neighbours in exactly that
//! order, so the path chosen among equal-length alternatives is fixed by
//! edge insertion order.

use crate::CivicError;
use crate::collections::{BinaryHeap, DynamicArray, HashTable, Queue, Set};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

// =============================================================================
// EDGES
// =============================================================================

/// Whether an edge is written in one direction or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Directed,
    Undirected,
}

/// One outgoing adjacency entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<V> {
    pub to: V,
    pub weight: f64,
}

/// An edge committed to a spanning tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MstEdge<V> {
    pub from: V,
    pub to: V,
    pub weight: f64,
}

/// Result of [`Graph::prim_mst`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumSpanningTree<V> {
    pub total_weight: f64,
    /// Edges in the order they were committed.
    pub edges: DynamicArray<MstEdge<V>>,
}

impl<V> MinimumSpanningTree<V> {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_weight: 0.0,
            edges: DynamicArray::new(),
        }
    }
}

// =============================================================================
// GRAPH
// =============================================================================

/// Weighted graph over any hashable vertex type.
#[derive(Debug, Clone)]
pub struct Graph<V: Hash + Eq + Clone> {
    vertices: Set<V>,
    order: DynamicArray<V>,
    adjacency: HashTable<V, DynamicArray<Edge<V>>>,
    edge_count: usize,
}

impl<V: Hash + Eq + Clone> Graph<V> {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertices: Set::new(),
            order: DynamicArray::new(),
            adjacency: HashTable::new(),
            edge_count: 0,
        }
    }

    /// Add a vertex. Returns `false` if it was already present.
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if !self.vertices.add(vertex.clone()) {
            return false;
        }
        self.order.push(vertex.clone());
        self.adjacency.insert(vertex, DynamicArray::new());
        true
    }

    /// Add an edge, creating missing endpoints.
    ///
    /// Negative, infinite or NaN weights are refused and leave the graph
    /// unchanged.
    pub fn add_edge(&mut self, from: V, to: V, weight: f64, kind: EdgeKind) -> Result<(), CivicError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(CivicError::InvalidWeight(weight));
        }
        self.add_vertex(from.clone());
        self.add_vertex(to.clone());
        self.push_edge(from.clone(), to.clone(), weight);
        if kind == EdgeKind::Undirected {
            self.push_edge(to, from, weight);
        }
        Ok(())
    }

    fn push_edge(&mut self, from: V, to: V, weight: f64) {
        if let Some(list) = self.adjacency.get_mut(&from) {
            list.push(Edge { to, weight });
            self.edge_count += 1;
        }
    }

    #[must_use]
    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.vertices.contains(vertex)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of directed adjacency entries (an undirected edge counts twice).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Vertices in the order they were first added.
    pub fn vertices(&self) -> impl Iterator<Item = &V> + '_ {
        self.order.iter()
    }

    /// Outgoing edges of `vertex` in insertion order; empty for unknown vertices.
    pub fn neighbors(&self, vertex: &V) -> impl Iterator<Item = &Edge<V>> + '_ {
        self.adjacency.get(vertex).into_iter().flat_map(|list| list.iter())
    }

    /// Every directed entry as `(from, to, weight)`, grouped by source vertex.
    pub fn edges(&self) -> impl Iterator<Item = (&V, &V, f64)> + '_ {
        self.order
            .iter()
            .flat_map(move |from| self.neighbors(from).map(move |e| (from, &e.to, e.weight)))
    }

    // =========================================================================
    // BREADTH-FIRST SEARCH
    // =========================================================================

    /// Fewest-edge path from `source` to `target`, both ends included.
    ///
    /// Returns `[source]` when the two are equal and an empty array when
    /// `target` is unreachable or `source` is not a vertex.
    pub fn bfs_path(&self, source: &V, target: &V) -> DynamicArray<V> {
        let mut path = DynamicArray::new();
        if !self.contains_vertex(source) {
            return path;
        }
        if source == target {
            path.push(source.clone());
            return path;
        }

        let mut visited = Set::new();
        let mut parent: HashTable<V, V> = HashTable::new();
        let mut frontier = Queue::new();
        visited.add(source.clone());
        frontier.enqueue(source.clone());

        while let Ok(current) = frontier.dequeue() {
            for edge in self.neighbors(&current) {
                if !visited.add(edge.to.clone()) {
                    continue;
                }
                parent.insert(edge.to.clone(), current.clone());
                if edge.to == *target {
                    path.push(target.clone());
                    let mut step = target;
                    while let Some(previous) = parent.get(step) {
                        path.push(previous.clone());
                        step = previous;
                    }
                    path.reverse();
                    return path;
                }
                frontier.enqueue(edge.to.clone());
            }
        }
        tracing::trace!("bfs: target unreachable");
        path
    }

    // =========================================================================
    // PRIM
    // =========================================================================

    /// Minimum spanning tree of the component containing `start`.
    ///
    /// Lazy deletion: stale frontier edges are skipped when popped instead
    /// of being decreased in place. Vertices not reachable from `start` are
    /// left out. An unknown `start` yields an empty tree.
    pub fn prim_mst(&self, start: &V) -> MinimumSpanningTree<V> {
        let mut mst = MinimumSpanningTree::empty();
        if !self.contains_vertex(start) {
            return mst;
        }

        let mut in_tree = Set::new();
        let mut frontier = BinaryHeap::new(|a: &MstEdge<V>, b: &MstEdge<V>| {
            a.weight.total_cmp(&b.weight)
        });
        in_tree.add(start.clone());
        self.push_frontier(start, &in_tree, &mut frontier);

        while let Ok(edge) = frontier.dequeue() {
            if in_tree.contains(&edge.to) {
                continue;
            }
            in_tree.add(edge.to.clone());
            mst.total_weight += edge.weight;
            self.push_frontier(&edge.to, &in_tree, &mut frontier);
            mst.edges.push(edge);
        }
        mst
    }

    fn push_frontier<C>(&self, from: &V, in_tree: &Set<V>, frontier: &mut BinaryHeap<MstEdge<V>, C>)
    where
        C: Fn(&MstEdge<V>, &MstEdge<V>) -> std::cmp::Ordering,
    {
        for edge in self.neighbors(from) {
            if !in_tree.contains(&edge.to) {
                frontier.enqueue(MstEdge {
                    from: from.clone(),
                    to: edge.to.clone(),
                    weight: edge.weight,
                });
            }
        }
    }
}

impl<V: Hash + Eq + Clone> Default for Graph<V> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZABLE GRAPH
// =============================================================================

/// Plain enumeration of a graph: its vertices and its directed entries.
///
/// Rebuilding from this form replays the same insertion order, so BFS and
/// MST results of the rebuilt graph match the source graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableGraph<V> {
    pub vertices: Vec<V>,
    pub edges: Vec<(V, V, f64)>,
}

impl<V: Hash + Eq + Clone> From<&Graph<V>> for SerializableGraph<V> {
    fn from(graph: &Graph<V>) -> Self {
        Self {
            vertices: graph.vertices().cloned().collect(),
            edges: graph
                .edges()
                .map(|(from, to, weight)| (from.clone(), to.clone(), weight))
                .collect(),
        }
    }
}

impl<V: Hash + Eq + Clone> TryFrom<SerializableGraph<V>> for Graph<V> {
    type Error = CivicError;

    fn try_from(serializable: SerializableGraph<V>) -> Result<Self, Self::Error> {
        let mut graph = Graph::new();
        for vertex in serializable.vertices {
            graph.add_vertex(vertex);
        }
        for (from, to, weight) in serializable.edges {
            graph.add_edge(from, to, weight, EdgeKind::Directed)?;
        }
        Ok(graph)
    }
}

// =============================================================================
// TESTS
// =============================================================================
