//! Strongly connected components via Tarjan's algorithm.
//!
//! # Algorithm
//!
//! One depth-first pass from every unvisited vertex in id order. Each vertex
//! gets a discovery number and a low-link; vertices stay on an explicit
//! component stack until the root of their component (the vertex whose
//! low-link equals its discovery number) finishes, at which point the stack
//! is popped down to the root and the popped vertices form one component.
//!
//! The traversal keeps its own frame stack (vertex plus edge cursor) instead
//! of recursing, so long dependency chains cannot exhaust the call stack. The
//! output is identical to the recursive formulation: components appear in
//! root-finalization order, and vertices inside a component appear in pop
//! order.
//!
//! All traversal state (discovery, low-link, on-stack flags, the component
//! stack) is owned by a single call and dropped when it returns.

#![allow(clippy::module_name_repetitions)]

use tracing::{debug, instrument, trace};

use crate::error::GraphError;
use crate::graph::model::Graph;
use crate::observe::{NoopObserver, Observer};

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Result of SCC detection: a partition of the graph's vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    components: Vec<Vec<usize>>,
    component_of: Vec<usize>,
    edge_count: usize,
    fingerprint: u64,
}

impl Components {
    /// Wrap an externally computed partition of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::PrecedesComponents`] if a vertex is missing,
    /// listed twice, or out of range.
    pub fn from_parts(graph: &Graph, components: Vec<Vec<usize>>) -> Result<Self, GraphError> {
        let n = graph.vertex_count();
        let mut component_of = vec![usize::MAX; n];

        for (index, members) in components.iter().enumerate() {
            for &vertex in members {
                let Some(slot) = component_of.get_mut(vertex) else {
                    return Err(GraphError::PrecedesComponents {
                        reason: format!("vertex {vertex} is outside a graph of {n} vertices"),
                    });
                };
                if *slot != usize::MAX {
                    return Err(GraphError::PrecedesComponents {
                        reason: format!("vertex {vertex} appears in more than one component"),
                    });
                }
                *slot = index;
            }
        }

        if let Some(missing) = component_of.iter().position(|&c| c == usize::MAX) {
            return Err(GraphError::PrecedesComponents {
                reason: format!("vertex {missing} is not assigned to a component"),
            });
        }

        Ok(Self {
            components,
            component_of,
            edge_count: graph.edge_count(),
            fingerprint: graph.structure_fingerprint(),
        })
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Return `true` if there are no components (zero-vertex graph).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Members of component `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[usize]> {
        self.components.get(index).map(Vec::as_slice)
    }

    /// Iterate over components in root-finalization order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.components.iter().map(Vec::as_slice)
    }

    /// Index of the component containing `vertex`.
    #[must_use]
    pub fn component_of(&self, vertex: usize) -> Option<usize> {
        self.component_of.get(vertex).copied()
    }

    /// Number of vertices in the graph these components were computed for.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.component_of.len()
    }

    /// Number of edges in the graph these components were computed for.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Return `true` if `graph` has the edge structure these components were
    /// built from: same vertex count, edge count and
    /// [`Graph::structure_fingerprint`].
    #[must_use]
    pub fn matches(&self, graph: &Graph) -> bool {
        self.vertex_count() == graph.vertex_count()
            && self.edge_count == graph.edge_count()
            && self.fingerprint == graph.structure_fingerprint()
    }

    /// Return `true` if component `index` is a cycle: more than one member,
    /// or a single member with a self-loop.
    #[must_use]
    pub fn is_cyclic(&self, index: usize, graph: &Graph) -> bool {
        match self.components.get(index).map(Vec::as_slice) {
            Some([only]) => graph.has_edge(*only, *only),
            Some(members) => members.len() > 1,
            None => false,
        }
    }

    /// Number of cyclic components.
    #[must_use]
    pub fn cyclic_count(&self, graph: &Graph) -> usize {
        (0..self.len()).filter(|&i| self.is_cyclic(i, graph)).count()
    }

    /// Size of the largest component (zero for the empty graph).
    #[must_use]
    pub fn largest(&self) -> usize {
        self.components.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Consume the result and return the raw component lists.
    #[must_use]
    pub fn into_inner(self) -> Vec<Vec<usize>> {
        self.components
    }
}

// ---------------------------------------------------------------------------
// Tarjan
// ---------------------------------------------------------------------------

/// Find all strongly connected components of `graph`.
///
/// Never fails; the zero-vertex graph yields an empty result.
#[must_use]
pub fn find_components(graph: &Graph) -> Components {
    find_components_observed(graph, &mut NoopObserver)
}

/// [`find_components`] reporting `dfs_visits`, `edges_traversed`,
/// `stack_pops` and `sccs_found` to `observer`.
#[must_use]
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn find_components_observed(graph: &Graph, observer: &mut dyn Observer) -> Components {
    observer.start_timer();

    let n = graph.vertex_count();
    let mut state = TarjanState {
        graph,
        observer,
        discovery: vec![None; n],
        lowlink: vec![0; n],
        on_stack: vec![false; n],
        stack: Vec::new(),
        next_index: 0,
        components: Vec::new(),
    };

    for root in graph.vertices() {
        if state.discovery[root].is_none() {
            state.strong_connect(root);
        }
    }

    let TarjanState {
        components,
        observer,
        ..
    } = state;
    observer.stop_timer();

    let mut component_of = vec![0; n];
    for (index, members) in components.iter().enumerate() {
        for &vertex in members {
            component_of[vertex] = index;
        }
    }

    debug!(components = components.len(), "tarjan finished");

    Components {
        components,
        component_of,
        edge_count: graph.edge_count(),
        fingerprint: graph.structure_fingerprint(),
    }
}

/// One DFS frame: the vertex and the index of its next unexamined edge.
#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: usize,
    cursor: usize,
}

struct TarjanState<'g, 'o> {
    graph: &'g Graph,
    observer: &'o mut dyn Observer,
    /// `None` until visited.
    discovery: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

impl TarjanState<'_, '_> {
    fn visit(&mut self, vertex: usize) {
        self.observer.increment("dfs_visits");
        self.discovery[vertex] = Some(self.next_index);
        self.lowlink[vertex] = self.next_index;
        self.next_index += 1;
        self.stack.push(vertex);
        self.on_stack[vertex] = true;
    }

    fn strong_connect(&mut self, root: usize) {
        let graph = self.graph;
        self.visit(root);
        let mut frames = vec![Frame {
            vertex: root,
            cursor: 0,
        }];

        while let Some(frame) = frames.last_mut() {
            let u = frame.vertex;

            if let Some(edge) = graph.edges(u).get(frame.cursor) {
                frame.cursor += 1;
                let v = edge.to;
                self.observer.increment("edges_traversed");

                match self.discovery[v] {
                    None => {
                        self.visit(v);
                        frames.push(Frame {
                            vertex: v,
                            cursor: 0,
                        });
                    }
                    Some(discovered) if self.on_stack[v] => {
                        self.lowlink[u] = self.lowlink[u].min(discovered);
                    }
                    // Edge into an already finalized component.
                    Some(_) => {}
                }
                continue;
            }

            // All edges of `u` examined: return to the parent frame.
            frames.pop();
            if let Some(parent) = frames.last() {
                let p = parent.vertex;
                self.lowlink[p] = self.lowlink[p].min(self.lowlink[u]);
            }

            if self.discovery[u] == Some(self.lowlink[u]) {
                self.pop_component(u);
            }
        }
    }

    fn pop_component(&mut self, root: usize) {
        let mut component = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            component.push(w);
            self.observer.increment("stack_pops");
            if w == root {
                break;
            }
        }
        trace!(root, size = component.len(), "component finalized");
        self.observer.increment("sccs_found");
        self.components.push(component);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
