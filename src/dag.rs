//! DAG utilities (component A).
//!
//! Topological ordering, fanout construction, and primary-input/output
//! detection. These are the leaf operations every other phase builds on:
//! everything downstream assumes a validated, topologically-ordered graph.

use std::collections::{BTreeMap, BTreeSet};

/// A combinational network: each node maps to its ordered fanins.
///
/// Fanin order is preserved (`fanins_of` returns it verbatim) but is
/// semantically irrelevant to mapping — only the *set* of fanins matters to
/// cut enumeration.
#[derive(Clone, Debug, Default)]
pub struct Graph<N: Ord> {
    fanins: BTreeMap<N, Vec<N>>,
}

impl<N: Ord + Clone> Graph<N> {
    /// An empty graph.
    pub fn new() -> Self {
        Graph {
            fanins: BTreeMap::new(),
        }
    }

    /// Insert a node with its ordered fanins. A primary input is inserted
    /// with an empty fanin list.
    pub fn insert(&mut self, node: N, fanins: Vec<N>) {
        self.fanins.insert(node, fanins);
    }

    /// Build a graph from `(node, fanins)` pairs.
    pub fn from_pairs<I: IntoIterator<Item = (N, Vec<N>)>>(pairs: I) -> Self {
        Graph {
            fanins: pairs.into_iter().collect(),
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.fanins.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.fanins.is_empty()
    }

    /// Whether `node` is a key in the graph.
    pub fn contains(&self, node: &N) -> bool {
        self.fanins.contains_key(node)
    }

    /// The ordered fanins of `node`, or `None` if it is not a node of the
    /// graph.
    pub fn fanins_of(&self, node: &N) -> Option<&[N]> {
        self.fanins.get(node).map(Vec::as_slice)
    }

    /// All nodes, in their natural (ascending `N`) order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.fanins.keys()
    }

    /// The set of primary inputs: nodes with no fanins.
    pub fn primary_inputs(&self) -> BTreeSet<N> {
        self.fanins
            .iter()
            .filter(|(_, f)| f.is_empty())
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Nodes appearing in no other node's fanin list — the auto-detected
    /// primary outputs, used when the caller supplies none.
    pub fn detect_outputs(&self) -> Vec<N> {
        let mut has_fanout: BTreeSet<&N> = BTreeSet::new();
        for fanins in self.fanins.values() {
            for u in fanins {
                has_fanout.insert(u);
            }
        }
        self.fanins
            .keys()
            .filter(|n| !has_fanout.contains(n))
            .cloned()
            .collect()
    }
}

/// Errors raised while validating or ordering a [`Graph`].
#[derive(Debug, thiserror::Error)]
pub enum DagError<N> {
    /// Topological sort could not consume all nodes: the graph has a cycle.
    #[error("cycle detected: graph is not acyclic")]
    CycleDetected,
    /// A node's fanin list names a node that is not itself a key of the
    /// graph. This is a caller bug, not a property of the network.
    #[error("node {0:?} has fanin {1:?} which is not a node of the graph")]
    MissingFanin(N, N),
}

/// Topologically order `graph`'s nodes via Kahn's algorithm and materialize
/// its fanouts (the inverse adjacency).
///
/// Ties among simultaneously-ready (zero-indegree) nodes are broken by `N`'s
/// ordering, not by insertion order: this is what makes cut enumeration,
/// labeling, and area recovery reproducible byte-for-byte across runs.
pub fn topological_order<N: Ord + Clone + std::fmt::Debug>(
    graph: &Graph<N>,
) -> Result<(Vec<N>, BTreeMap<N, Vec<N>>), DagError<N>> {
    let mut fanouts: BTreeMap<N, Vec<N>> = graph.nodes().cloned().map(|n| (n, Vec::new())).collect();
    let mut indegree: BTreeMap<N, usize> = BTreeMap::new();

    for node in graph.nodes() {
        let fanins = graph.fanins_of(node).expect("node came from graph.nodes()");
        indegree.insert(node.clone(), fanins.len());
        for u in fanins {
            let fanout_list = fanouts
                .get_mut(u)
                .ok_or_else(|| DagError::MissingFanin(node.clone(), u.clone()))?;
            fanout_list.push(node.clone());
        }
    }

    let mut ready: BTreeSet<N> = indegree
        .iter()
        .filter(|(_, &d)| d == 0)
        .map(|(n, _)| n.clone())
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some(node) = ready.iter().next().cloned() {
        ready.remove(&node);
        order.push(node.clone());
        for succ in &fanouts[&node] {
            let d = indegree.get_mut(succ).expect("fanout target is a graph node");
            *d -= 1;
            if *d == 0 {
                ready.insert(succ.clone());
            }
        }
    }

    if order.len() != graph.len() {
        return Err(DagError::CycleDetected);
    }

    Ok((order, fanouts))
}
