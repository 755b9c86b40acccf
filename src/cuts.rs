//! Set-minimal K-feasible cut enumeration (component B).
//!
//! For every node, produces the collection of set-minimal cuts of size at
//! most `K`, built bottom-up from the fanins' own cut collections. This is
//! the combinatorially heaviest phase in the pipeline; the streaming union
//! in [`crate::node::NodeSet::union_capped`] and the `cut_limit` safety
//! valve are what keep it tractable on wide fan-in.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use tracing::trace;

use crate::dag::Graph;
use crate::node::NodeSet;

/// Errors raised while enumerating cuts.
#[derive(Debug, thiserror::Error)]
pub enum CutsError<N> {
    /// After set-minimality pruning, a node's cut collection is empty: even
    /// its trivial fanin cut exceeds `K`. The caller's remedy is to
    /// decompose the node into narrower gates and re-run.
    #[error("node {0:?} has no K-feasible cut")]
    NoFeasibleCut(N),
}

/// Per-node cut collections, keyed by node, each a set-minimal, K-feasible,
/// deterministically ordered list of cuts.
pub type Cuts<N> = BTreeMap<N, Vec<NodeSet<N>>>;

/// Enumerate set-minimal K-feasible cuts for every node of `graph`, visited
/// in the supplied topological `order`.
///
/// When `vendor_pack_shortcut` is set, any node whose full set of reachable
/// primary inputs has size `<= k` is given a single shortcut cut over those
/// inputs, bypassing the normal Cartesian-product construction entirely.
/// This is a non-default, depth-suboptimal-in-general mode: collapsing to
/// one cut can skip a strictly better depth-optimal cut that the full
/// enumeration would have found.
pub fn enumerate_cuts<N: Ord + Clone + std::fmt::Debug>(
    graph: &Graph<N>,
    order: &[N],
    pis: &BTreeSet<N>,
    k: usize,
    cut_limit: Option<usize>,
    vendor_pack_shortcut: bool,
) -> Result<Cuts<N>, CutsError<N>> {
    let mut cuts: Cuts<N> = BTreeMap::new();
    let mut reaching_pis: BTreeMap<N, BTreeSet<N>> = BTreeMap::new();

    for v in order {
        if pis.contains(v) {
            cuts.insert(v.clone(), vec![NodeSet::singleton(v.clone())]);
            if vendor_pack_shortcut {
                reaching_pis.insert(v.clone(), [v.clone()].into_iter().collect());
            }
            continue;
        }

        let fanins = graph
            .fanins_of(v)
            .expect("node from topological order is a graph node");

        if vendor_pack_shortcut {
            let mut reached: BTreeSet<N> = BTreeSet::new();
            for u in fanins {
                reached.extend(reaching_pis[u].iter().cloned());
            }
            if reached.len() <= k {
                trace!(node = ?v, pis = reached.len(), "vendor_pack_shortcut applied");
                let shortcut = NodeSet::from_iter_dedup(reached.iter().cloned());
                reaching_pis.insert(v.clone(), reached);
                cuts.insert(v.clone(), vec![shortcut]);
                continue;
            }
            reaching_pis.insert(v.clone(), reached);
        }

        let fanin_cuts: Vec<&[NodeSet<N>]> = fanins
            .iter()
            .map(|f| cuts[f].as_slice())
            .collect();

        let mut candidates = Vec::new();
        combine(&fanin_cuts, 0, None, k, &mut candidates);

        let trivial = NodeSet::from_iter_dedup(fanins.iter().cloned());
        if trivial.len() <= k {
            candidates.push(trivial);
        }

        let mut minimal = minimalize(candidates);

        if let Some(limit) = cut_limit {
            if minimal.len() > limit {
                minimal = minimal
                    .into_iter()
                    .sorted_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
                    .collect();
                minimal.truncate(limit);
            }
        }

        if minimal.is_empty() {
            return Err(CutsError::NoFeasibleCut(v.clone()));
        }

        trace!(node = ?v, candidates = minimal.len(), "cuts enumerated");
        cuts.insert(v.clone(), minimal);
    }

    Ok(cuts)
}

/// Recursively fold the Cartesian product of `fanin_cuts[idx..]`, carrying
/// the running union in `acc` and aborting a branch the moment its union
/// would exceed `k` (rather than materializing the full product first).
fn combine<N: Ord + Clone>(
    fanin_cuts: &[&[NodeSet<N>]],
    idx: usize,
    acc: Option<NodeSet<N>>,
    k: usize,
    out: &mut Vec<NodeSet<N>>,
) {
    if idx == fanin_cuts.len() {
        if let Some(u) = acc {
            out.push(u);
        }
        return;
    }
    for cut in fanin_cuts[idx] {
        let merged = match &acc {
            None => {
                if cut.len() <= k {
                    Some(cut.clone())
                } else {
                    None
                }
            }
            Some(running) => running.union_capped(cut, k),
        };
        if let Some(merged) = merged {
            combine(fanin_cuts, idx + 1, Some(merged), k, out);
        }
    }
}

/// Discard every candidate that has a strict subset among the candidates
/// (set-minimality pruning). Among exact duplicates, the earliest
/// occurrence survives. Candidates are bucketed by ascending size first so
/// that a candidate can only be dominated by one already known not to be
/// larger than it.
fn minimalize<N: Ord + Clone>(candidates: Vec<NodeSet<N>>) -> Vec<NodeSet<N>> {
    let n = candidates.len();
    let by_size: Vec<usize> = (0..n).sorted_by_key(|&i| candidates[i].len()).collect();

    let mut keep = vec![true; n];
    for &i in &by_size {
        for &j in &by_size {
            if i == j || candidates[j].len() > candidates[i].len() {
                continue;
            }
            if candidates[j].is_subset_of(&candidates[i]) && (candidates[j] != candidates[i] || j < i) {
                keep[i] = false;
                break;
            }
        }
    }

    (0..n)
        .filter(|&i| keep[i])
        .map(|i| candidates[i].clone())
        .collect()
}
