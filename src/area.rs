//! Depth-preserving area-flow recovery (component D / FlowMap-r).
//!
//! Depth labeling (component C) only fixes *how deep* the mapping is; many
//! depth-optimal cuts remain available at each node, and FlowMap-r picks
//! among them to recover area by maximizing fanin sharing. `af(v)` is an
//! amortized LUT-count estimate: a fanin's cost is divided by its refcount
//! so that widely-shared logic is not charged once per consumer.

use std::collections::BTreeMap;

use tracing::debug;

use crate::cuts::Cuts;
use crate::dag::Graph;
use crate::label::{CutDepths, Labels};
use crate::node::NodeSet;

/// Errors raised during area-flow recovery.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AreaError<N> {
    /// `v`'s cut collection is empty. Cannot happen for cuts produced by
    /// [`crate::cuts::enumerate_cuts`] (which would have already failed
    /// with `NoFeasibleCut`); guards against inconsistent caller-supplied
    /// `cuts`/`labels`/`cut_depth`.
    #[error("node {0:?} has no enumerated cuts to choose from")]
    NoCutsAvailable(N),
}

/// The cut chosen for each non-PI node.
pub type ChosenCuts<N> = BTreeMap<N, NodeSet<N>>;

/// Area-flow value per node (`0` for primary inputs).
pub type AreaFlow<N> = BTreeMap<N, f64>;

/// Choose a depth-preserving, minimal-area cut for every non-PI node, in
/// strict topological order (PIs first) so that a cut's fanin area-flow
/// values are always already available. Recovering area in reverse
/// topological order is a tempting shortcut but wrong: a node's own
/// area-flow depends on its fanins' already-settled values, not the other
/// way around.
pub fn area_recover<N: Ord + Clone + std::fmt::Debug>(
    order: &[N],
    pis: &std::collections::BTreeSet<N>,
    fanouts: &BTreeMap<N, Vec<N>>,
    cuts: &Cuts<N>,
    labels: &Labels<N>,
    cut_depth: &CutDepths<N>,
) -> Result<(ChosenCuts<N>, AreaFlow<N>), AreaError<N>> {
    let mut chosen: ChosenCuts<N> = BTreeMap::new();
    let mut area_flow: AreaFlow<N> = BTreeMap::new();

    let refcount = |n: &N| -> usize { fanouts.get(n).map(|f| f.len()).unwrap_or(0).max(1) };

    for v in order {
        if pis.contains(v) {
            area_flow.insert(v.clone(), 0.0);
            continue;
        }

        let node_cuts = cuts.get(v).ok_or_else(|| AreaError::NoCutsAvailable(v.clone()))?;
        let depths = cut_depth
            .get(v)
            .ok_or_else(|| AreaError::NoCutsAvailable(v.clone()))?;
        let label_v = labels.get(v).copied().unwrap_or(u32::MAX);

        let cost = |cut: &NodeSet<N>| -> f64 {
            1.0 + cut
                .iter()
                .filter(|u| !pis.contains(*u))
                .map(|u| area_flow.get(u).copied().unwrap_or(0.0) / refcount(u) as f64)
                .sum::<f64>()
        };

        // Depth-preserving filter: only cuts that do not exceed v's label.
        let admissible: Vec<usize> = (0..node_cuts.len())
            .filter(|&i| depths[i] <= label_v)
            .collect();

        let pick_from = if admissible.is_empty() {
            // labels/cut_depth disagree with cuts' own structure (only
            // reachable via inconsistent caller-supplied inputs). Fall back
            // to the minimum-depth cuts instead.
            let min_depth = depths.iter().copied().min();
            match min_depth {
                Some(min_depth) => (0..node_cuts.len()).filter(|&i| depths[i] == min_depth).collect(),
                None => return Err(AreaError::NoCutsAvailable(v.clone())),
            }
        } else {
            admissible
        };

        let mut best: Option<(f64, &NodeSet<N>)> = None;
        for &i in &pick_from {
            let c = &node_cuts[i];
            let candidate = (cost(c), c);
            best = Some(match best {
                None => candidate,
                Some(cur) => pick_better(cur, candidate),
            });
        }
        let (best_cost, best_cut) = best.ok_or_else(|| AreaError::NoCutsAvailable(v.clone()))?;

        debug!(node = ?v, cost = best_cost, size = best_cut.len(), "chosen cut");
        chosen.insert(v.clone(), best_cut.clone());
        area_flow.insert(v.clone(), best_cost);
    }

    Ok((chosen, area_flow))
}

/// Deterministic tie-break: smaller cost wins; ties prefer the smaller cut,
/// then the lexicographically smaller cut (`NodeSet`'s `Ord`).
fn pick_better<'a, N: Ord>(
    a: (f64, &'a NodeSet<N>),
    b: (f64, &'a NodeSet<N>),
) -> (f64, &'a NodeSet<N>) {
    if a.0 < b.0 {
        a
    } else if b.0 < a.0 {
        b
    } else if a.1.len() != b.1.len() {
        if a.1.len() < b.1.len() {
            a
        } else {
            b
        }
    } else if a.1 <= b.1 {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuts::enumerate_cuts;
    use crate::dag::{topological_order, Graph};
    use crate::label::label;
    use crate::testutil;

    fn pipeline(
        g: &Graph<&'static str>,
        k: usize,
    ) -> (
        Vec<&'static str>,
        std::collections::BTreeSet<&'static str>,
        BTreeMap<&'static str, Vec<&'static str>>,
        Cuts<&'static str>,
        Labels<&'static str>,
        CutDepths<&'static str>,
    ) {
        let (order, fanouts) = topological_order(g).unwrap();
        let pis = g.primary_inputs();
        let cuts = enumerate_cuts(g, &order, &pis, k, None, false).unwrap();
        let (labels, depths) = label(&order, &pis, &cuts).unwrap();
        (order, pis, fanouts, cuts, labels, depths)
    }

    #[test]
    fn depth_preserved_after_recovery() {
        let g = testutil::and_or();
        let (order, pis, fanouts, cuts, labels, depths) = pipeline(&g, 3);
        let (chosen, _) = area_recover(&order, &pis, &fanouts, &cuts, &labels, &depths).unwrap();
        let cut_depth_of = |v: &str| -> u32 {
            let idx = cuts[v].iter().position(|c| c == &chosen[v]).unwrap();
            depths[v][idx]
        };
        for v in ["and1", "or1"] {
            assert!(cut_depth_of(v) <= labels[v]);
        }
    }

    #[test]
    fn idempotent_on_its_own_output() {
        let g = testutil::and_or();
        let (order, pis, fanouts, cuts, labels, depths) = pipeline(&g, 3);
        let (chosen1, af1) = area_recover(&order, &pis, &fanouts, &cuts, &labels, &depths).unwrap();
        let (chosen2, af2) = area_recover(&order, &pis, &fanouts, &cuts, &labels, &depths).unwrap();
        assert_eq!(chosen1, chosen2);
        assert_eq!(af1, af2);
    }

    #[test]
    fn sharing_is_rewarded_via_refcount() {
        // and1 feeds both xor1 and or1: refcount(and1) = 2.
        let g = testutil::reconvergent();
        let (order, pis, fanouts, cuts, labels, depths) = pipeline(&g, 3);
        assert_eq!(fanouts["and1"].len(), 2);
        let (_, af) = area_recover(&order, &pis, &fanouts, &cuts, &labels, &depths).unwrap();
        assert!(af["and1"] > 0.0);
    }
}
