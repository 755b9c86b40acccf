//! Depth-optimal labeling (component C): the FlowMap recurrence.
//!
//! `labels[v]` is the minimum, over every enumerated K-feasible cut of `v`,
//! of one plus the deepest leaf's label. Because cut enumeration (component
//! B) already restricts candidates to set-minimal K-feasible cuts, taking
//! the minimum here is exactly FlowMap's classical depth-optimality result —
//! there is no further search to do.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::cuts::Cuts;

/// Errors raised while labeling.
///
/// Labeling cannot fail given a cut collection produced by
/// [`crate::cuts::enumerate_cuts`] over the same graph and topological
/// order; this type exists so a caller supplying its own (inconsistent)
/// cuts gets a precise error instead of a panic.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LabelError<N> {
    /// `order` names a node absent from `cuts`.
    #[error("node {0:?} has no entry in the supplied cut collection")]
    MissingCuts(N),
}

/// Node depth labels.
pub type Labels<N> = BTreeMap<N, u32>;

/// Per-node, per-cut depth table: `cut_depth[v][i]` is `1 + max` leaf label
/// for `cuts[v][i]`, computed for *every* enumerated cut (not only the
/// minimizer), since area recovery (component D) needs the whole table.
pub type CutDepths<N> = BTreeMap<N, Vec<u32>>;

/// Compute labels and the per-cut depth table for every node in `order`.
pub fn label<N: Ord + Clone + std::fmt::Debug>(
    order: &[N],
    pis: &BTreeSet<N>,
    cuts: &Cuts<N>,
) -> Result<(Labels<N>, CutDepths<N>), LabelError<N>> {
    let mut labels: Labels<N> = BTreeMap::new();
    let mut depths: CutDepths<N> = BTreeMap::new();

    for v in order {
        if pis.contains(v) {
            labels.insert(v.clone(), 0);
            depths.insert(v.clone(), vec![0]);
            continue;
        }

        let node_cuts = cuts.get(v).ok_or_else(|| LabelError::MissingCuts(v.clone()))?;
        let mut ds = Vec::with_capacity(node_cuts.len());
        let mut best: Option<u32> = None;
        for cut in node_cuts {
            let leaf_max = cut
                .iter()
                .map(|u| labels[u])
                .max()
                .expect("cuts are non-empty");
            let d = 1 + leaf_max;
            ds.push(d);
            best = Some(match best {
                None => d,
                Some(b) => b.min(d),
            });
        }
        let label_v = best.expect("non-PI node has at least one enumerated cut");
        debug!(node = ?v, label = label_v, "labeled");
        labels.insert(v.clone(), label_v);
        depths.insert(v.clone(), ds);
    }

    Ok((labels, depths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuts::enumerate_cuts;
    use crate::dag::topological_order;
    use crate::testutil;

    fn and_or(k: usize) -> (Labels<&'static str>, CutDepths<&'static str>) {
        let g = testutil::and_or();
        let (order, _) = topological_order(&g).unwrap();
        let pis = g.primary_inputs();
        let cuts = enumerate_cuts(&g, &order, &pis, k, None, false).unwrap();
        label(&order, &pis, &cuts).unwrap()
    }

    #[test]
    fn s1_k2_labels() {
        let (labels, _) = and_or(2);
        assert_eq!(labels["a"], 0);
        assert_eq!(labels["b"], 0);
        assert_eq!(labels["c"], 0);
        assert_eq!(labels["and1"], 1);
        assert_eq!(labels["or1"], 2);
    }

    #[test]
    fn s2_k3_collapses_depth() {
        let (labels, _) = and_or(3);
        assert_eq!(labels["and1"], 1);
        assert_eq!(labels["or1"], 1);
    }

    #[test]
    fn cut_depth_recorded_for_every_cut_not_only_minimizer() {
        let (labels, depths) = and_or(3);
        let or1_depths = &depths["or1"];
        assert_eq!(or1_depths.len(), 2); // {and1,c} and {a,b,c}
        assert!(or1_depths.contains(&1));
        assert!(or1_depths.contains(&2));
        assert_eq!(labels["or1"], 1);
    }

    #[test]
    fn reconvergent_depths_s3() {
        let g = testutil::reconvergent();
        let (order, _) = topological_order(&g).unwrap();
        let pis = g.primary_inputs();
        let cuts = enumerate_cuts(&g, &order, &pis, 3, None, false).unwrap();
        let (labels, _) = label(&order, &pis, &cuts).unwrap();
        assert_eq!(labels["and1"], 1);
        assert_eq!(labels["and2"], 1);
        assert_eq!(labels["xor1"], 2);
        assert_eq!(labels["or1"], 2);
        assert_eq!(labels["out"], 3);
    }
}
