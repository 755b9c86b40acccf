//! Cover construction (component E).
//!
//! Back-traces the chosen cuts from every primary output to materialize the
//! final LUT list. A node is placed at most once; primary inputs are never
//! emitted as LUTs.

use std::collections::BTreeSet;

use crate::area::ChosenCuts;
use crate::label::Labels;

/// A single K-LUT: `output` computed from `inputs` (each either a primary
/// input or another LUT's output), realized at depth `level`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lut<N> {
    /// The node this LUT computes.
    pub output: N,
    /// Sorted LUT inputs, `|inputs| <= K`.
    pub inputs: Vec<N>,
    /// Depth label of `output`.
    pub level: u32,
}

/// Errors raised while building the cover.
#[derive(Debug, thiserror::Error)]
pub enum CoverError<N> {
    /// A caller-supplied output names a node that is neither a primary
    /// input nor has a computed label — it is not a node of the mapped
    /// graph at all.
    #[error("output {0:?} is not a node of the graph")]
    DanglingOutput(N),
}

/// Build the LUT cover by DFS from every output in `outputs`, sorted by
/// `(level, output)` ascending as required for deterministic presentation.
pub fn build_cover<N: Ord + Clone + std::fmt::Debug>(
    pis: &BTreeSet<N>,
    chosen_cut: &ChosenCuts<N>,
    labels: &Labels<N>,
    outputs: &[N],
) -> Result<Vec<Lut<N>>, CoverError<N>> {
    let mut covered: BTreeSet<N> = BTreeSet::new();
    let mut luts = Vec::new();

    for po in outputs {
        if pis.contains(po) {
            continue;
        }
        if !labels.contains_key(po) {
            return Err(CoverError::DanglingOutput(po.clone()));
        }

        let mut stack = vec![po.clone()];
        while let Some(v) = stack.pop() {
            if covered.contains(&v) || pis.contains(&v) {
                continue;
            }
            let cut = chosen_cut
                .get(&v)
                .ok_or_else(|| CoverError::DanglingOutput(v.clone()))?;
            let level = labels[&v];
            luts.push(Lut {
                output: v.clone(),
                inputs: cut.as_slice().to_vec(),
                level,
            });
            covered.insert(v.clone());
            for u in cut.iter() {
                if !pis.contains(u) && !covered.contains(u) {
                    stack.push(u.clone());
                }
            }
        }
    }

    luts.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.output.cmp(&b.output)));
    Ok(luts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::area_recover;
    use crate::cuts::enumerate_cuts;
    use crate::dag::{topological_order, Graph};
    use crate::label::label;
    use crate::testutil;

    fn map(g: &Graph<&'static str>, k: usize, outputs: &[&'static str]) -> Vec<Lut<&'static str>> {
        let (order, fanouts) = topological_order(g).unwrap();
        let pis = g.primary_inputs();
        let cuts = enumerate_cuts(g, &order, &pis, k, None, false).unwrap();
        let (labels, depths) = label(&order, &pis, &cuts).unwrap();
        let (chosen, _) = area_recover(&order, &pis, &fanouts, &cuts, &labels, &depths).unwrap();
        build_cover(&pis, &chosen, &labels, outputs).unwrap()
    }

    #[test]
    fn s1_k2_cover() {
        let g = testutil::and_or();
        let luts = map(&g, 2, &["or1"]);
        assert_eq!(luts.len(), 2);
        assert_eq!(luts[0].output, "and1");
        assert_eq!(luts[0].inputs, vec!["a", "b"]);
        assert_eq!(luts[1].output, "or1");
        assert_eq!(luts[1].inputs, vec!["and1", "c"]);
    }

    #[test]
    fn s2_k3_absorbs_and1() {
        let g = testutil::and_or();
        let luts = map(&g, 3, &["or1"]);
        assert_eq!(luts.len(), 1);
        assert_eq!(luts[0].output, "or1");
        assert_eq!(luts[0].inputs, vec!["a", "b", "c"]);
    }

    #[test]
    fn no_node_emitted_twice_with_shared_fanin() {
        let g = testutil::reconvergent();
        let luts = map(&g, 3, &["out"]);
        let outputs: Vec<_> = luts.iter().map(|l| l.output).collect();
        let mut dedup = outputs.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(outputs.len(), dedup.len());
        assert!(luts.iter().all(|l| l.inputs.len() <= 3));
    }

    #[test]
    fn only_pi_graph_has_empty_cover() {
        let g = Graph::from_pairs([("a", vec![]), ("b", vec![])]);
        let luts = map(&g, 4, &["a", "b"]);
        assert!(luts.is_empty());
    }

    #[test]
    fn dangling_output_is_an_error() {
        let g = Graph::from_pairs([("a", vec![])]);
        let (order, fanouts) = topological_order(&g).unwrap();
        let pis = g.primary_inputs();
        let cuts = enumerate_cuts(&g, &order, &pis, 2, None, false).unwrap();
        let (labels, depths) = label(&order, &pis, &cuts).unwrap();
        let (chosen, _) = area_recover(&order, &pis, &fanouts, &cuts, &labels, &depths).unwrap();
        let err = build_cover(&pis, &chosen, &labels, &["ghost"]).unwrap_err();
        assert!(matches!(err, CoverError::DanglingOutput("ghost")));
    }
}
