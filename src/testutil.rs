//! Shared test fixtures (private, `#[cfg(test)]`-only).
//!
//! The same handful of small graphs recur across every phase's test module
//! (cut enumeration, labeling, area recovery, cover construction, the
//! orchestrator): rather than hand-duplicating the literal `Graph::from_pairs`
//! calls in each file, they live here once behind `pub(crate)` visibility.

#![cfg(test)]

use crate::dag::Graph;

/// The S1/S2 fixture (spec §8): `{a, b, c}` primary inputs, `and1 = a & b`,
/// `or1 = and1 | c`. At `K=2` this yields two LUTs; at `K=3` `or1`'s cut
/// `{a, b, c}` absorbs `and1`.
pub(crate) fn and_or() -> Graph<&'static str> {
    Graph::from_pairs([
        ("a", vec![]),
        ("b", vec![]),
        ("c", vec![]),
        ("and1", vec!["a", "b"]),
        ("or1", vec!["and1", "c"]),
    ])
}

/// The S3 reconvergent fixture (spec §8): `and1` and `and2` feed both
/// `xor1` and `or1`, which converge at `out`. `and1` is shared between
/// `xor1` and `or1`, giving it a refcount of 2.
pub(crate) fn reconvergent() -> Graph<&'static str> {
    Graph::from_pairs([
        ("a", vec![]),
        ("b", vec![]),
        ("c", vec![]),
        ("d", vec![]),
        ("and1", vec!["a", "b"]),
        ("and2", vec!["c", "d"]),
        ("xor1", vec!["and1", "and2"]),
        ("or1", vec!["and1", "c"]),
        ("out", vec!["xor1", "or1"]),
    ])
}

/// A chain of `n` unary pass-through nodes `n1..nN` stacked above a single
/// primary input `n0`, used to exercise the boundary case of a single long
/// path (spec §8: "labels 0..n, one LUT per non-PI").
pub(crate) fn chain(n: usize) -> Graph<&'static str> {
    let mut g = Graph::new();
    g.insert("n0", vec![]);
    let mut prev: &'static str = "n0";
    for i in 1..=n {
        let name: &'static str = Box::leak(format!("n{i}").into_boxed_str());
        g.insert(name, vec![prev]);
        prev = name;
    }
    g
}
