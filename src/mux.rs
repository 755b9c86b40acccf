//! External collaborator: a k:1 multiplexer DAG builder.
//!
//! This is not part of the mapping engine — it is a graph *producer*, used
//! to generate realistic test networks. Its only contract is to emit a
//! valid DAG and a primary-output list; the engine never inspects the
//! `gate_type` annotations it also returns.
//!
//! The final OR is decomposed into a tree of 2-input ORs rather than one
//! wide OR over every AND-path: a wide OR would force the caller into a
//! `NoFeasibleCut` failure at small K, so the builder sidesteps it up
//! front.

use std::collections::BTreeMap;

use crate::dag::Graph;

/// Structural role of a node produced by [`build_mux`]. The mapping engine
/// ignores this; it exists purely for callers that want to pretty-print or
/// otherwise inspect the generated netlist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateType {
    /// A primary input (data or select line).
    PrimaryInput,
    /// A two-input AND gate.
    And,
    /// A two-input OR gate.
    Or,
    /// A single-input NOT gate.
    Not,
}

/// Build a `k`-input, 1-output multiplexer as an AND/OR/NOT gate network.
///
/// Data inputs are named `D0..D(k-1)`, select inputs `S0..S(sel_bits-1)`
/// where `sel_bits = ceil(log2(k))`. For each data line `i`, an AND gate
/// combines `D_i` with the select literals that select index `i` (a `NOT`
/// of the corresponding select line wherever `i`'s binary encoding has a
/// `0` bit). The `k` AND outputs are then combined via a tree of 2-input OR
/// gates so that the final network stays small-K-feasible regardless of
/// `k`, rather than via one wide `OR`.
///
/// Returns `(graph, outputs, gate_type)`.
pub fn build_mux(k: usize) -> (Graph<String>, Vec<String>, BTreeMap<String, GateType>) {
    let mut graph: Graph<String> = Graph::new();
    let mut gate_type: BTreeMap<String, GateType> = BTreeMap::new();

    for i in 0..k {
        let name = format!("D{i}");
        graph.insert(name.clone(), vec![]);
        gate_type.insert(name, GateType::PrimaryInput);
    }

    let sel_bits = if k <= 1 { 0 } else { (usize::BITS - (k - 1).leading_zeros()) as usize };
    for i in 0..sel_bits {
        let name = format!("S{i}");
        graph.insert(name.clone(), vec![]);
        gate_type.insert(name, GateType::PrimaryInput);
    }

    let mut not_count = 1usize;
    let mut and_count = 1usize;
    let mut and_nodes = Vec::with_capacity(k);

    for i in 0..k {
        let binary = format!("{:0width$b}", i, width = sel_bits);
        let mut and_inputs = Vec::with_capacity(sel_bits + 1);
        for (j, bit) in binary.chars().enumerate() {
            if bit == '1' {
                and_inputs.push(format!("S{j}"));
            } else {
                let not_name = format!("not{not_count}");
                graph.insert(not_name.clone(), vec![format!("S{j}")]);
                gate_type.insert(not_name.clone(), GateType::Not);
                not_count += 1;
                and_inputs.push(not_name);
            }
        }
        and_inputs.push(format!("D{i}"));

        let and_node = format!("and{and_count}");
        graph.insert(and_node.clone(), and_inputs);
        gate_type.insert(and_node.clone(), GateType::And);
        and_nodes.push(and_node);
        and_count += 1;
    }

    let mut current_layer = and_nodes;
    let mut or_gate_count = 1usize;
    while current_layer.len() > 1 {
        let mut next_layer = Vec::with_capacity(current_layer.len().div_ceil(2));
        for chunk in current_layer.chunks(2) {
            if chunk.len() == 1 {
                next_layer.push(chunk[0].clone());
            } else {
                let or_name = format!("or{or_gate_count}");
                graph.insert(or_name.clone(), chunk.to_vec());
                gate_type.insert(or_name.clone(), GateType::Or);
                next_layer.push(or_name);
                or_gate_count += 1;
            }
        }
        current_layer = next_layer;
    }

    let out = current_layer.into_iter().next().unwrap_or_else(|| "D0".to_string());
    (graph, vec![out], gate_type)
}
