//! Depth-optimal K-LUT technology mapping with depth-preserving area
//! recovery.
//!
//! A combinational network (a DAG of gates over primary inputs) is mapped
//! onto K-input lookup tables in two passes:
//!
//! - **Labeling** ([`label`]) computes each node's minimum achievable depth
//!   given a K-feasibility bound, using cuts enumerated by [`cuts`].
//! - **Area recovery** ([`area`]) then re-selects, among the depth-optimal
//!   cuts, the ones that minimize an amortized LUT-count estimate, without
//!   increasing network depth.
//!
//! [`engine::Engine`] wires both passes (plus [`dag`]'s topological
//! ordering and [`cover`]'s back-trace) into one pipeline; most callers only
//! need `engine::run` or `Engine::new(..).run(..)`.

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// Canonical cut representation (`NodeSet`).
pub mod node;
/// DAG utilities: topological ordering, fanout construction, I/O detection.
pub mod dag;
/// Set-minimal K-feasible cut enumeration.
pub mod cuts;
/// Depth-optimal labeling (the FlowMap recurrence).
pub mod label;
/// Depth-preserving area-flow recovery (FlowMap-r).
pub mod area;
/// LUT cover construction by back-trace from the primary outputs.
pub mod cover;
/// Orchestrator: `MapConfig`, `Engine`, and the composed `MapError`.
pub mod engine;
/// Optional diagnostic subscriber installer.
pub mod diag;
/// A k:1 multiplexer network generator, useful for exercising the mapper
/// on a realistic, parametrically-sized test network.
pub mod mux;
#[cfg(test)]
mod testutil;

pub use cover::Lut;
pub use dag::Graph;
pub use engine::{run, Engine, MapConfig, MapError, MapResult};
pub use node::NodeSet;
