//! Orchestrator (component F).
//!
//! Wires components A–E into one pipeline behind a single configuration.
//! `Engine::run` is the crate's one intended entry point for ordinary
//! callers; the phase functions in `dag`/`cuts`/`label`/`area`/`cover` stay
//! public for callers who need to re-run or inspect a single phase (for
//! instance, to check that area recovery is idempotent on its own output).

use std::collections::BTreeMap;

use tracing::info_span;

use crate::area::{self, AreaError, AreaFlow, ChosenCuts};
use crate::cover::{self, CoverError, Lut};
use crate::cuts::{self, CutsError};
use crate::dag::{self, DagError, Graph};
use crate::label::{self, LabelError, Labels};

/// Mapping configuration: everything a run of the pipeline needs beyond the
/// graph itself.
#[derive(Clone, Debug)]
pub struct MapConfig<N> {
    k: usize,
    cut_limit: Option<usize>,
    outputs: Option<Vec<N>>,
    verbose: bool,
    vendor_pack_shortcut: bool,
}

impl<N> MapConfig<N> {
    /// A config with the given LUT input bound and every other option at
    /// its default (no cut limit, auto-detected outputs, not verbose, the
    /// vendor-pack shortcut off).
    pub fn new(k: usize) -> Self {
        MapConfig {
            k,
            cut_limit: None,
            outputs: None,
            verbose: false,
            vendor_pack_shortcut: false,
        }
    }

    /// Cap the number of cuts retained per node.
    pub fn cut_limit(mut self, limit: usize) -> Self {
        self.cut_limit = Some(limit);
        self
    }

    /// Supply an explicit primary-output list instead of auto-detecting it.
    pub fn outputs(mut self, outputs: Vec<N>) -> Self {
        self.outputs = Some(outputs);
        self
    }

    /// Enable the verbose diagnostic trace convenience (installs a default
    /// `tracing` subscriber before the run starts).
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable the non-default, depth-suboptimal-in-general vendor-pack
    /// shortcut.
    pub fn vendor_pack_shortcut(mut self, enabled: bool) -> Self {
        self.vendor_pack_shortcut = enabled;
        self
    }
}

/// The complete output of a mapping run.
#[derive(Clone, Debug)]
pub struct MapResult<N: Ord> {
    /// Depth label of every node, PIs included (always `0`).
    pub labels: Labels<N>,
    /// The chosen cut for every non-PI node, as a plain sorted `Vec<N>`.
    pub chosen_cut: BTreeMap<N, Vec<N>>,
    /// The LUT cover, sorted by `(level, output)`.
    pub luts: Vec<Lut<N>>,
    /// Area-flow value of every node (component D's `af`), PIs included
    /// (always `0`).
    pub area_flow: AreaFlow<N>,
}

/// The orchestrator's public error type, composing each phase's error.
#[derive(Debug, thiserror::Error)]
pub enum MapError<N> {
    /// `K < 1`: no cut can ever be feasible.
    #[error("K must be >= 1")]
    InvalidK,
    /// Component A failed.
    #[error(transparent)]
    Dag(#[from] DagError<N>),
    /// Component B failed.
    #[error(transparent)]
    Cuts(#[from] CutsError<N>),
    /// Component C failed.
    #[error(transparent)]
    Label(#[from] LabelError<N>),
    /// Component D failed.
    #[error(transparent)]
    Area(#[from] AreaError<N>),
    /// Component E failed.
    #[error(transparent)]
    Cover(#[from] CoverError<N>),
}

/// The mapping engine: a configuration paired with the A→B→C→D→E pipeline.
pub struct Engine<N> {
    config: MapConfig<N>,
}

impl<N: Ord + Clone + std::fmt::Debug> Engine<N> {
    /// Build an engine from a configuration.
    pub fn new(config: MapConfig<N>) -> Self {
        Engine { config }
    }

    /// Run the full pipeline against `graph`.
    pub fn run(&self, graph: &Graph<N>) -> Result<MapResult<N>, MapError<N>> {
        if self.config.k < 1 {
            return Err(MapError::InvalidK);
        }
        if self.config.verbose {
            crate::diag::install_default_subscriber();
        }

        let (order, fanouts) = {
            let _span = info_span!("topological_order").entered();
            dag::topological_order(graph)?
        };
        let pis = graph.primary_inputs();
        let outputs = self
            .config
            .outputs
            .clone()
            .unwrap_or_else(|| graph.detect_outputs());

        let cuts = {
            let _span = info_span!("enumerate_cuts").entered();
            cuts::enumerate_cuts(
                graph,
                &order,
                &pis,
                self.config.k,
                self.config.cut_limit,
                self.config.vendor_pack_shortcut,
            )?
        };

        let (labels, cut_depth) = {
            let _span = info_span!("label").entered();
            label::label(&order, &pis, &cuts)?
        };

        let (chosen_cut, area_flow): (ChosenCuts<N>, AreaFlow<N>) = {
            let _span = info_span!("area_recover").entered();
            area::area_recover(&order, &pis, &fanouts, &cuts, &labels, &cut_depth)?
        };

        let luts = {
            let _span = info_span!("build_cover").entered();
            cover::build_cover(&pis, &chosen_cut, &labels, &outputs)?
        };

        let chosen_cut_pub = chosen_cut
            .into_iter()
            .map(|(n, cut)| (n, cut.into_vec()))
            .collect();

        Ok(MapResult {
            labels,
            chosen_cut: chosen_cut_pub,
            luts,
            area_flow,
        })
    }
}

/// Run the full pipeline against `graph` with `config` — a free-function
/// convenience equivalent to `Engine::new(config).run(graph)`.
pub fn run<N: Ord + Clone + std::fmt::Debug>(
    graph: &Graph<N>,
    config: MapConfig<N>,
) -> Result<MapResult<N>, MapError<N>> {
    Engine::new(config).run(graph)
}
