//! Orchestration of a codeword generation run.
//!
//! [`ConstraintEngine`] is a state machine over the stages of a run:
//!
//! ```text
//! Empty -> PatternGridBuilt -> Grown -> GcFiltered -> JunctionFiltered -> Final
//! ```
//!
//! Every transition consumes the engine, and calling a transition from the
//! wrong stage is a [`KaosError::InvalidStage`] error. Pattern sources (the
//! homopolymer constraint and the motif set) are grown independently on the
//! crate thread pool and merged once they reach the word length.
//!
//! # Example
//!
//! ```
//! use ckaos::prelude::*;
//!
//! let config = EngineConfig::new(2).with_homopolymer(Some(2));
//! let result = ConstraintEngine::run(config, &MotifSet::new(), &NoopMonitor).unwrap();
//! assert_eq!(result.n_codewords(), 12);
//! assert_eq!(result.ratio(), 0.75);
//! ```

mod config;
mod monitor;

use std::collections::BTreeMap;
use std::fmt::Display;

pub use config::{
    EngineConfig,
    DEFAULT_MAX_CELLS,
};
use itertools::Itertools;
use log::{
    debug,
    info,
    warn,
};
pub use monitor::{
    GrowthMonitor,
    NoopMonitor,
};
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::cgr::CodewordTable;
use crate::data_structs::typedef::Zoom;
use crate::data_structs::{
    lattice_cells,
    DnaSequence,
    Grid,
    MotifSet,
};
use crate::error::{
    KaosError,
    Result,
};
use crate::tools::gc::{
    GcSelection,
    GcTarget,
};
use crate::tools::junction::JunctionSet;
use crate::utils::{
    n_threads,
    THREAD_POOL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineStage {
    Empty,
    PatternGridBuilt,
    Grown,
    GcFiltered,
    JunctionFiltered,
    Final,
}

impl Display for EngineStage {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let name = match self {
            EngineStage::Empty => "empty",
            EngineStage::PatternGridBuilt => "pattern grid built",
            EngineStage::Grown => "grown",
            EngineStage::GcFiltered => "GC filtered",
            EngineStage::JunctionFiltered => "junction filtered",
            EngineStage::Final => "final",
        };
        write!(f, "{}", name)
    }
}

fn check_cells(
    zoom: Zoom,
    cells: usize,
    limit: usize,
) -> Result<()> {
    if cells > limit {
        return Err(KaosError::ResourceExhaustion { zoom, cells, limit });
    }
    Ok(())
}

/// Forbidden patterns of one constraint, bucketed by zoom.
#[derive(Debug, Clone)]
pub struct PatternSource {
    name:    String,
    by_zoom: BTreeMap<Zoom, Grid>,
}

impl PatternSource {
    pub fn homopolymer(hp: usize) -> Result<Self> {
        let grid = Grid::homopolymer(hp)?;
        Ok(Self {
            name:    format!("homopolymer({})", hp),
            by_zoom: BTreeMap::from([(hp, grid)]),
        })
    }

    pub fn from_motifs(
        name: impl Into<String>,
        motifs: &MotifSet,
    ) -> Result<Self> {
        let by_zoom = motifs
            .buckets()
            .map(|(length, set)| Grid::from_sequences(set, length).map(|g| (length, g)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self {
            name: name.into(),
            by_zoom,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_zoom(&self) -> Option<Zoom> {
        self.by_zoom.keys().next().copied()
    }

    /// Grows the patterns to `target`, returning the cells of every word of
    /// that length containing at least one pattern.
    ///
    /// Starting at the smallest pattern zoom, the patterns of each zoom are
    /// added to the accumulator before it is grown to the next zoom.
    pub fn grow(
        &self,
        target: Zoom,
        max_cells: usize,
        monitor: &dyn GrowthMonitor,
    ) -> Result<Grid> {
        let Some(start) = self.min_zoom() else {
            return Grid::empty(target);
        };
        if start > target {
            return Err(KaosError::invalid_length(format!(
                "{} holds patterns of length {}, longer than the word length {}",
                self.name, start, target
            )));
        }

        let mut acc = Grid::empty(start)?;
        for zoom in start..=target {
            if monitor.is_cancelled() {
                return Err(KaosError::Cancelled { zoom });
            }
            if zoom > start {
                check_cells(zoom, acc.n_cells().saturating_mul(4), max_cells)?;
                acc = acc.grow()?;
            }
            if let Some(patterns) = self.by_zoom.get(&zoom) {
                acc.add(patterns)?;
            }
            check_cells(zoom, acc.n_cells(), max_cells)?;

            debug!(
                "{}: zoom {}/{} holds {} forbidden cells",
                self.name,
                zoom,
                target,
                acc.n_cells()
            );
            monitor.on_step(&self.name, zoom, target);
        }
        Ok(acc)
    }
}

/// Counters collected over a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSummary {
    pub word_length:     usize,
    pub homopolymer:     Option<usize>,
    pub gc:              GcTarget,
    pub lexicographic:   bool,
    pub n_motifs:        usize,
    pub dropped_motifs:  Vec<DnaSequence>,
    pub forbidden_cells: usize,
    pub gc_rows:         usize,
    pub junction_grids:  usize,
    pub n_codewords:     usize,
    pub ratio:           f64,
}

impl EngineSummary {
    fn new(config: &EngineConfig) -> Self {
        Self {
            word_length:     config.word_length,
            homopolymer:     config.homopolymer,
            gc:              config.gc,
            lexicographic:   config.lexicographic,
            n_motifs:        0,
            dropped_motifs:  Vec::new(),
            forbidden_cells: 0,
            gc_rows:         0,
            junction_grids:  0,
            n_codewords:     0,
            ratio:           0.0,
        }
    }

    /// Writes the summary as pretty-printed JSON.
    pub fn write_json<W: std::io::Write>(
        &self,
        writer: W,
    ) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

pub struct ConstraintEngine {
    config:          EngineConfig,
    stage:           EngineStage,
    sources:         Vec<PatternSource>,
    junction_motifs: MotifSet,
    grid:            Option<Grid>,
    summary:         EngineSummary,
}

impl ConstraintEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Generating codewords of length {} (homopolymer: {:?}, GC: {}, \
             lexicographic: {})",
            config.word_length, config.homopolymer, config.gc, config.lexicographic
        );
        Ok(Self {
            summary: EngineSummary::new(&config),
            config,
            stage: EngineStage::Empty,
            sources: Vec::new(),
            junction_motifs: MotifSet::new(),
            grid: None,
        })
    }

    /// Runs every stage.
    pub fn run(
        config: EngineConfig,
        motifs: &MotifSet,
        monitor: &dyn GrowthMonitor,
    ) -> Result<ConstrainedGrid> {
        Self::new(config)?
            .build_patterns(motifs)?
            .grow(monitor)?
            .filter_gc()?
            .filter_junctions()?
            .finish()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stage(&self) -> EngineStage {
        self.stage
    }

    /// Current grid. Forbidden cells after [`ConstraintEngine::grow`],
    /// allowed cells after [`ConstraintEngine::filter_gc`].
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn sources(&self) -> &[PatternSource] {
        &self.sources
    }

    fn expect_stage(
        &self,
        expected: EngineStage,
    ) -> Result<()> {
        if self.stage != expected {
            return Err(KaosError::InvalidStage {
                expected,
                found: self.stage,
            });
        }
        Ok(())
    }

    fn take_grid(&mut self) -> Result<Grid> {
        match self.grid.take() {
            Some(grid) => Ok(grid),
            None => Grid::empty(self.config.word_length),
        }
    }

    /// Registers the homopolymer constraint and the forbidden motifs.
    ///
    /// Motifs longer than the word length can not occur in a codeword and
    /// are dropped.
    pub fn build_patterns(
        mut self,
        motifs: &MotifSet,
    ) -> Result<Self> {
        self.expect_stage(EngineStage::Empty)?;
        let word_length = self.config.word_length;

        let mut motifs = motifs.clone();
        let dropped = motifs.retain_max_length(word_length);
        for motif in dropped.iter() {
            warn!(
                "Motif {} is longer than the word length {} and will be dismissed",
                motif, word_length
            );
        }

        if let Some(hp) = self.config.homopolymer {
            self.sources.push(PatternSource::homopolymer(hp)?);
        }
        if !motifs.is_empty() {
            self.sources.push(PatternSource::from_motifs("motifs", &motifs)?);
        }

        if self.config.lexicographic {
            let mut junction_motifs = motifs.clone();
            if let Some(hp) = self.config.homopolymer {
                junction_motifs.extend(MotifSet::homopolymers(hp)?);
            }
            self.junction_motifs = junction_motifs;
        }

        info!(
            "Built {} pattern sources from {} motifs ({} dismissed)",
            self.sources.len(),
            motifs.len(),
            dropped.len()
        );
        self.summary.n_motifs = motifs.len();
        self.summary.dropped_motifs = dropped;
        self.stage = EngineStage::PatternGridBuilt;
        Ok(self)
    }

    /// Grows every pattern source to the word length and merges them.
    pub fn grow(
        mut self,
        monitor: &dyn GrowthMonitor,
    ) -> Result<Self> {
        self.expect_stage(EngineStage::PatternGridBuilt)?;
        let word_length = self.config.word_length;
        let max_cells = self.config.max_cells;
        debug!(
            "Growing {} pattern sources on {} threads",
            self.sources.len(),
            n_threads()
        );

        let grown = THREAD_POOL.install(|| {
            self.sources
                .par_iter()
                .map(|source| source.grow(word_length, max_cells, monitor))
                .collect::<Result<Vec<_>>>()
        })?;

        let mut grid = Grid::empty(word_length)?;
        for source_grid in grown.iter() {
            grid.add(source_grid)?;
        }
        check_cells(word_length, grid.n_cells(), max_cells)?;

        info!(
            "Grown grid at word length {} forbids {} of {} cells",
            word_length,
            grid.n_cells(),
            lattice_cells(word_length)
        );
        self.summary.forbidden_cells = grid.n_cells();
        self.grid = Some(grid);
        self.stage = EngineStage::Grown;
        Ok(self)
    }

    /// Keeps the rows satisfying the GC target and turns the grid into the
    /// set of allowed cells.
    pub fn filter_gc(mut self) -> Result<Self> {
        self.expect_stage(EngineStage::Grown)?;
        let selection = GcSelection::compute(self.config.word_length, &self.config.gc)?;
        let grid = self.take_grid()?;

        let allowed = grid.count_allowed(&selection)?;
        check_cells(self.config.word_length, allowed, self.config.max_cells)?;
        let grid = grid.filter_gc(&selection)?;

        info!(
            "GC filter kept {} rows, {} allowed cells",
            selection.len(),
            grid.n_cells()
        );
        self.summary.gc_rows = selection.len();
        self.grid = Some(grid);
        self.stage = EngineStage::GcFiltered;
        Ok(self)
    }

    /// Removes cells that could recreate a motif across the junction of two
    /// codewords. Passes the grid through unless the run is lexicographic.
    pub fn filter_junctions(mut self) -> Result<Self> {
        self.expect_stage(EngineStage::GcFiltered)?;
        if self.config.lexicographic {
            let junctions = JunctionSet::build_bounded(
                self.config.word_length,
                &self.junction_motifs,
                self.config.max_cells,
            )?;
            let mut grid = self.take_grid()?;
            let before = grid.n_cells();
            grid.filter_junctions(&junctions)?;
            info!(
                "Junction filter removed {} cells using {} grids",
                before - grid.n_cells(),
                junctions.len()
            );
            self.summary.junction_grids = junctions.len();
            self.grid = Some(grid);
        }
        self.stage = EngineStage::JunctionFiltered;
        Ok(self)
    }

    pub fn finish(mut self) -> Result<ConstrainedGrid> {
        self.expect_stage(EngineStage::JunctionFiltered)?;
        let grid = self.take_grid()?;
        self.stage = EngineStage::Final;

        self.summary.n_codewords = grid.n_cells();
        self.summary.ratio = grid.ratio();
        info!(
            "Ratio of allowed sequences: {:.4} % ({} codewords)",
            self.summary.ratio * 100.0,
            self.summary.n_codewords
        );
        Ok(ConstrainedGrid {
            config: self.config,
            grid,
            summary: self.summary,
        })
    }
}

/// Final grid of allowed codewords.
#[derive(Debug, Clone)]
pub struct ConstrainedGrid {
    config:  EngineConfig,
    grid:    Grid,
    summary: EngineSummary,
}

impl ConstrainedGrid {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Fraction of all words of the word length that are allowed.
    pub fn ratio(&self) -> f64 {
        self.grid.ratio()
    }

    pub fn n_codewords(&self) -> usize {
        self.grid.n_cells()
    }

    pub fn summary(&self) -> &EngineSummary {
        &self.summary
    }

    pub fn codewords(&self) -> Result<CodewordTable> {
        CodewordTable::from_grid(&self.grid)
    }

    /// Allowed codewords in lexicographic order.
    pub fn sorted_codewords(&self) -> Result<Vec<DnaSequence>> {
        Ok(self.codewords()?.sequences().cloned().collect_vec())
    }
}
