//! # ckaos
//!
//! `ckaos` generates maximal sets of fixed-length DNA codewords that avoid
//! homopolymer runs and forbidden motifs, optionally avoid recreating those
//! motifs across the junction of two codewords, and satisfy a GC-content
//! target. It is meant for designing DNA data-storage and barcoding schemes.
//!
//! All constraints are expressed on the chaos game representation (CGR) of
//! DNA. Every sequence of length `n` owns exactly one cell of a `2^n × 2^n`
//! lattice, and forbidding a motif of length `k` is a fixed pattern of cells
//! at resolution `k` that can be grown to resolution `n` by doubling and
//! tiling. Enumerating `4^n` words is never needed.
//!
//! If you do not want to use ckaos as crate, check out the `ckaos` command
//! line tool in the `ckaos-ci` package.
//!
//! ## Key Features
//!
//! * **Exact CGR**: forward ([`CgrPoint`]) and inverse ([`decode`]) maps in
//!   exact rational arithmetic.
//! * **Sparse grids**: [`Grid`] stores only marked cells, row by row.
//! * **Staged engine**: [`ConstraintEngine`] grows independent pattern
//!   sources in parallel with Rayon, then applies the GC and junction
//!   filters.
//! * **I/O**: FASTA motif input and codeword output through `bio`, with
//!   optional compression (feature `compression`, enabled by default).
//! * **Codebooks**: [`Codebook`] maps binary data to codewords and back.
//! * **Plots**: HTML scatter of a grid with `plotly` (feature `plots`).
//!
//! Number of threads to be used can be configured with setting
//! `CKAOS_NUM_THREADS` environment variable.
//!
//! ## Structure
//!
//! * [`data_structs`]: nucleotides, sequences, motif sets and the grid.
//! * [`cgr`]: forward and inverse chaos game maps.
//! * [`tools`]: GC classifier, junction analysis, the engine, codebooks and
//!   sequence-level checks.
//! * [`io`]: FASTA motif reading, codeword records and compression.
//! * [`plots`]: grid scatter plots.
//! * [`utils`]: thread pool and helper macros.
//!
//! ## Usage
//!
//! ```no_run
//! use ckaos::io::codewords::CodewordWriter;
//! use ckaos::io::fasta::read_motifs_from_path;
//! use ckaos::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let motifs = read_motifs_from_path("motifs.fa")?;
//!     let config = EngineConfig::new(8)
//!         .with_homopolymer(Some(3))
//!         .with_gc(GcTarget::Range { start: 0.4, end: 0.6 })
//!         .with_lexicographic(true);
//!
//!     let result = ConstraintEngine::run(config, &motifs, &NoopMonitor)?;
//!     println!("{} codewords, ratio {}", result.n_codewords(), result.ratio());
//!
//!     let mut writer = CodewordWriter::from_path("codewords.fa")?;
//!     writer.write_table(&result.codewords()?)?;
//!     writer.flush()?;
//!     Ok(())
//! }
//! ```

pub mod cgr;
pub mod data_structs;
pub mod error;
pub mod io;
pub mod plots;
pub mod prelude;
pub mod tools;
pub mod utils;

pub use cgr::{
    decode,
    CgrPoint,
};
pub use data_structs::Grid;
pub use error::{
    KaosError,
    Result,
};
pub use tools::codebook::Codebook;
pub use tools::engine::ConstraintEngine;
