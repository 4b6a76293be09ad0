//! Core data structures of the crate.
//!
//! - [`Nucleotide`] and [`DnaSequence`]: validated DNA over `{A, C, G, T}`.
//! - [`MotifSet`]: forbidden motifs bucketed by length.
//! - [`Grid`]: the sparse power-of-two matrix over the chaos game
//!   representation (mCGR) that all constraints are expressed in.
//! - [`typedef`]: index types and the supported word length ceiling.

mod enums;
mod grid;
mod sequence;
pub mod typedef;


pub use enums::Nucleotide;
pub(crate) use grid::lattice_cells;
pub use grid::Grid;
pub use sequence::{
    DnaSequence,
    MotifSet,
};
