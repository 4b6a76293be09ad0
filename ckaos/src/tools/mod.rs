//! Constraint machinery built on top of the [`Grid`](crate::data_structs::Grid).
//!
//! Key submodules:
//!
//! - [`gc`]: the GC row classifier ([`gc::GcSelection`]) and the
//!   [`gc::GcTarget`] it is computed from.
//! - [`junction`]: cells excluded so that no concatenation of two codewords
//!   recreates a forbidden motif across the boundary.
//! - [`engine`]: the staged [`engine::ConstraintEngine`] that grows the
//!   pattern grids to the word length and applies both filters.
//! - [`codebook`]: binary data to codewords and back.
//! - [`verify`]: direct, sequence-level constraint checks.
pub mod codebook;
pub mod engine;
pub mod gc;
pub mod junction;
pub mod verify;
