//! File formats: FASTA motif input and the codeword records written by a
//! run, optionally compressed.
pub mod codewords;
#[cfg(feature = "compression")]
pub mod compression;
pub mod fasta;
