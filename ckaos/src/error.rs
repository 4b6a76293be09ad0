//! Error type shared by the core of the crate.
//!
//! Every failure here is a precondition failure on deterministic input, so
//! none of the variants is retryable: the same input fails the same way.

use thiserror::Error;

use crate::tools::engine::EngineStage;

#[derive(Error, Debug)]
pub enum KaosError {
    /// A symbol outside of `{A, C, G, T}` (case-insensitive).
    #[error("Invalid nucleotide {symbol:?} at position {position}")]
    InvalidAlphabet { symbol: char, position: usize },

    /// Zero word length, pattern longer than the word, zoom mismatch.
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// Zero grid side, index outside of the grid, degenerate GC target.
    #[error("Arithmetic domain error: {0}")]
    ArithmeticDomain(String),

    #[error(
        "Grid at zoom {zoom} would hold {cells} cells, which exceeds the limit \
         of {limit}; reduce the word length or raise the cell limit"
    )]
    ResourceExhaustion {
        zoom:  usize,
        cells: usize,
        limit: usize,
    },

    #[error("Engine is in stage {found:?}, expected {expected:?}")]
    InvalidStage {
        expected: EngineStage,
        found:    EngineStage,
    },

    #[error("Grid growth cancelled at zoom {zoom}")]
    Cancelled { zoom: usize },

    /// Codeword or motif record that can not be interpreted.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KaosError {
    pub fn invalid_length(message: impl Into<String>) -> Self {
        Self::InvalidLength(message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::ArithmeticDomain(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRecord(message.into())
    }
}

pub type Result<T> = std::result::Result<T, KaosError>;
