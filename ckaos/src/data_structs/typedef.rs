/// Row or column index inside a [`Grid`](super::Grid). Indices are 1-based.
pub type CellIdx = u32;
/// Resolution of a grid: log2 of its side, equal to the word length it
/// represents.
pub type Zoom = usize;

/// Longest codeword supported. A grid at this zoom has a side of 65536 and
/// up to 2^32 cells, far beyond what fits in memory when dense; the
/// per-run cell limit of the engine is the practical bound.
pub const MAX_WORD_LENGTH: usize = 16;

/// Side length of a grid at `zoom`.
pub fn side_for_zoom(zoom: Zoom) -> CellIdx {
    1 << zoom
}
