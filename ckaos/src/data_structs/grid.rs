use hashbrown::{
    HashMap,
    HashSet,
};
use itertools::Itertools;
use log::trace;

use super::enums::Nucleotide;
use super::sequence::DnaSequence;
use super::typedef::{
    side_for_zoom,
    CellIdx,
    Zoom,
    MAX_WORD_LENGTH,
};
use crate::cgr::CgrPoint;
use crate::error::{
    KaosError,
    Result,
};
use crate::tools::gc::GcSelection;
use crate::tools::junction::JunctionSet;

/// Sparse square bitmap over the CGR plane at resolution `2^zoom` (mCGR).
///
/// Rows are derived from the `y` coordinate and columns from `x`, both
/// 1-based. A marked cell means "forbidden" while constraints are being
/// accumulated and "allowed" after [`Grid::filter_gc`].
///
/// Rows with no marked column are never stored, so two grids compare equal
/// exactly when they mark the same cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    zoom: Zoom,
    rows: HashMap<CellIdx, HashSet<CellIdx>>,
}

/// Number of cells of a full lattice at `zoom`, saturating.
pub(crate) fn lattice_cells(zoom: Zoom) -> usize {
    u32::try_from(zoom.saturating_mul(2))
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .unwrap_or(usize::MAX)
}

fn check_zoom(zoom: Zoom) -> Result<()> {
    if zoom == 0 {
        return Err(KaosError::invalid_length("grid zoom must be positive"));
    }
    if zoom > MAX_WORD_LENGTH {
        return Err(KaosError::ResourceExhaustion {
            zoom,
            cells: lattice_cells(zoom),
            limit: lattice_cells(MAX_WORD_LENGTH),
        });
    }
    Ok(())
}

impl Grid {
    pub fn empty(zoom: Zoom) -> Result<Self> {
        check_zoom(zoom)?;
        Ok(Self {
            zoom,
            rows: HashMap::new(),
        })
    }

    /// Grid at `sequence.len()` with the single cell of the sequence.
    pub fn from_sequence(sequence: &DnaSequence) -> Result<Self> {
        let mut grid = Self::empty(sequence.len())?;
        let (row, col) = CgrPoint::from_sequence(sequence).cell(grid.side())?;
        grid.mark(row, col);
        Ok(grid)
    }

    /// Union of the cells of `sequences`, which must all be `zoom` long.
    pub fn from_sequences<'a, I>(
        sequences: I,
        zoom: Zoom,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = &'a DnaSequence>, {
        let mut grid = Self::empty(zoom)?;
        let side = grid.side();
        for sequence in sequences {
            if sequence.len() != zoom {
                return Err(KaosError::invalid_length(format!(
                    "sequence {} has length {}, expected {}",
                    sequence,
                    sequence.len(),
                    zoom
                )));
            }
            let (row, col) = CgrPoint::from_sequence(sequence).cell(side)?;
            grid.mark(row, col);
        }
        Ok(grid)
    }

    /// Homopolymer runs of length `hp`.
    ///
    /// Each run sits on the lattice corner of its base, so the grid marks
    /// rows `{1, side}` × columns `{1, side}`.
    pub fn homopolymer(hp: usize) -> Result<Self> {
        if hp == 0 {
            return Err(KaosError::invalid_length(
                "homopolymer length must be positive",
            ));
        }
        let mut grid = Self::from_sequence(&DnaSequence::homopolymer(Nucleotide::A, hp))?;
        let side = grid.side();
        for row in [1, side] {
            for col in [1, side] {
                grid.mark(row, col);
            }
        }
        Ok(grid)
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    /// Number of rows (and columns) of the lattice.
    pub fn side(&self) -> CellIdx {
        side_for_zoom(self.zoom)
    }

    pub fn rows(&self) -> &HashMap<CellIdx, HashSet<CellIdx>> {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cells(&self) -> usize {
        self.rows.values().map(|cols| cols.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(
        &self,
        row: CellIdx,
        col: CellIdx,
    ) -> bool {
        self.rows.get(&row).is_some_and(|cols| cols.contains(&col))
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellIdx, CellIdx)> + '_ {
        self.rows
            .iter()
            .flat_map(|(row, cols)| cols.iter().map(move |col| (*row, *col)))
    }

    /// Cells ordered by row, then column.
    pub fn sorted_cells(&self) -> Vec<(CellIdx, CellIdx)> {
        self.cells().sorted_unstable().collect_vec()
    }

    /// Marks a cell. Returns `true` if it was not marked yet.
    pub fn insert(
        &mut self,
        row: CellIdx,
        col: CellIdx,
    ) -> Result<bool> {
        let side = self.side();
        if row == 0 || row > side || col == 0 || col > side {
            return Err(KaosError::domain(format!(
                "cell ({}, {}) is outside of a grid with side {}",
                row, col, side
            )));
        }
        Ok(self.mark(row, col))
    }

    fn mark(
        &mut self,
        row: CellIdx,
        col: CellIdx,
    ) -> bool {
        debug_assert!(row >= 1 && row <= self.side());
        debug_assert!(col >= 1 && col <= self.side());
        self.rows.entry(row).or_default().insert(col)
    }

    /// Fraction of the lattice that is marked.
    pub fn ratio(&self) -> f64 {
        let side = self.side() as f64;
        self.n_cells() as f64 / (side * side)
    }

    /// Grid at `zoom + 1` where every cell is split into its four children.
    ///
    /// Every one-base extension of a marked sequence (prepending a base)
    /// stays marked.
    pub fn double_size(&self) -> Result<Self> {
        let zoom = self.zoom + 1;
        check_zoom(zoom)?;

        let mut rows = HashMap::with_capacity(self.rows.len() * 2);
        for (row, cols) in self.rows.iter() {
            let doubled: HashSet<CellIdx> = cols
                .iter()
                .flat_map(|col| [col * 2 - 1, col * 2])
                .collect();
            rows.insert(row * 2 - 1, doubled.clone());
            rows.insert(row * 2, doubled);
        }
        Ok(Self { zoom, rows })
    }

    /// Replicates the cells of `other` at every offset that is a multiple of
    /// `other.side()` in both directions, merging into `self`.
    pub fn tile(
        &mut self,
        other: &Grid,
    ) -> Result<()> {
        if other.zoom > self.zoom {
            return Err(KaosError::invalid_length(format!(
                "can not tile a grid at zoom {} into a grid at zoom {}",
                other.zoom, self.zoom
            )));
        }
        let period = other.side();
        let repeats = self.side() / period;

        for (row, cols) in other.rows.iter() {
            for i in 0..repeats {
                let target = self.rows.entry(row + i * period).or_default();
                for j in 0..repeats {
                    target.extend(cols.iter().map(|col| col + j * period));
                }
            }
        }
        Ok(())
    }

    /// One step of growth: double the grid and tile the pre-doubling grid
    /// over the result.
    ///
    /// If `self` marks every word of length `z` containing a pattern, the
    /// result marks every word of length `z + 1` containing a pattern:
    /// doubling covers occurrences in the last `z` bases, tiling covers the
    /// first `z`.
    pub fn grow(self) -> Result<Self> {
        let mut next = self.double_size()?;
        next.tile(&self)?;
        trace!(
            "Grew grid from zoom {} ({} cells) to zoom {} ({} cells)",
            self.zoom,
            self.n_cells(),
            next.zoom,
            next.n_cells()
        );
        Ok(next)
    }

    /// Row-wise union.
    pub fn add(
        &mut self,
        other: &Grid,
    ) -> Result<()> {
        if other.zoom != self.zoom {
            return Err(KaosError::invalid_length(format!(
                "can not add a grid at zoom {} to a grid at zoom {}",
                other.zoom, self.zoom
            )));
        }
        for (row, cols) in other.rows.iter() {
            if cols.is_empty() {
                continue;
            }
            self.rows.entry(*row).or_default().extend(cols.iter().copied());
        }
        Ok(())
    }

    /// Consuming form of [`Grid::add`].
    pub fn union(
        mut self,
        other: &Grid,
    ) -> Result<Self> {
        self.add(other)?;
        Ok(self)
    }

    /// Number of cells [`Grid::filter_gc`] would produce.
    pub fn count_allowed(
        &self,
        selection: &GcSelection,
    ) -> Result<usize> {
        self.check_selection(selection)?;
        let side = self.side() as usize;
        Ok(selection
            .rows()
            .iter()
            .map(|row| side - self.rows.get(row).map_or(0, |cols| cols.len()))
            .sum())
    }

    /// Turns forbidden cells into allowed cells, keeping only the rows of
    /// `selection`: each selected row becomes the complement of its marked
    /// columns, every other row is dropped.
    pub fn filter_gc(
        self,
        selection: &GcSelection,
    ) -> Result<Self> {
        self.check_selection(selection)?;
        let side = self.side();

        let mut rows = HashMap::with_capacity(selection.rows().len());
        for row in selection.rows().iter() {
            let allowed: HashSet<CellIdx> = match self.rows.get(row) {
                Some(forbidden) => {
                    (1..=side).filter(|col| !forbidden.contains(col)).collect()
                },
                None => (1..=side).collect(),
            };
            if !allowed.is_empty() {
                rows.insert(*row, allowed);
            }
        }
        Ok(Self {
            zoom: self.zoom,
            rows,
        })
    }

    /// Removes every cell marked by any grid of `junctions`.
    pub fn filter_junctions(
        &mut self,
        junctions: &JunctionSet,
    ) -> Result<()> {
        if junctions.word_length() != self.zoom {
            return Err(KaosError::invalid_length(format!(
                "junction set for word length {} can not filter a grid at zoom {}",
                junctions.word_length(),
                self.zoom
            )));
        }
        for junction in junctions.grids() {
            for (row, cols) in junction.rows.iter() {
                if let Some(allowed) = self.rows.get_mut(row) {
                    for col in cols {
                        allowed.remove(col);
                    }
                }
            }
        }
        self.rows.retain(|_, cols| !cols.is_empty());
        Ok(())
    }

    fn check_selection(
        &self,
        selection: &GcSelection,
    ) -> Result<()> {
        if selection.side() != self.side() {
            return Err(KaosError::invalid_length(format!(
                "GC selection for side {} can not filter a grid with side {}",
                selection.side(),
                self.side()
            )));
        }
        Ok(())
    }
}
