use std::collections::BTreeMap;

use log::debug;
use num::{
    BigInt,
    BigRational,
    Signed,
};
use rayon::prelude::*;

use super::check_cell;
use crate::data_structs::typedef::{
    side_for_zoom,
    CellIdx,
};
use crate::data_structs::{
    DnaSequence,
    Grid,
    Nucleotide,
};
use crate::error::{
    KaosError,
    Result,
};
use crate::utils::THREAD_POOL;

/// Reconstructs the sequence of length `word_length` living in cell
/// `(row, col)` of a grid with `side` cells per axis.
///
/// Coordinates are taken mirrored (`x = (side + 1 - 2 col) / side`), so the
/// quadrant of the mirrored point names the last base of the sequence:
/// `(+,+)` G, `(+,-)` A, `(-,+)` C, `(-,-)` T, zero counting as positive.
/// Undoing one chaos game step (`x := 2x - sign`) exposes the previous base.
pub fn decode(
    row: CellIdx,
    col: CellIdx,
    side: CellIdx,
    word_length: usize,
) -> Result<DnaSequence> {
    check_cell(row, col, side)?;

    let mirrored = |index: CellIdx| {
        BigRational::new(
            BigInt::from(i64::from(side) + 1 - 2 * i64::from(index)),
            BigInt::from(side),
        )
    };
    let two = BigRational::from_integer(BigInt::from(2));
    let mut x = mirrored(col);
    let mut y = mirrored(row);

    let mut bases = Vec::with_capacity(word_length);
    for _ in 0..word_length {
        let (base, sign_x, sign_y) = match (!x.is_negative(), !y.is_negative()) {
            (true, true) => (Nucleotide::G, 1, 1),
            (true, false) => (Nucleotide::A, 1, -1),
            (false, true) => (Nucleotide::C, -1, 1),
            (false, false) => (Nucleotide::T, -1, -1),
        };
        bases.push(base);
        x = &x * &two - BigRational::from_integer(BigInt::from(sign_x));
        y = &y * &two - BigRational::from_integer(BigInt::from(sign_y));
    }
    bases.reverse();
    Ok(DnaSequence::from_nucleotides(bases))
}

/// Codewords of a final grid with their `(row, col)` positions, ordered
/// lexicographically by sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodewordTable {
    word_length: usize,
    entries:     BTreeMap<DnaSequence, (CellIdx, CellIdx)>,
}

impl CodewordTable {
    /// Decodes every cell of `grid`.
    pub fn from_grid(grid: &Grid) -> Result<Self> {
        let word_length = grid.zoom();
        let side = grid.side();
        let cells = grid.sorted_cells();
        debug!(
            "Decoding {} cells of a grid with side {} on {} threads",
            cells.len(),
            side,
            THREAD_POOL.current_num_threads()
        );

        let decoded = THREAD_POOL.install(|| {
            cells
                .par_iter()
                .map(|(row, col)| {
                    decode(*row, *col, side, word_length).map(|seq| (seq, (*row, *col)))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(Self {
            word_length,
            entries: decoded.into_iter().collect(),
        })
    }

    /// Builds a table from explicit entries, checking that every sequence
    /// is `word_length` long and sits inside the lattice.
    pub fn from_entries<I>(
        word_length: usize,
        entries: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (DnaSequence, (CellIdx, CellIdx))>, {
        if word_length == 0 {
            return Err(KaosError::invalid_length("word length must be positive"));
        }
        let side = side_for_zoom(word_length);
        let mut table = Self {
            word_length,
            entries: BTreeMap::new(),
        };
        for (sequence, (row, col)) in entries {
            if sequence.len() != word_length {
                return Err(KaosError::invalid_length(format!(
                    "codeword {} has length {}, expected {}",
                    sequence,
                    sequence.len(),
                    word_length
                )));
            }
            check_cell(row, col, side)?;
            table.entries.insert(sequence, (row, col));
        }
        Ok(table)
    }

    pub fn word_length(&self) -> usize {
        self.word_length
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(
        &self,
        sequence: &DnaSequence,
    ) -> Option<(CellIdx, CellIdx)> {
        self.entries.get(sequence).copied()
    }

    pub fn row(
        &self,
        sequence: &DnaSequence,
    ) -> Option<CellIdx> {
        self.get(sequence).map(|(row, _)| row)
    }

    pub fn col(
        &self,
        sequence: &DnaSequence,
    ) -> Option<CellIdx> {
        self.get(sequence).map(|(_, col)| col)
    }

    pub fn contains(
        &self,
        sequence: &DnaSequence,
    ) -> bool {
        self.entries.contains_key(sequence)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DnaSequence, &(CellIdx, CellIdx))> {
        self.entries.iter()
    }

    pub fn sequences(&self) -> impl Iterator<Item = &DnaSequence> {
        self.entries.keys()
    }

    /// Grid marking the cells of the table.
    pub fn to_grid(&self) -> Result<Grid> {
        let mut grid = Grid::empty(self.word_length)?;
        for (row, col) in self.entries.values() {
            grid.insert(*row, *col)?;
        }
        Ok(grid)
    }
}
