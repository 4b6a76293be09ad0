use std::collections::{
    BTreeMap,
    BTreeSet,
};

use log::debug;
use serde::{
    Deserialize,
    Serialize,
};

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
use crate::getter_fn;

/// Part of a motif that must not sit at one end of a codeword.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fragment {
    /// Words ending with the fragment are excluded.
    Prepending(DnaSequence),
    /// Words beginning with the fragment are excluded.
    Appending(DnaSequence),
}

impl Fragment {
    pub fn sequence(&self) -> &DnaSequence {
        match self {
            Fragment::Prepending(seq) | Fragment::Appending(seq) => seq,
        }
    }

    /// Cells of the words of `word_length` carrying the fragment at the
    /// relevant end.
    pub fn to_grid(
        &self,
        word_length: usize,
    ) -> Result<Grid> {
        match self {
            Fragment::Prepending(seq) => {
                let mut grid = Grid::from_sequence(seq)?;
                while grid.zoom() < word_length {
                    grid = grid.double_size()?;
                }
                Ok(grid)
            },
            Fragment::Appending(seq) => {
                let mut grid = Grid::empty(word_length)?;
                grid.tile(&Grid::from_sequence(seq)?)?;
                Ok(grid)
            },
        }
    }
}

/// Splits `motif` at every inner position. For each split whose halves both
/// fit in a word the longer half is kept: the prefix (ties included) as a
/// prepending fragment, otherwise the suffix as an appending one.
pub(crate) fn split_fragments(
    motif: &DnaSequence,
    word_length: usize,
) -> Vec<Fragment> {
    (1..motif.len())
        .filter_map(|split| {
            let prefix = motif.prefix(split);
            let suffix = motif.suffix_from(split);
            if prefix.len() > word_length || suffix.len() > word_length {
                None
            } else if prefix.len() >= suffix.len() {
                Some(Fragment::Prepending(prefix))
            } else {
                Some(Fragment::Appending(suffix))
            }
        })
        .collect()
}

/// Cells removed so that no two concatenated codewords recreate a motif
/// across their boundary.
#[derive(Debug, Clone)]
pub struct JunctionSet {
    word_length: usize,
    fragments:   Vec<Fragment>,
    grids:       Vec<Grid>,
}

impl JunctionSet {
    pub fn empty(word_length: usize) -> Result<Self> {
        Grid::empty(word_length)?;
        Ok(Self {
            word_length,
            fragments: Vec::new(),
            grids: Vec::new(),
        })
    }

    pub fn build(
        word_length: usize,
        motifs: &MotifSet,
    ) -> Result<Self> {
        Self::build_bounded(word_length, motifs, usize::MAX)
    }

    /// Same as [`JunctionSet::build`], failing before materialising a grid
    /// of more than `max_cells` cells.
    pub fn build_bounded(
        word_length: usize,
        motifs: &MotifSet,
        max_cells: usize,
    ) -> Result<Self> {
        let mut set = Self::empty(word_length)?;
        let fragments: BTreeSet<Fragment> = motifs
            .iter()
            .flat_map(|motif| split_fragments(motif, word_length))
            .collect();

        for fragment in fragments {
            let cells = lattice_cells(word_length - fragment.sequence().len());
            if cells > max_cells {
                return Err(KaosError::ResourceExhaustion {
                    zoom: word_length,
                    cells,
                    limit: max_cells,
                });
            }
            set.grids.push(fragment.to_grid(word_length)?);
            set.fragments.push(fragment);
        }
        debug!(
            "Built {} junction grids from {} motifs at word length {}",
            set.grids.len(),
            motifs.len(),
            word_length
        );
        Ok(set)
    }

    pub fn word_length(&self) -> usize {
        self.word_length
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Whether any junction grid marks `(row, col)`.
    pub fn contains(
        &self,
        row: u32,
        col: u32,
    ) -> bool {
        self.grids.iter().any(|grid| grid.contains(row, col))
    }
}

/// Concatenation scheme written next to a codeword file: every proper prefix
/// of a motif mapped to the suffixes completing it. An encoder that places
/// a codeword ending with a prefix must not follow it with a codeword
/// starting with one of its suffixes.
///
/// Serialises as `{"motif": {"<prefix>": ["<suffix>", ...], ...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcatenationScheme {
    motif: BTreeMap<DnaSequence, Vec<DnaSequence>>,
}

impl ConcatenationScheme {
    pub fn from_motifs(motifs: &MotifSet) -> Self {
        let mut splits: BTreeMap<DnaSequence, BTreeSet<DnaSequence>> = BTreeMap::new();
        for motif in motifs.iter() {
            for split in 1..motif.len() {
                splits
                    .entry(motif.prefix(split))
                    .or_default()
                    .insert(motif.suffix_from(split));
            }
        }
        Self {
            motif: splits
                .into_iter()
                .map(|(prefix, suffixes)| (prefix, suffixes.into_iter().collect()))
                .collect(),
        }
    }

    getter_fn!(motif, BTreeMap<DnaSequence, Vec<DnaSequence>>);

    /// Suffixes completing a motif after `prefix`.
    pub fn get(
        &self,
        prefix: &DnaSequence,
    ) -> Option<&[DnaSequence]> {
        self.motif.get(prefix).map(|suffixes| suffixes.as_slice())
    }

    pub fn len(&self) -> usize {
        self.motif.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motif.is_empty()
    }

    pub fn write_json<W: std::io::Write>(
        &self,
        writer: W,
    ) -> anyhow::Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use itertools::Itertools;

    use super::*;
    use crate::cgr::CodewordTable;
    use crate::tools::gc::GcSelection;

    fn seq(s: &str) -> DnaSequence {
        DnaSequence::from_str(s).unwrap()
    }

    #[test]
    fn test_split_fragments() {
        assert_eq!(
            split_fragments(&seq("ACGT"), 3),
            vec![
                Fragment::Appending(seq("CGT")),
                Fragment::Prepending(seq("AC")),
                Fragment::Prepending(seq("ACG")),
            ]
        );
        assert_eq!(
            split_fragments(&seq("ACGT"), 2),
            vec![Fragment::Prepending(seq("AC"))]
        );
        assert!(split_fragments(&seq("A"), 3).is_empty());
    }

    #[test]
    fn test_fragment_grids() {
        let words = |grid: &Grid| {
            CodewordTable::from_grid(grid)
                .unwrap()
                .sequences()
                .cloned()
                .collect_vec()
        };

        let ending = Fragment::Prepending(seq("GA")).to_grid(3).unwrap();
        assert_eq!(ending.n_cells(), 4);
        assert!(words(&ending).iter().all(|w| w.ends_with(&seq("GA"))));

        let beginning = Fragment::Appending(seq("TC")).to_grid(3).unwrap();
        assert_eq!(beginning.n_cells(), 4);
        assert!(words(&beginning).iter().all(|w| w.starts_with(&seq("TC"))));

        let full = Fragment::Appending(seq("TCA")).to_grid(3).unwrap();
        assert_eq!(words(&full), vec![seq("TCA")]);
    }

    #[test]
    fn test_empty_set_is_noop() {
        let selection = GcSelection::range(3, 0.0, 1.0).unwrap();
        let full = Grid::empty(3).unwrap().filter_gc(&selection).unwrap();
        let mut filtered = full.clone();
        let junctions = JunctionSet::build(3, &MotifSet::new()).unwrap();
        assert!(junctions.is_empty());
        filtered.filter_junctions(&junctions).unwrap();
        assert_eq!(filtered, full);
    }

    #[test]
    fn test_filtered_words_never_join_into_motif() {
        let word_length = 3;
        let motifs: MotifSet = ["ACGT", "GGA", "TA"].iter().map(|s| seq(s)).collect();
        let junctions = JunctionSet::build(word_length, &motifs).unwrap();

        let selection = GcSelection::range(word_length, 0.0, 1.0).unwrap();
        let mut grid = Grid::empty(word_length)
            .unwrap()
            .filter_gc(&selection)
            .unwrap();
        grid.filter_junctions(&junctions).unwrap();
        let words = CodewordTable::from_grid(&grid)
            .unwrap()
            .sequences()
            .cloned()
            .collect_vec();
        assert!(!words.is_empty());

        for (left, right) in words.iter().cartesian_product(words.iter()) {
            for motif in motifs.iter() {
                for split in 1..motif.len() {
                    let crosses = left.ends_with(&motif.prefix(split))
                        && right.starts_with(&motif.suffix_from(split));
                    assert!(
                        !crosses,
                        "{}|{} recreates {} across the junction",
                        left,
                        right,
                        motif
                    );
                }
            }
        }
    }

    #[test]
    fn test_word_length_mismatch() {
        let junctions = JunctionSet::empty(4).unwrap();
        let mut grid = Grid::empty(3).unwrap();
        assert!(grid.filter_junctions(&junctions).is_err());
        assert!(JunctionSet::empty(0).is_err());
    }

    #[test]
    fn test_cell_bound() {
        let motifs: MotifSet = ["ACGTAC"].iter().map(|s| seq(s)).collect();
        // ACG|TAC on a word of 8 marks 4^5 cells
        assert!(JunctionSet::build_bounded(8, &motifs, 1000).is_err());
        assert!(JunctionSet::build_bounded(8, &motifs, 1 << 12).is_ok());
    }

    #[test]
    fn test_concatenation_scheme() {
        let motifs: MotifSet = ["ACGT", "ACC"].iter().map(|s| seq(s)).collect();
        let scheme = ConcatenationScheme::from_motifs(&motifs);

        let expected: BTreeMap<DnaSequence, Vec<DnaSequence>> = [
            ("A", vec!["CC", "CGT"]),
            ("AC", vec!["C", "GT"]),
            ("ACG", vec!["T"]),
        ]
        .into_iter()
        .map(|(prefix, suffixes)| (seq(prefix), suffixes.into_iter().map(seq).collect()))
        .collect();
        assert_eq!(scheme.motif(), &expected);
        assert_eq!(scheme.get(&seq("ACG")), Some([seq("T")].as_slice()));
        assert!(scheme.get(&seq("T")).is_none());

        let mut buffer = Vec::new();
        scheme.write_json(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            r#"{"motif":{"A":["CC","CGT"],"AC":["C","GT"],"ACG":["T"]}}"#
        );
        assert!(ConcatenationScheme::from_motifs(&MotifSet::new()).is_empty());
    }

    #[test]
    fn test_concatenation_scheme_with_homopolymers() {
        let mut motifs: MotifSet = ["GA"].iter().map(|s| seq(s)).collect();
        motifs.extend(MotifSet::homopolymers(2).unwrap());
        let scheme = ConcatenationScheme::from_motifs(&motifs);
        assert_eq!(scheme.len(), 4);
        assert_eq!(scheme.get(&seq("G")), Some([seq("A"), seq("G")].as_slice()));
        assert_eq!(scheme.get(&seq("T")), Some([seq("T")].as_slice()));
    }
}
