use std::collections::BTreeMap;
use std::fmt::Display;
use std::ops::Range;
use std::str::FromStr;

use hashbrown::HashSet;
use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use super::enums::Nucleotide;
use crate::error::{
    KaosError,
    Result,
};

/// Immutable DNA sequence over `{A, C, G, T}`.
///
/// Parsing is case-insensitive; the canonical form is uppercase. Ordering is
/// lexicographic (`A < C < G < T`), matching the ordering of the uppercase
/// strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DnaSequence(Vec<Nucleotide>);

impl DnaSequence {
    pub fn from_nucleotides(nucleotides: Vec<Nucleotide>) -> Self {
        Self(nucleotides)
    }

    /// Run of `length` copies of `base`.
    pub fn homopolymer(
        base: Nucleotide,
        length: usize,
    ) -> Self {
        Self(vec![base; length])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn nucleotides(&self) -> &[Nucleotide] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Nucleotide> {
        self.0.iter()
    }

    pub fn gc_count(&self) -> usize {
        self.0.iter().filter(|n| n.is_gc()).count()
    }

    pub fn gc_fraction(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.gc_count() as f64 / self.len() as f64
    }

    /// Copy of the bases in `range`.
    pub fn slice(
        &self,
        range: Range<usize>,
    ) -> Self {
        Self(self.0[range].to_vec())
    }

    pub fn prefix(
        &self,
        length: usize,
    ) -> Self {
        self.slice(0..length)
    }

    pub fn suffix_from(
        &self,
        start: usize,
    ) -> Self {
        self.slice(start..self.len())
    }

    pub fn concat(
        &self,
        other: &Self,
    ) -> Self {
        Self(self.0.iter().chain(other.0.iter()).copied().collect())
    }

    pub fn starts_with(
        &self,
        other: &Self,
    ) -> bool {
        self.0.starts_with(&other.0)
    }

    pub fn ends_with(
        &self,
        other: &Self,
    ) -> bool {
        self.0.ends_with(&other.0)
    }

    /// Whether `motif` occurs anywhere in the sequence.
    pub fn contains(
        &self,
        motif: &Self,
    ) -> bool {
        if motif.is_empty() {
            return true;
        }
        self.0.windows(motif.len()).any(|w| w == motif.0.as_slice())
    }

    /// Start offsets of every occurrence of `motif`.
    pub fn find_all(
        &self,
        motif: &Self,
    ) -> Vec<usize> {
        if motif.is_empty() || motif.len() > self.len() {
            return Vec::new();
        }
        self.0
            .windows(motif.len())
            .positions(|w| w == motif.0.as_slice())
            .collect_vec()
    }

    /// Length of the longest run of a single base, with that base.
    pub fn longest_run(&self) -> Option<(Nucleotide, usize)> {
        self.0
            .iter()
            .dedup_with_count()
            .max_by_key(|(count, _)| *count)
            .map(|(count, base)| (*base, count))
    }
}

impl FromStr for DnaSequence {
    type Err = KaosError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .chars()
            .enumerate()
            .map(|(position, symbol)| Nucleotide::try_from_char(symbol, position))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl TryFrom<&[u8]> for DnaSequence {
    type Error = KaosError;

    fn try_from(value: &[u8]) -> Result<Self> {
        value
            .iter()
            .enumerate()
            .map(|(position, byte)| {
                Nucleotide::try_from_char(*byte as char, position)
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl From<Vec<Nucleotide>> for DnaSequence {
    fn from(value: Vec<Nucleotide>) -> Self {
        Self(value)
    }
}

impl Display for DnaSequence {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().map(|n| char::from(*n)).collect::<String>())
    }
}

impl Serialize for DnaSequence {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DnaSequence {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        std::str::FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Forbidden motifs bucketed by length, deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MotifSet {
    by_length: BTreeMap<usize, HashSet<DnaSequence>>,
}

impl MotifSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four single-base runs of length `hp`.
    pub fn homopolymers(hp: usize) -> Result<Self> {
        if hp == 0 {
            return Err(KaosError::invalid_length(
                "homopolymer length must be positive",
            ));
        }
        Ok(Nucleotide::ALL
            .iter()
            .map(|base| DnaSequence::homopolymer(*base, hp))
            .collect())
    }

    /// Adds a motif. Empty sequences are ignored. Returns `true` if the
    /// motif was not present yet.
    pub fn insert(
        &mut self,
        motif: DnaSequence,
    ) -> bool {
        if motif.is_empty() {
            return false;
        }
        self.by_length.entry(motif.len()).or_default().insert(motif)
    }

    pub fn extend(
        &mut self,
        other: MotifSet,
    ) {
        for (length, motifs) in other.by_length {
            self.by_length.entry(length).or_default().extend(motifs);
        }
    }

    /// Motifs of exactly `length`.
    pub fn get(
        &self,
        length: usize,
    ) -> Option<&HashSet<DnaSequence>> {
        self.by_length.get(&length)
    }

    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_length.keys().copied()
    }

    pub fn buckets(&self) -> impl Iterator<Item = (usize, &HashSet<DnaSequence>)> {
        self.by_length.iter().map(|(length, set)| (*length, set))
    }

    pub fn min_length(&self) -> Option<usize> {
        self.by_length.keys().next().copied()
    }

    pub fn max_length(&self) -> Option<usize> {
        self.by_length.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DnaSequence> {
        self.by_length.values().flatten()
    }

    /// Number of motifs over all lengths.
    pub fn len(&self) -> usize {
        self.by_length.values().map(|set| set.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_length.is_empty()
    }

    pub fn contains(
        &self,
        motif: &DnaSequence,
    ) -> bool {
        self.by_length
            .get(&motif.len())
            .is_some_and(|set| set.contains(motif))
    }

    /// Removes every motif longer than `max_length` and returns them sorted.
    pub fn retain_max_length(
        &mut self,
        max_length: usize,
    ) -> Vec<DnaSequence> {
        let dropped = self.by_length.split_off(&(max_length + 1));
        dropped.into_values().flatten().sorted().collect_vec()
    }
}

impl FromIterator<DnaSequence> for MotifSet {
    fn from_iter<T: IntoIterator<Item = DnaSequence>>(iter: T) -> Self {
        let mut set = Self::new();
        for motif in iter {
            set.insert(motif);
        }
        set
    }
}
