use std::collections::BTreeSet;
use std::fmt::Display;

use log::debug;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::{
    side_for_zoom,
    CellIdx,
    MAX_WORD_LENGTH,
};
use crate::error::{
    KaosError,
    Result,
};
use crate::getter_fn;

/// Tolerance used when comparing GC counts against a fractional target.
pub const GC_TOLERANCE: f64 = 1e-9;

/// Desired GC content of every codeword, as a fraction of its length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GcTarget {
    Exact(f64),
    Range { start: f64, end: f64 },
}

impl Default for GcTarget {
    fn default() -> Self {
        GcTarget::Range {
            start: 0.0,
            end:   1.0,
        }
    }
}

impl GcTarget {
    pub fn validate(&self) -> Result<()> {
        let in_unit = |value: f64| (0.0..=1.0).contains(&value);
        match *self {
            GcTarget::Exact(target) if !in_unit(target) => {
                Err(KaosError::domain(format!(
                    "GC target {} is outside of [0, 1]",
                    target
                )))
            },
            GcTarget::Range { start, end } if !(in_unit(start) && in_unit(end)) => {
                Err(KaosError::domain(format!(
                    "GC range [{}, {}] is outside of [0, 1]",
                    start, end
                )))
            },
            GcTarget::Range { start, end } if start > end => {
                Err(KaosError::domain(format!(
                    "GC range start {} is greater than its end {}",
                    start, end
                )))
            },
            _ => Ok(()),
        }
    }

    /// Whether a word of `length` with `gc_count` G/C bases satisfies the
    /// target.
    pub fn accepts(
        &self,
        gc_count: usize,
        length: usize,
    ) -> bool {
        let count = gc_count as f64;
        let length = length as f64;
        match *self {
            GcTarget::Exact(target) => (count - target * length).abs() <= GC_TOLERANCE,
            GcTarget::Range { start, end } => {
                count >= start * length - GC_TOLERANCE
                    && count <= end * length + GC_TOLERANCE
            },
        }
    }
}

impl Display for GcTarget {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            GcTarget::Exact(target) => write!(f, "{}", target),
            GcTarget::Range { start, end } => write!(f, "[{}, {}]", start, end),
        }
    }
}

/// GC count of the words in every row of a grid at zoom `length`, indexed
/// by `row - 1`.
///
/// The A/T-ness of base `k` is bit `k - 1` of `row - 1`. For the first
/// `length - 1` bases the number of A/T bases is accumulated with one parity
/// switch per position, toggling every `2^position` rows. The last base is
/// G/C in the bottom half of the rows and A/T in the top half.
pub fn row_gc_counts(length: usize) -> Result<Vec<usize>> {
    check_length(length)?;
    let half = 1usize << (length - 1);

    let mut weights = vec![0usize; half];
    for position in 0..length - 1 {
        let stride = 1usize << position;
        let mut switch = false;
        for (j, weight) in weights.iter_mut().enumerate() {
            if j % stride == 0 {
                switch = !switch;
            }
            if !switch {
                *weight += 1;
            }
        }
    }

    let bottom = weights.iter().map(|w| length - w);
    let top = weights.iter().map(|w| length - 1 - w);
    Ok(bottom.chain(top).collect())
}

fn check_length(length: usize) -> Result<()> {
    if length == 0 {
        return Err(KaosError::domain("GC selection needs a positive word length"));
    }
    if length > MAX_WORD_LENGTH {
        return Err(KaosError::invalid_length(format!(
            "word length {} exceeds the maximum of {}",
            length, MAX_WORD_LENGTH
        )));
    }
    Ok(())
}

/// Rows of a grid whose words satisfy a GC target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcSelection {
    word_length: usize,
    side:        CellIdx,
    rows:        BTreeSet<CellIdx>,
}

impl GcSelection {
    /// Rows with GC fraction equal to `target`.
    pub fn exact(
        length: usize,
        target: f64,
    ) -> Result<Self> {
        Self::compute(length, &GcTarget::Exact(target))
    }

    /// Rows with GC fraction inside `[start, end]`.
    pub fn range(
        length: usize,
        start: f64,
        end: f64,
    ) -> Result<Self> {
        Self::compute(length, &GcTarget::Range { start, end })
    }

    pub fn compute(
        length: usize,
        target: &GcTarget,
    ) -> Result<Self> {
        check_length(length)?;
        target.validate()?;

        let rows: BTreeSet<CellIdx> = row_gc_counts(length)?
            .into_iter()
            .enumerate()
            .filter(|(_, gc_count)| target.accepts(*gc_count, length))
            .map(|(idx, _)| idx as CellIdx + 1)
            .collect();

        if rows.is_empty() {
            return Err(KaosError::domain(format!(
                "no word of length {} has GC content {}",
                length, target
            )));
        }
        debug!(
            "GC target {} selects {} of {} rows at word length {}",
            target,
            rows.len(),
            side_for_zoom(length),
            length
        );

        Ok(Self {
            word_length: length,
            side: side_for_zoom(length),
            rows,
        })
    }

    pub fn word_length(&self) -> usize {
        self.word_length
    }

    pub fn side(&self) -> CellIdx {
        self.side
    }

    getter_fn!(rows, BTreeSet<CellIdx>);

    pub fn contains(
        &self,
        row: CellIdx,
    ) -> bool {
        self.rows.contains(&row)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rstest::rstest;

    use super::*;
    use crate::cgr::CgrPoint;
    use crate::data_structs::{
        DnaSequence,
        Nucleotide,
    };

    fn brute_force(
        length: usize,
        target: &GcTarget,
    ) -> BTreeSet<CellIdx> {
        let side = side_for_zoom(length);
        (0..length)
            .map(|_| Nucleotide::ALL.iter().copied())
            .multi_cartesian_product()
            .map(DnaSequence::from_nucleotides)
            .filter(|s| target.accepts(s.gc_count(), length))
            .map(|s| CgrPoint::from_sequence(&s).cell(side).unwrap().0)
            .collect()
    }

    #[test]
    fn test_length_four_half_gc() {
        let selection = GcSelection::exact(4, 0.5).unwrap();
        assert_eq!(
            selection.rows().iter().copied().collect_vec(),
            vec![4, 6, 7, 10, 11, 13]
        );
        assert_eq!(selection.side(), 16);
    }

    #[test]
    fn test_weights_are_popcounts() {
        for length in 1..=8 {
            let counts = row_gc_counts(length).unwrap();
            assert_eq!(counts.len(), 1 << length);
            for (idx, count) in counts.iter().enumerate() {
                assert_eq!(*count, length - idx.count_ones() as usize);
            }
        }
    }

    #[rstest]
    #[case(GcTarget::Exact(0.0))]
    #[case(GcTarget::Exact(1.0))]
    #[case(GcTarget::Exact(0.5))]
    #[case(GcTarget::Range { start: 0.4, end: 0.6 })]
    #[case(GcTarget::Range { start: 0.0, end: 1.0 })]
    fn test_matches_brute_force(#[case] target: GcTarget) {
        for length in 1..=6 {
            let expected = brute_force(length, &target);
            match GcSelection::compute(length, &target) {
                Ok(selection) => assert_eq!(selection.rows(), &expected),
                Err(_) => assert!(expected.is_empty()),
            }
        }
    }

    #[test]
    fn test_all_gc_is_first_row() {
        let selection = GcSelection::exact(3, 1.0).unwrap();
        assert_eq!(selection.rows().iter().copied().collect_vec(), vec![1]);
    }

    #[test]
    fn test_invalid_targets() {
        assert!(GcSelection::exact(4, 1.5).is_err());
        assert!(GcSelection::exact(4, -0.1).is_err());
        assert!(GcSelection::range(4, 0.7, 0.3).is_err());
        assert!(GcSelection::exact(0, 0.5).is_err());
        assert!(GcSelection::exact(4, f64::NAN).is_err());
        // 1/3 of four bases is not a whole count
        assert!(matches!(
            GcSelection::exact(4, 1.0 / 3.0),
            Err(KaosError::ArithmeticDomain(_))
        ));
    }

    #[test]
    fn test_target_serde() {
        let json = serde_json::to_string(&GcTarget::default()).unwrap();
        assert_eq!(json, r#"{"range":{"start":0.0,"end":1.0}}"#);
        let exact: GcTarget = serde_json::from_str(r#"{"exact":0.5}"#).unwrap();
        assert_eq!(exact, GcTarget::Exact(0.5));
    }
}
