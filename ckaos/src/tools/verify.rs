use std::fmt::Display;

use crate::data_structs::{
    DnaSequence,
    MotifSet,
    Nucleotide,
};
use crate::error::Result;
use crate::tools::engine::EngineConfig;
use crate::tools::gc::GcTarget;

/// A constraint a codeword (or a pair of codewords) breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    WrongLength {
        expected: usize,
        found:    usize,
    },
    Homopolymer {
        base:   Nucleotide,
        length: usize,
    },
    Motif {
        motif:    DnaSequence,
        position: usize,
    },
    GcContent {
        gc_count: usize,
        length:   usize,
    },
    /// `motif` starts at `position` of `left + right` and spans the junction.
    Junction {
        motif:    DnaSequence,
        position: usize,
    },
}

impl Display for Violation {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Violation::WrongLength { expected, found } => {
                write!(f, "length {} instead of {}", found, expected)
            },
            Violation::Homopolymer { base, length } => {
                write!(f, "homopolymer run of {} x {}", length, base)
            },
            Violation::Motif { motif, position } => {
                write!(f, "motif {} at position {}", motif, position)
            },
            Violation::GcContent { gc_count, length } => {
                write!(f, "GC content {}/{}", gc_count, length)
            },
            Violation::Junction { motif, position } => {
                write!(f, "motif {} across the junction at position {}", motif, position)
            },
        }
    }
}

/// Checks codewords against the constraints directly on their sequence.
#[derive(Debug, Clone)]
pub struct ConstraintChecker {
    word_length:     usize,
    homopolymer:     Option<usize>,
    gc:              GcTarget,
    motifs:          MotifSet,
    junction_motifs: Option<MotifSet>,
}

impl ConstraintChecker {
    /// Checker for the constraints of `config`. Motifs longer than the word
    /// length are ignored, homopolymer runs count as junction motifs.
    pub fn new(
        config: &EngineConfig,
        motifs: &MotifSet,
    ) -> Result<Self> {
        config.validate()?;
        let mut motifs = motifs.clone();
        motifs.retain_max_length(config.word_length);

        let junction_motifs = if config.lexicographic {
            let mut junction = motifs.clone();
            if let Some(hp) = config.homopolymer {
                junction.extend(MotifSet::homopolymers(hp)?);
            }
            Some(junction)
        } else {
            None
        };

        Ok(Self {
            word_length: config.word_length,
            homopolymer: config.homopolymer,
            gc: config.gc,
            motifs,
            junction_motifs,
        })
    }

    pub fn word_length(&self) -> usize {
        self.word_length
    }

    pub fn checks_junctions(&self) -> bool {
        self.junction_motifs.is_some()
    }

    pub fn check(
        &self,
        word: &DnaSequence,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        if word.len() != self.word_length {
            violations.push(Violation::WrongLength {
                expected: self.word_length,
                found:    word.len(),
            });
        }
        if let (Some(hp), Some((base, length))) = (self.homopolymer, word.longest_run()) {
            if length >= hp {
                violations.push(Violation::Homopolymer { base, length });
            }
        }
        for motif in self.motifs.iter() {
            if let Some(position) = word.find_all(motif).first() {
                violations.push(Violation::Motif {
                    motif:    motif.clone(),
                    position: *position,
                });
            }
        }
        if !self.gc.accepts(word.gc_count(), word.len()) {
            violations.push(Violation::GcContent {
                gc_count: word.gc_count(),
                length:   word.len(),
            });
        }
        violations
    }

    pub fn is_valid(
        &self,
        word: &DnaSequence,
    ) -> bool {
        self.check(word).is_empty()
    }

    /// Junction motifs occurring in `left + right` across the boundary.
    /// Always empty unless the checker was built for a lexicographic run.
    pub fn check_junction(
        &self,
        left: &DnaSequence,
        right: &DnaSequence,
    ) -> Vec<Violation> {
        let Some(junction_motifs) = self.junction_motifs.as_ref() else {
            return Vec::new();
        };
        let joined = left.concat(right);
        let boundary = left.len();
        junction_motifs
            .iter()
            .flat_map(|motif| {
                joined
                    .find_all(motif)
                    .into_iter()
                    .filter(move |start| *start < boundary && start + motif.len() > boundary)
                    .map(move |position| {
                        Violation::Junction {
                            motif: motif.clone(),
                            position,
                        }
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn seq(s: &str) -> DnaSequence {
        DnaSequence::from_str(s).unwrap()
    }

    #[test]
    fn test_single_word_checks() {
        let config = EngineConfig::new(5)
            .with_homopolymer(Some(3))
            .with_gc(GcTarget::Range {
                start: 0.4,
                end:   0.6,
            });
        let motifs: MotifSet = ["CAT", "GATTACA"].iter().map(|s| seq(s)).collect();
        let checker = ConstraintChecker::new(&config, &motifs).unwrap();

        assert!(checker.is_valid(&seq("ACGTA")));
        assert_eq!(
            checker.check(&seq("AAACG")),
            vec![Violation::Homopolymer {
                base:   Nucleotide::A,
                length: 3,
            }]
        );
        assert_eq!(
            checker.check(&seq("GCATA")),
            vec![Violation::Motif {
                motif:    seq("CAT"),
                position: 1,
            }]
        );
        assert_eq!(
            checker.check(&seq("GCGCA")),
            vec![Violation::GcContent {
                gc_count: 4,
                length:   5,
            }]
        );
        assert!(checker
            .check(&seq("ACG"))
            .contains(&Violation::WrongLength {
                expected: 5,
                found:    3,
            }));
    }

    #[test]
    fn test_junction_checks() {
        let config = EngineConfig::new(4)
            .with_homopolymer(Some(3))
            .with_lexicographic(true);
        let motifs: MotifSet = ["ACGT"].iter().map(|s| seq(s)).collect();
        let checker = ConstraintChecker::new(&config, &motifs).unwrap();
        assert!(checker.checks_junctions());

        assert!(checker.check_junction(&seq("GGAC"), &seq("CTAA")).is_empty());
        assert_eq!(
            checker.check_junction(&seq("GGAC"), &seq("GTAA")),
            vec![Violation::Junction {
                motif:    seq("ACGT"),
                position: 2,
            }]
        );
        // GGG spans the boundary of TAGG|GCAT
        assert_eq!(checker.check_junction(&seq("TAGG"), &seq("GCAT")).len(), 1);

        let plain = ConstraintChecker::new(&config.with_lexicographic(false), &motifs)
            .unwrap();
        assert!(plain.check_junction(&seq("GGAC"), &seq("GTAA")).is_empty());
    }
}
