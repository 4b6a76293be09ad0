use std::collections::BTreeSet;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use assert_approx_eq::assert_approx_eq;
use ckaos::prelude::*;
use itertools::Itertools;
use rstest::*;

mod common;
use common::*;

#[test]
fn test_homopolymer_pairs() {
    let config = EngineConfig::new(2).with_homopolymer(Some(2));
    let result = ConstraintEngine::run(config, &MotifSet::new(), &NoopMonitor).unwrap();

    assert_eq!(result.n_codewords(), 12);
    assert_approx_eq!(result.ratio(), 0.75);
    let words = result.sorted_codewords().unwrap();
    for base in Nucleotide::ALL {
        assert!(!words.contains(&DnaSequence::homopolymer(base, 2)));
    }
}

#[test]
fn test_full_gc_words() {
    let config = EngineConfig::new(3).with_gc(GcTarget::Exact(1.0));
    let result = ConstraintEngine::run(config.clone(), &MotifSet::new(), &NoopMonitor)
        .unwrap();

    let grid = result.grid();
    assert_eq!(grid.n_rows(), 1);
    assert!(grid.rows().contains_key(&1));
    assert_eq!(result.n_codewords(), 8);

    let words = result.sorted_codewords().unwrap();
    assert!(words.iter().all(|w| w.gc_count() == 3));
    assert_eq!(
        words.into_iter().collect::<BTreeSet<_>>(),
        brute_force(&config, &MotifSet::new())
    );
}

#[test]
fn test_lexicographic_without_motifs_changes_nothing() {
    let plain = EngineConfig::new(4).with_gc(GcTarget::Range {
        start: 0.25,
        end:   0.75,
    });
    let lex = plain.clone().with_lexicographic(true);
    let plain_result = ConstraintEngine::run(plain, &MotifSet::new(), &NoopMonitor).unwrap();
    let lex_result = ConstraintEngine::run(lex, &MotifSet::new(), &NoopMonitor).unwrap();

    assert_eq!(plain_result.grid(), lex_result.grid());
    assert_eq!(lex_result.summary().junction_grids, 0);
}

#[test]
fn test_motif_as_long_as_word() {
    let motifs: MotifSet = vec![seq("ACGT")].into_iter().collect();
    let result = ConstraintEngine::run(EngineConfig::new(4), &motifs, &NoopMonitor).unwrap();
    assert_eq!(result.n_codewords(), 255);
    assert!(!result.sorted_codewords().unwrap().contains(&seq("ACGT")));
}

#[test]
fn test_ratio_never_grows_with_more_motifs() {
    let all = random_motifs(7, 12, 2..=4);
    let mut motifs = MotifSet::new();
    let mut previous = 1.0;
    for motif in all.iter().sorted() {
        motifs.insert(motif.clone());
        let ratio = ConstraintEngine::run(EngineConfig::new(5), &motifs, &NoopMonitor)
            .unwrap()
            .ratio();
        assert!(ratio <= previous + 1e-12);
        previous = ratio;
    }
}

#[rstest]
#[case::hp_only(EngineConfig::new(5).with_homopolymer(Some(3)), 0)]
#[case::motifs_only(EngineConfig::new(5), 1)]
#[case::gc_exact(EngineConfig::new(6).with_gc(GcTarget::Exact(0.5)), 2)]
#[case::everything(
    EngineConfig::new(6)
        .with_homopolymer(Some(2))
        .with_gc(GcTarget::Range { start: 0.3, end: 0.7 }),
    3
)]
#[case::short_word_long_motifs(EngineConfig::new(3).with_homopolymer(Some(3)), 4)]
fn test_engine_matches_brute_force(
    #[case] config: EngineConfig,
    #[case] seed: u64,
) {
    let motifs = if seed == 0 {
        MotifSet::new()
    } else {
        random_motifs(seed, 6, 2..=5)
    };
    assert_eq!(engine_words(&config, &motifs), brute_force(&config, &motifs));
}

#[rstest]
#[case(4, Some(3), 11)]
#[case(5, None, 12)]
#[case(5, Some(2), 13)]
fn test_lexicographic_words_never_join_into_motif(
    #[case] word_length: usize,
    #[case] homopolymer: Option<usize>,
    #[case] seed: u64,
) {
    let motifs = random_motifs(seed, 4, 2..=word_length);
    let plain = EngineConfig::new(word_length).with_homopolymer(homopolymer);
    let lex = plain.clone().with_lexicographic(true);

    let plain_words = engine_words(&plain, &motifs);
    let lex_words = engine_words(&lex, &motifs);
    assert!(lex_words.is_subset(&plain_words));

    let checker = ConstraintChecker::new(&lex, &motifs).unwrap();
    for (left, right) in lex_words.iter().cartesian_product(lex_words.iter()) {
        assert!(
            checker.check_junction(left, right).is_empty(),
            "{}{} recreates a motif",
            left,
            right
        );
    }
}

#[test]
fn test_codewords_decode_to_their_cells() {
    let config = EngineConfig::new(6).with_homopolymer(Some(3));
    let result = ConstraintEngine::run(config, &random_motifs(21, 5, 3..=4), &NoopMonitor)
        .unwrap();
    let table = result.codewords().unwrap();
    assert_eq!(table.len(), result.n_codewords());
    for (word, (row, col)) in table.iter() {
        assert_eq!(CgrPoint::from_sequence(word).cell(64).unwrap(), (*row, *col));
    }
}

struct CountingMonitor(AtomicUsize);

impl GrowthMonitor for CountingMonitor {
    fn on_step(
        &self,
        _source: &str,
        _zoom: usize,
        _target: usize,
    ) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn test_monitor_sees_every_step() {
    let monitor = CountingMonitor(AtomicUsize::new(0));
    let motifs: MotifSet = vec![seq("ACG")].into_iter().collect();
    let config = EngineConfig::new(6).with_homopolymer(Some(2));
    ConstraintEngine::run(config, &motifs, &monitor).unwrap();
    // homopolymer source: zooms 2..=6, motif source: zooms 3..=6
    assert_eq!(monitor.0.load(Ordering::Relaxed), 5 + 4);
}

#[test]
fn test_invalid_configurations() {
    let run = |config: EngineConfig| {
        ConstraintEngine::run(config, &MotifSet::new(), &NoopMonitor)
    };
    assert!(matches!(
        run(EngineConfig::new(0)),
        Err(KaosError::InvalidLength(_))
    ));
    assert!(matches!(
        run(EngineConfig::new(3).with_homopolymer(Some(4))),
        Err(KaosError::InvalidLength(_))
    ));
    assert!(matches!(
        run(EngineConfig::new(3).with_gc(GcTarget::Exact(0.5))),
        Err(KaosError::ArithmeticDomain(_))
    ));
}
