#![allow(dead_code)]
use std::collections::BTreeSet;

use ckaos::prelude::*;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};

pub fn seq(s: &str) -> DnaSequence {
    s.parse().unwrap()
}

pub fn all_words(length: usize) -> Vec<DnaSequence> {
    (0..length)
        .map(|_| Nucleotide::ALL.iter().copied())
        .multi_cartesian_product()
        .map(DnaSequence::from_nucleotides)
        .collect_vec()
}

pub fn random_sequence(
    rng: &mut StdRng,
    length: usize,
) -> DnaSequence {
    (0..length)
        .map(|_| Nucleotide::ALL[rng.gen_range(0..4)])
        .collect_vec()
        .into()
}

/// `n` random motifs with lengths in `lengths`.
pub fn random_motifs(
    seed: u64,
    n: usize,
    lengths: std::ops::RangeInclusive<usize>,
) -> MotifSet {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let length = rng.gen_range(lengths.clone());
            random_sequence(&mut rng, length)
        })
        .collect()
}

/// Every word of the word length passing the per-word checks.
pub fn brute_force(
    config: &EngineConfig,
    motifs: &MotifSet,
) -> BTreeSet<DnaSequence> {
    let checker = ConstraintChecker::new(config, motifs).unwrap();
    all_words(config.word_length)
        .into_iter()
        .filter(|word| checker.is_valid(word))
        .collect()
}

pub fn engine_words(
    config: &EngineConfig,
    motifs: &MotifSet,
) -> BTreeSet<DnaSequence> {
    ConstraintEngine::run(config.clone(), motifs, &NoopMonitor)
        .unwrap()
        .sorted_codewords()
        .unwrap()
        .into_iter()
        .collect()
}
