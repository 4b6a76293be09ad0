use std::path::PathBuf;

use anyhow::bail;
use ckaos::io::codewords::read_codewords_from_path;
use ckaos::prelude::*;
use clap::Args;
use console::style;
use indicatif::ProgressBar;
use itertools::Itertools;
use log::info;
use rayon::prelude::*;

use crate::utils::{
    init_pbar,
    validate_input,
    ConstraintArgs,
    UtilsArgs,
};

/// Every ordered pair of `words` whose concatenation recreates a junction
/// motif, with the motifs found.
fn junction_violations(
    checker: &ConstraintChecker,
    words: &[DnaSequence],
    progress_bar: &ProgressBar,
) -> Vec<(DnaSequence, DnaSequence, Vec<Violation>)> {
    words
        .par_iter()
        .flat_map_iter(|left| {
            progress_bar.inc(1);
            words.iter().filter_map(move |right| {
                let violations = checker.check_junction(left, right);
                (!violations.is_empty()).then(|| (left.clone(), right.clone(), violations))
            })
        })
        .collect()
}

#[derive(Args, Debug, Clone)]
pub(crate) struct CheckArgs {
    #[arg(required = true, help = "Path to the codeword FASTA file")]
    file: PathBuf,

    #[clap(flatten)]
    constraints: ConstraintArgs,

    #[arg(long, default_value_t = 10, help = "Number of violations to print")]
    show: usize,
}

impl CheckArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let table = read_codewords_from_path(validate_input(&self.file)?)?;
        let config = self.constraints.config(table.word_length())?;
        let checker = ConstraintChecker::new(&config, &self.constraints.motifs()?)?;
        let words = table.sequences().cloned().collect_vec();

        let invalid = words
            .iter()
            .filter_map(|word| {
                let violations = checker.check(word);
                (!violations.is_empty()).then_some((word, violations))
            })
            .collect_vec();
        for (word, violations) in invalid.iter().take(self.show) {
            eprintln!(
                "{} {}: {}",
                style("X").red(),
                word,
                violations.iter().join(", ")
            );
        }

        let mut n_junctions = 0usize;
        if checker.checks_junctions() {
            let progress_bar = if utils.progress {
                init_pbar(words.len())?
            } else {
                ProgressBar::hidden()
            };
            let bad_pairs = junction_violations(&checker, &words, &progress_bar);
            progress_bar.finish_and_clear();

            for (left, right, violations) in bad_pairs.iter().take(self.show) {
                eprintln!(
                    "{} {}|{}: {}",
                    style("X").red(),
                    left,
                    right,
                    violations.iter().join(", ")
                );
            }
            n_junctions = bad_pairs.len();
            info!("Checked {} codeword pairs", words.len() * words.len());
        }

        if !invalid.is_empty() || n_junctions > 0 {
            bail!(
                "{} of {} codewords break the constraints, {} junctions break them",
                invalid.len(),
                words.len(),
                n_junctions
            );
        }
        println!(
            "[{}] All {} codewords satisfy the constraints",
            style("V").green(),
            style(words.len()).green()
        );
        Ok(())
    }
}
