use std::collections::BTreeMap;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::Mutex;

use anyhow::{
    anyhow,
    bail,
};
use ckaos::io::fasta::read_motifs_from_path;
use ckaos::prelude::{
    EngineConfig,
    GcTarget,
    GrowthMonitor,
    MotifSet,
};
use clap::Args;
use indicatif::{
    MultiProgress,
    ProgressBar,
    ProgressStyle,
};
use log::LevelFilter;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        long,
        help = "Number of threads to use [default: CKAOS_NUM_THREADS or all cores]"
    )]
    pub threads:  Option<usize>,
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Verbose output (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose:  u8,
    #[arg(long, default_value_t = false, help = "Display progress bar")]
    pub progress: bool,
}

impl UtilsArgs {
    pub fn setup(&self) -> anyhow::Result<()> {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        pretty_env_logger::formatted_builder()
            .filter_level(level)
            .parse_default_env()
            .try_init()?;

        if let Some(threads) = self.threads {
            if threads == 0 {
                bail!("Number of threads must be positive");
            }
            std::env::set_var("CKAOS_NUM_THREADS", threads.to_string());
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()?;
        }
        Ok(())
    }
}

/// Constraint flags shared by `generate` and `check`.
#[derive(Args, Debug, Clone)]
pub(crate) struct ConstraintArgs {
    #[arg(long, help = "Forbid homopolymer runs of this length or longer")]
    pub hp:       Option<usize>,

    #[arg(short, long, help = "FASTA file with forbidden motifs")]
    pub input:    Option<PathBuf>,

    #[arg(
        long,
        conflicts_with_all = ["gc_start", "gc_end"],
        help = "Exact GC fraction of every codeword"
    )]
    pub gc:       Option<f64>,

    #[arg(long, default_value_t = 0.0, help = "Lower bound of the GC fraction")]
    pub gc_start: f64,

    #[arg(long, default_value_t = 1.0, help = "Upper bound of the GC fraction")]
    pub gc_end:   f64,

    #[arg(
        long,
        default_value_t = false,
        help = "Forbid motifs across the junction of two codewords"
    )]
    pub lex:      bool,
}

impl ConstraintArgs {
    pub fn gc_target(&self) -> GcTarget {
        match self.gc {
            Some(fraction) => GcTarget::Exact(fraction),
            None => {
                GcTarget::Range {
                    start: self.gc_start,
                    end:   self.gc_end,
                }
            },
        }
    }

    pub fn config(
        &self,
        word_length: usize,
    ) -> anyhow::Result<EngineConfig> {
        let config = EngineConfig::new(word_length)
            .with_homopolymer(self.hp)
            .with_gc(self.gc_target())
            .with_lexicographic(self.lex);
        config.validate()?;
        Ok(config)
    }

    /// Forbidden motifs together with the homopolymer runs, the motifs a
    /// concatenation scheme is built from.
    pub fn scheme_motifs(
        &self,
        motifs: &MotifSet,
    ) -> anyhow::Result<MotifSet> {
        let mut all = motifs.clone();
        if let Some(hp) = self.hp {
            all.extend(MotifSet::homopolymers(hp)?);
        }
        Ok(all)
    }

    pub fn motifs(&self) -> anyhow::Result<MotifSet> {
        match self.input.as_ref() {
            Some(path) => read_motifs_from_path(validate_input(path)?),
            None => Ok(MotifSet::new()),
        }
    }
}

pub fn init_pbar(total: usize) -> anyhow::Result<ProgressBar> {
    let progress_bar = ProgressBar::new(total as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}, ETA: {eta}] [{bar:40.cyan/blue}] {pos:>5.green}/{len:5} {msg}")?
            .progress_chars("#>-"),
    );
    progress_bar.set_message("Processing...");
    Ok(progress_bar)
}

pub fn validate_input(path: &Path) -> anyhow::Result<PathBuf> {
    if !path.exists() {
        return Err(anyhow!("Path {} does not exist.", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow!("Path {} is not a file.", path.display()));
    }
    Ok(path.to_path_buf())
}

pub fn validate_output(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_dir() {
        return Err(anyhow!("Path {} is a directory.", path.display()));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(anyhow!(
                "Directory {} does not exist.",
                parent.display()
            ));
        }
    }
    Ok(path.to_path_buf())
}

/// One progress bar per pattern source, created on its first growth step.
pub(crate) struct ProgressMonitor {
    bars:    MultiProgress,
    sources: Mutex<BTreeMap<String, ProgressBar>>,
    enabled: bool,
}

impl ProgressMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            bars: MultiProgress::new(),
            sources: Mutex::new(BTreeMap::new()),
            enabled,
        }
    }

    pub fn finish(&self) {
        if let Ok(sources) = self.sources.lock() {
            for bar in sources.values() {
                bar.finish_and_clear();
            }
        }
    }
}

impl GrowthMonitor for ProgressMonitor {
    fn on_step(
        &self,
        source: &str,
        zoom: usize,
        target: usize,
    ) {
        if !self.enabled {
            return;
        }
        let Ok(mut sources) = self.sources.lock() else {
            return;
        };
        let bar = sources.entry(source.to_string()).or_insert_with(|| {
            let bar = init_pbar(target).unwrap_or_else(|_| ProgressBar::hidden());
            bar.set_message(format!("Growing {}", source));
            self.bars.add(bar)
        });
        bar.set_position(zoom as u64);
    }
}

#[cfg(test)]
mod tests {
    use ckaos::prelude::DnaSequence;
    use clap::Parser;

    use super::*;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[clap(flatten)]
        utils: UtilsArgs,
    }

    #[test]
    fn test_threads_only_set_when_given() {
        let cli = TestCli::parse_from(["ckaos"]);
        assert_eq!(cli.utils.threads, None);

        let cli = TestCli::parse_from(["ckaos", "--threads", "4", "-vv"]);
        assert_eq!(cli.utils.threads, Some(4));
        assert_eq!(cli.utils.verbose, 2);
    }

    #[derive(Parser, Debug)]
    struct ConstraintCli {
        #[clap(flatten)]
        constraints: ConstraintArgs,
    }

    #[test]
    fn test_scheme_motifs_include_homopolymers() {
        let cli = ConstraintCli::parse_from(["ckaos", "--hp", "2"]);
        let motifs: MotifSet = ["ACGT".parse::<DnaSequence>().unwrap()].into_iter().collect();
        let all = cli.constraints.scheme_motifs(&motifs).unwrap();
        assert_eq!(all.len(), 5);
        assert!(all.contains(&"GG".parse().unwrap()));

        let cli = ConstraintCli::parse_from(["ckaos"]);
        assert_eq!(cli.constraints.scheme_motifs(&motifs).unwrap(), motifs);
    }
}
