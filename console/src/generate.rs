use std::fs::File;
use std::path::PathBuf;

use anyhow::{
    bail,
    Context,
};
use ckaos::io::codewords::CodewordWriter;
use ckaos::plots::write_grid_plot;
use ckaos::prelude::*;
use ckaos::tools::engine::DEFAULT_MAX_CELLS;
use clap::Args;
use console::style;
use log::info;

use crate::utils::{
    validate_output,
    ConstraintArgs,
    ProgressMonitor,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct GenerateArgs {
    #[arg(short, long, required = true, help = "Codeword length")]
    length: usize,

    #[arg(
        short,
        long,
        required = true,
        help = "Path to the codeword FASTA file (compressed by extension)"
    )]
    output: PathBuf,

    #[clap(flatten)]
    constraints: ConstraintArgs,

    #[arg(long, value_name = "DOT_SIZE", help = "Write an HTML plot of the final grid")]
    plot: Option<usize>,

    #[arg(
        long,
        help = "Write the JSON concatenation scheme (motif prefix to completing suffixes)"
    )]
    scheme: Option<PathBuf>,

    #[arg(long, help = "Write a JSON run summary to this path")]
    summary: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_MAX_CELLS, help = "Cell limit of any intermediate grid")]
    max_cells: usize,
}

impl GenerateArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        validate_output(&self.output)?;
        for path in self.summary.iter().chain(self.scheme.iter()) {
            validate_output(path)?;
        }
        if self.plot == Some(0) {
            bail!("Plot dot size must be positive");
        }

        let config = self
            .constraints
            .config(self.length)?
            .with_max_cells(self.max_cells);
        config.validate().context("Invalid generation parameters")?;
        let motifs = self.constraints.motifs()?;

        let monitor = ProgressMonitor::new(utils.progress);
        let result = ConstraintEngine::run(config, &motifs, &monitor);
        monitor.finish();
        let result = result.context("Codeword generation failed")?;

        let table = result.codewords()?;
        let mut writer = CodewordWriter::from_path(&self.output)?;
        writer.write_table(&table)?;
        writer.flush()?;
        info!(
            "Wrote {} codewords to {}",
            table.len(),
            self.output.display()
        );

        if let Some(dot_size) = self.plot {
            write_grid_plot(
                result.grid(),
                dot_size,
                self.output.with_extension("html"),
            )?;
        }
        if let Some(path) = self.scheme.as_ref() {
            let scheme = ConcatenationScheme::from_motifs(&self.constraints.scheme_motifs(&motifs)?);
            let file = File::create(path)
                .with_context(|| format!("Failed to create scheme file {}", path.display()))?;
            scheme.write_json(file)?;
            info!(
                "Wrote concatenation scheme of {} prefixes to {}",
                scheme.len(),
                path.display()
            );
        }
        if let Some(path) = self.summary.as_ref() {
            let file = File::create(path)
                .with_context(|| format!("Failed to create summary file {}", path.display()))?;
            result.summary().write_json(file)?;
        }

        println!(
            "[{}] {} codewords of length {}, ratio {}",
            style("V").green(),
            style(result.n_codewords()).green(),
            self.length,
            style(format!("{:.6}", result.ratio())).green()
        );
        Ok(())
    }
}
