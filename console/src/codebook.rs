use std::fs::File;
use std::io::{
    Read,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    anyhow,
    Context,
};
use bio::io::fasta;
use ckaos::io::codewords::read_codewords_from_path;
use ckaos::prelude::*;
use clap::Args;
use console::style;
use log::info;

use crate::utils::{
    validate_input,
    validate_output,
    UtilsArgs,
};

const PAYLOAD_ID: &str = "payload";

fn load_codebook(path: &Path) -> anyhow::Result<Codebook> {
    let table = read_codewords_from_path(validate_input(path)?)?;
    let codebook = Codebook::from_table(&table)?;
    info!(
        "Codebook of {} codewords, {} bits per codeword ({:.4} bits/nt)",
        codebook.len(),
        codebook.bits_per_codeword(),
        codebook.information_rate()
    );
    Ok(codebook)
}

/// Payload length is kept in the record description as `bytes=<n>`.
fn parse_n_bytes(description: Option<&str>) -> anyhow::Result<usize> {
    let description = description.ok_or_else(|| anyhow!("Payload record has no description"))?;
    description
        .split_whitespace()
        .find_map(|field| field.strip_prefix("bytes="))
        .ok_or_else(|| anyhow!("Payload description {:?} has no byte count", description))?
        .parse::<usize>()
        .context("Invalid payload byte count")
}

#[derive(Args, Debug, Clone)]
pub(crate) struct EncodeArgs {
    #[arg(short, long, required = true, help = "Codeword FASTA file to use as codebook")]
    codewords: PathBuf,

    #[arg(required = true, help = "File to encode")]
    file: PathBuf,

    #[arg(short, long, required = true, help = "Path to the encoded FASTA file")]
    output: PathBuf,
}

impl EncodeArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let codebook = load_codebook(&self.codewords)?;

        let mut data = Vec::new();
        File::open(validate_input(&self.file)?)?
            .read_to_end(&mut data)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let sequence = codebook.encode_sequence(&data);

        let output = File::create(validate_output(&self.output)?)
            .with_context(|| format!("Failed to create {}", self.output.display()))?;
        let description = format!("bytes={}", data.len());
        let mut writer = fasta::Writer::new(output);
        writer.write(
            PAYLOAD_ID,
            Some(description.as_str()),
            sequence.to_string().as_bytes(),
        )?;
        writer.flush()?;

        println!(
            "[{}] Encoded {} bytes into {} nt",
            style("V").green(),
            style(data.len()).green(),
            style(sequence.len()).green()
        );
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct DecodeArgs {
    #[arg(short, long, required = true, help = "Codeword FASTA file used as codebook")]
    codewords: PathBuf,

    #[arg(required = true, help = "Encoded FASTA file")]
    file: PathBuf,

    #[arg(short, long, required = true, help = "Path to the decoded file")]
    output: PathBuf,
}

impl DecodeArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let codebook = load_codebook(&self.codewords)?;

        let reader = fasta::Reader::from_file(validate_input(&self.file)?)
            .with_context(|| format!("Failed to open {}", self.file.display()))?;
        let record = reader
            .records()
            .next()
            .ok_or_else(|| anyhow!("{} contains no records", self.file.display()))??;
        let n_bytes = parse_n_bytes(record.desc())?;
        let sequence = DnaSequence::try_from(record.seq())?;
        let data = codebook.decode_sequence(&sequence, n_bytes)?;

        let mut output = File::create(validate_output(&self.output)?)
            .with_context(|| format!("Failed to create {}", self.output.display()))?;
        output.write_all(&data)?;

        println!(
            "[{}] Decoded {} nt into {} bytes",
            style("V").green(),
            style(sequence.len()).green(),
            style(data.len()).green()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_n_bytes() {
        assert_eq!(parse_n_bytes(Some("bytes=257")).unwrap(), 257);
        assert_eq!(parse_n_bytes(Some("codebook=x bytes=3")).unwrap(), 3);
        assert!(parse_n_bytes(Some("bytes=x")).is_err());
        assert!(parse_n_bytes(None).is_err());
    }
}
