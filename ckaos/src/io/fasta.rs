use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use bio::io::fasta;
use log::{
    debug,
    info,
};

use crate::data_structs::{
    DnaSequence,
    MotifSet,
};

/// Reads forbidden motifs from FASTA records. Record names are ignored and
/// duplicates collapse.
pub fn read_motifs<R: Read>(reader: R) -> anyhow::Result<MotifSet> {
    let mut motifs = MotifSet::new();
    let mut n_records = 0usize;
    for record in fasta::Reader::new(reader).records() {
        let record = record.context("Failed to read FASTA record")?;
        let motif = DnaSequence::try_from(record.seq())
            .with_context(|| format!("Invalid motif in record '{}'", record.id()))?;
        debug!("Read motif {} ({})", motif, record.id());
        motifs.insert(motif);
        n_records += 1;
    }
    info!(
        "Read {} motifs ({} unique) of lengths {:?}",
        n_records,
        motifs.len(),
        motifs.lengths().collect::<Vec<_>>()
    );
    Ok(motifs)
}

/// [`read_motifs`] from a file, decompressed according to its extension
/// when the `compression` feature is enabled.
pub fn read_motifs_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<MotifSet> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open motif file {}", path.display()))?;

    #[cfg(feature = "compression")]
    let reader = crate::io::compression::Compression::from_path(path).get_decoder(file)?;
    #[cfg(not(feature = "compression"))]
    let reader = file;

    read_motifs(reader).with_context(|| format!("Failed to read motifs from {}", path.display()))
}
