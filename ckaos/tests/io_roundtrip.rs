use std::fs::File;

use bio::io::fasta::Writer as FastaWriter;
use ckaos::io::codewords::{
    read_codewords_from_path,
    CodewordWriter,
};
use ckaos::io::fasta::read_motifs_from_path;
use ckaos::prelude::*;
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};
use rstest::*;
use tempfile::TempDir;

mod common;
use common::*;

#[fixture]
fn workdir() -> TempDir {
    tempfile::tempdir().unwrap()
}

#[fixture]
fn generated() -> ConstrainedGrid {
    let motifs: MotifSet = ["GATC", "CCGG", "TTA"].iter().map(|s| seq(s)).collect();
    let config = EngineConfig::new(6)
        .with_homopolymer(Some(3))
        .with_gc(GcTarget::Range {
            start: 0.4,
            end:   0.6,
        })
        .with_lexicographic(true);
    ConstraintEngine::run(config, &motifs, &NoopMonitor).unwrap()
}

fn write_motifs(
    dir: &TempDir,
    name: &str,
    motifs: &[&str],
) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let file = File::create(&path).unwrap();
    let mut writer = FastaWriter::new(file);
    for (idx, motif) in motifs.iter().enumerate() {
        writer
            .write(&format!("motif_{}", idx), None, motif.as_bytes())
            .unwrap();
    }
    writer.flush().unwrap();
    path
}

#[rstest]
fn test_read_motif_file(workdir: TempDir) {
    let path = write_motifs(&workdir, "motifs.fa", &["ACGT", "acgt", "GGC", "TTTTTTTT"]);
    let motifs = read_motifs_from_path(&path).unwrap();
    assert_eq!(motifs.len(), 3);
    assert_eq!(motifs.lengths().collect::<Vec<_>>(), vec![3, 4, 8]);

    let result = ConstraintEngine::run(EngineConfig::new(5), &motifs, &NoopMonitor).unwrap();
    assert_eq!(result.summary().dropped_motifs, vec![seq("TTTTTTTT")]);
    assert_eq!(result.summary().n_motifs, 2);
}

#[rstest]
fn test_missing_motif_file(workdir: TempDir) {
    let err = read_motifs_from_path(workdir.path().join("missing.fa")).unwrap_err();
    assert!(err.to_string().contains("missing.fa"));
}

#[rstest]
#[case::plain("codewords.fa")]
#[case::gzip("codewords.fa.gz")]
#[case::zstd("codewords.fa.zst")]
#[case::bzip2("codewords.fa.bz2")]
#[case::xz("codewords.fa.xz")]
fn test_codeword_file_round_trip(
    workdir: TempDir,
    generated: ConstrainedGrid,
    #[case] name: &str,
) {
    let table = generated.codewords().unwrap();
    assert!(!table.is_empty());
    let path = workdir.path().join(name);
    {
        let mut writer = CodewordWriter::from_path(&path).unwrap();
        writer.write_table(&table).unwrap();
        writer.flush().unwrap();
    }

    let read_back = read_codewords_from_path(&path).unwrap();
    assert_eq!(read_back, table);
    assert_eq!(&read_back.to_grid().unwrap(), generated.grid());
}

#[rstest]
fn test_codebook_from_generated_words(generated: ConstrainedGrid) {
    let table = generated.codewords().unwrap();
    let codebook = Codebook::from_table(&table).unwrap();
    assert_eq!(codebook.len(), generated.n_codewords());
    assert!(codebook.information_rate() > 0.0);
    assert!(codebook.information_rate() <= 2.0);

    let mut rng = StdRng::seed_from_u64(2024);
    let data: Vec<u8> = (0..257).map(|_| rng.gen()).collect();
    let words = codebook.encode(&data);
    assert!(words.iter().all(|w| table.contains(w)));
    assert_eq!(codebook.decode(&words, data.len()).unwrap(), data);
}
