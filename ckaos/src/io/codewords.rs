use std::fs::File;
use std::io::{
    Read,
    Write,
};
use std::path::Path;

use anyhow::Context;
use bio::io::fasta;
use log::info;

use crate::cgr::{
    CgrPoint,
    CodewordTable,
};
use crate::data_structs::typedef::{
    side_for_zoom,
    CellIdx,
};
use crate::data_structs::DnaSequence;
use crate::error::{
    KaosError,
    Result,
};

/// Header of the record of the codeword in `(row, col)`.
pub fn format_header(
    row: CellIdx,
    col: CellIdx,
) -> String {
    format!("row-{},col-{}", row, col)
}

/// Parses a `row-<r>,col-<c>` header.
pub fn parse_header(header: &str) -> Result<(CellIdx, CellIdx)> {
    let malformed = || KaosError::malformed(format!("invalid codeword header {:?}", header));
    let (row, col) = header.trim().split_once(',').ok_or_else(malformed)?;
    let row = row
        .strip_prefix("row-")
        .and_then(|r| r.parse::<CellIdx>().ok())
        .ok_or_else(malformed)?;
    let col = col
        .strip_prefix("col-")
        .and_then(|c| c.parse::<CellIdx>().ok())
        .ok_or_else(malformed)?;
    Ok((row, col))
}

/// Writes codewords as FASTA records named after their cell.
pub struct CodewordWriter<W: Write> {
    writer: fasta::Writer<W>,
}

impl<W: Write> CodewordWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: fasta::Writer::new(writer),
        }
    }

    pub fn write_codeword(
        &mut self,
        sequence: &DnaSequence,
        row: CellIdx,
        col: CellIdx,
    ) -> anyhow::Result<()> {
        self.writer
            .write(
                &format_header(row, col),
                None,
                sequence.to_string().as_bytes(),
            )
            .context("Failed to write codeword")
    }

    /// Writes every codeword of `table` in lexicographic order.
    pub fn write_table(
        &mut self,
        table: &CodewordTable,
    ) -> anyhow::Result<()> {
        for (sequence, (row, col)) in table.iter() {
            self.write_codeword(sequence, *row, *col)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush().context("Failed to flush codewords")
    }
}

impl CodewordWriter<Box<dyn Write>> {
    /// Creates the output file, compressed according to its extension when
    /// the `compression` feature is enabled.
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;

        #[cfg(feature = "compression")]
        let sink: Box<dyn Write> = {
            let compression = crate::io::compression::Compression::from_path(path);
            compression.get_encoder(file, compression.default_level())?
        };
        #[cfg(not(feature = "compression"))]
        let sink: Box<dyn Write> = Box::new(file);

        Ok(Self::new(sink))
    }
}

/// Reads codeword records back into a table. Every header must name the
/// cell the sequence maps to.
pub fn read_codewords<R: Read>(reader: R) -> anyhow::Result<CodewordTable> {
    let mut entries = Vec::new();
    let mut word_length = None;

    for record in fasta::Reader::new(reader).records() {
        let record = record.context("Failed to read codeword record")?;
        let (row, col) = parse_header(record.id())?;
        let sequence = DnaSequence::try_from(record.seq())
            .with_context(|| format!("Invalid codeword in record '{}'", record.id()))?;

        let length = *word_length.get_or_insert(sequence.len());
        if sequence.len() != length || length == 0 {
            anyhow::bail!(
                "Codeword {} in record '{}' has length {}, expected {}",
                sequence,
                record.id(),
                sequence.len(),
                length
            );
        }
        let cell = CgrPoint::from_sequence(&sequence).cell(side_for_zoom(length))?;
        if cell != (row, col) {
            return Err(KaosError::malformed(format!(
                "codeword {} belongs to cell ({}, {}), header says ({}, {})",
                sequence, cell.0, cell.1, row, col
            ))
            .into());
        }
        entries.push((sequence, (row, col)));
    }

    let word_length = word_length.context("No codewords found")?;
    let table = CodewordTable::from_entries(word_length, entries)?;
    info!(
        "Read {} codewords of length {}",
        table.len(),
        table.word_length()
    );
    Ok(table)
}

/// [`read_codewords`] from a file, decompressed according to its extension
/// when the `compression` feature is enabled.
pub fn read_codewords_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<CodewordTable> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open codeword file {}", path.display()))?;

    #[cfg(feature = "compression")]
    let reader = crate::io::compression::Compression::from_path(path).get_decoder(file)?;
    #[cfg(not(feature = "compression"))]
    let reader = file;

    read_codewords(reader)
        .with_context(|| format!("Failed to read codewords from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_header_round_trip() {
        assert_eq!(format_header(12, 3), "row-12,col-3");
        assert_eq!(parse_header("row-12,col-3").unwrap(), (12, 3));
        assert!(parse_header("row-12;col-3").is_err());
        assert!(parse_header("col-3,row-12").is_err());
        assert!(parse_header("row-x,col-3").is_err());
    }

    #[test]
    fn test_write_format() {
        let table = CodewordTable::from_entries(
            2,
            vec![
                ("TT".parse().unwrap(), (4, 4)),
                ("AC".parse().unwrap(), (2, 3)),
            ],
        )
        .unwrap();
        let mut buffer = Vec::new();
        {
            let mut writer = CodewordWriter::new(&mut buffer);
            writer.write_table(&table).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            ">row-2,col-3\nAC\n>row-4,col-4\nTT\n"
        );
    }

    #[test]
    fn test_reader_checks_cells() {
        let good = ">row-4,col-4\nTT\n>row-1,col-1\nGG\n";
        let table = read_codewords(Cursor::new(good)).unwrap();
        assert_eq!(table.len(), 2);

        let wrong_cell = ">row-1,col-1\nTT\n";
        assert!(read_codewords(Cursor::new(wrong_cell)).is_err());
        let mixed = ">row-4,col-4\nTT\n>row-1,col-1\nGGG\n";
        assert!(read_codewords(Cursor::new(mixed)).is_err());
        assert!(read_codewords(Cursor::new("")).is_err());
    }
}
