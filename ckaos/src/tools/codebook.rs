//! Mapping between binary data and codewords.
//!
//! The codebook numbers the codewords in lexicographic order and uses the
//! first `2^bits` of them, `bits = floor(log2(n))`. Data is read MSB first
//! in chunks of `bits` bits; every chunk selects one codeword.

use itertools::Itertools;
use log::debug;

use crate::cgr::CodewordTable;
use crate::data_structs::DnaSequence;
use crate::error::{
    KaosError,
    Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebook {
    word_length: usize,
    bits:        u32,
    codewords:   Vec<DnaSequence>,
}

impl Codebook {
    pub fn from_table(table: &CodewordTable) -> Result<Self> {
        Self::from_codewords(table.word_length(), table.sequences().cloned())
    }

    pub fn from_codewords<I>(
        word_length: usize,
        codewords: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = DnaSequence>, {
        let codewords = codewords.into_iter().sorted().dedup().collect_vec();
        if let Some(word) = codewords.iter().find(|w| w.len() != word_length) {
            return Err(KaosError::invalid_length(format!(
                "codeword {} has length {}, expected {}",
                word,
                word.len(),
                word_length
            )));
        }
        if codewords.len() < 2 {
            return Err(KaosError::domain(format!(
                "a codebook needs at least two codewords, got {}",
                codewords.len()
            )));
        }
        let bits = codewords.len().ilog2();
        debug!(
            "Codebook of {} codewords carries {} bits per word",
            codewords.len(),
            bits
        );
        Ok(Self {
            word_length,
            bits,
            codewords,
        })
    }

    pub fn word_length(&self) -> usize {
        self.word_length
    }

    pub fn len(&self) -> usize {
        self.codewords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codewords.is_empty()
    }

    pub fn bits_per_codeword(&self) -> u32 {
        self.bits
    }

    /// Bits stored per nucleotide.
    pub fn information_rate(&self) -> f64 {
        self.bits as f64 / self.word_length as f64
    }

    pub fn codeword(
        &self,
        index: usize,
    ) -> Option<&DnaSequence> {
        self.codewords.get(index)
    }

    pub fn index_of(
        &self,
        word: &DnaSequence,
    ) -> Option<usize> {
        self.codewords.binary_search(word).ok()
    }

    /// Codewords carrying `data`. The last chunk is padded with zero bits.
    pub fn encode(
        &self,
        data: &[u8],
    ) -> Vec<DnaSequence> {
        let bits = self.bits as usize;
        let total = data.len() * 8;
        let bit_at = |pos: usize| -> usize {
            if pos < total {
                ((data[pos / 8] >> (7 - pos % 8)) & 1) as usize
            } else {
                0
            }
        };

        (0..total.div_ceil(bits))
            .map(|chunk| {
                let index = (0..bits)
                    .fold(0usize, |acc, offset| (acc << 1) | bit_at(chunk * bits + offset));
                self.codewords[index].clone()
            })
            .collect()
    }

    /// Inverse of [`Codebook::encode`], returning the first `n_bytes` bytes.
    pub fn decode(
        &self,
        words: &[DnaSequence],
        n_bytes: usize,
    ) -> Result<Vec<u8>> {
        let bits = self.bits as usize;
        if words.len() * bits < n_bytes * 8 {
            return Err(KaosError::malformed(format!(
                "{} codewords carry {} bits, {} bytes requested",
                words.len(),
                words.len() * bits,
                n_bytes
            )));
        }

        let mut out = vec![0u8; n_bytes];
        let mut pos = 0usize;
        for word in words {
            let index = self
                .index_of(word)
                .filter(|index| *index < (1usize << bits))
                .ok_or_else(|| {
                    KaosError::malformed(format!("{} is not a codeword of the codebook", word))
                })?;
            for offset in (0..bits).rev() {
                if pos >= n_bytes * 8 {
                    break;
                }
                if (index >> offset) & 1 == 1 {
                    out[pos / 8] |= 1 << (7 - pos % 8);
                }
                pos += 1;
            }
        }
        Ok(out)
    }

    /// [`Codebook::encode`] with the codewords concatenated.
    pub fn encode_sequence(
        &self,
        data: &[u8],
    ) -> DnaSequence {
        self.encode(data)
            .into_iter()
            .flat_map(|word| word.nucleotides().to_vec())
            .collect_vec()
            .into()
    }

    /// Splits `sequence` into codewords and decodes them.
    pub fn decode_sequence(
        &self,
        sequence: &DnaSequence,
        n_bytes: usize,
    ) -> Result<Vec<u8>> {
        if sequence.len() % self.word_length != 0 {
            return Err(KaosError::invalid_length(format!(
                "sequence of length {} is not a whole number of codewords of length {}",
                sequence.len(),
                self.word_length
            )));
        }
        let words = sequence
            .nucleotides()
            .chunks(self.word_length)
            .map(|chunk| DnaSequence::from_nucleotides(chunk.to_vec()))
            .collect_vec();
        self.decode(&words, n_bytes)
    }
}
