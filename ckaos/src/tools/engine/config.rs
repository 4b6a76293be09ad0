use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::MAX_WORD_LENGTH;
use crate::error::{
    KaosError,
    Result,
};
use crate::tools::gc::GcTarget;
use crate::with_field_fn;

/// Default bound on the number of cells any intermediate grid may hold.
pub const DEFAULT_MAX_CELLS: usize = 1 << 26;

/// Parameters of one codeword generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub word_length:   usize,
    /// Forbidden homopolymer run length. `None` disables the constraint.
    pub homopolymer:   Option<usize>,
    pub gc:            GcTarget,
    /// Also forbid motifs recreated across the junction of two codewords.
    pub lexicographic: bool,
    pub max_cells:     usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            word_length:   8,
            homopolymer:   None,
            gc:            GcTarget::default(),
            lexicographic: false,
            max_cells:     DEFAULT_MAX_CELLS,
        }
    }
}

impl EngineConfig {
    with_field_fn!(word_length, usize);
    with_field_fn!(homopolymer, Option<usize>);
    with_field_fn!(gc, GcTarget);
    with_field_fn!(lexicographic, bool);
    with_field_fn!(max_cells, usize);

    pub fn new(word_length: usize) -> Self {
        Self::default().with_word_length(word_length)
    }

    pub fn validate(&self) -> Result<()> {
        if self.word_length == 0 {
            return Err(KaosError::invalid_length("word length must be positive"));
        }
        if self.word_length > MAX_WORD_LENGTH {
            return Err(KaosError::invalid_length(format!(
                "word length {} exceeds the maximum of {}",
                self.word_length, MAX_WORD_LENGTH
            )));
        }
        match self.homopolymer {
            Some(0) => {
                return Err(KaosError::invalid_length(
                    "homopolymer length must be positive",
                ))
            },
            Some(hp) if hp > self.word_length => {
                return Err(KaosError::invalid_length(format!(
                    "homopolymer length {} exceeds the word length {}",
                    hp, self.word_length
                )))
            },
            _ => {},
        }
        if self.max_cells == 0 {
            return Err(KaosError::domain("cell limit must be positive"));
        }
        self.gc.validate()
    }
}
