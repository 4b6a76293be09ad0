pub use crate::cgr::{
    decode,
    CgrPoint,
    CodewordTable,
};
pub use crate::data_structs::typedef::{
    CellIdx,
    Zoom,
    MAX_WORD_LENGTH,
};
pub use crate::data_structs::{
    DnaSequence,
    Grid,
    MotifSet,
    Nucleotide,
};
pub use crate::error::KaosError;
#[cfg(feature = "compression")]
pub use crate::io::compression::Compression;
pub use crate::tools::codebook::Codebook;
pub use crate::tools::engine::{
    ConstrainedGrid,
    ConstraintEngine,
    EngineConfig,
    EngineStage,
    EngineSummary,
    GrowthMonitor,
    NoopMonitor,
};
pub use crate::tools::gc::{
    GcSelection,
    GcTarget,
};
pub use crate::tools::junction::{
    ConcatenationScheme,
    JunctionSet,
};
pub use crate::tools::verify::{
    ConstraintChecker,
    Violation,
};
