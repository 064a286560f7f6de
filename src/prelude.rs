pub use crate::data_structs::annotation::{
    AnnotatedGenome,
    AnnotationRecord,
    Feature,
    GenomeMeta,
    IdAllocator,
    SequenceMeta,
    SuperLocus,
    Transcript,
};
pub use crate::data_structs::coords::{
    clusters,
    split_intervals,
    PosInterval,
};
pub use crate::data_structs::typedef::{
    IdStr,
    PosType,
    SeqStr,
};
pub use crate::data_structs::{
    FeatureCategory,
    FeatureType,
    Frame,
    Strand,
};
pub use crate::error::AnnotError;
pub use crate::interpreter::{
    InterpreterConfig,
    TranscriptInterpreter,
    DEFAULT_ERROR_BUFFER,
};
