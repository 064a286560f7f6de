mod feature;
mod genome;
mod ids;
mod locus;
mod meta;
mod record;
mod transcript;

pub use feature::Feature;
pub use genome::AnnotatedGenome;
pub use ids::IdAllocator;
pub use locus::SuperLocus;
pub use meta::{GenomeMeta, SequenceMeta};
pub use record::AnnotationRecord;
pub use transcript::Transcript;
