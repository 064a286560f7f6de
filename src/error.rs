//! Error types for the annotation engine.
//!
//! The taxonomy separates three severities: one error aborts the whole
//! run (an unknown vocabulary word in the input), most abort only the
//! locus being interpreted, and the remaining malformed-input conditions
//! are not errors at all — they degrade the offending feature to the
//! `error` type and processing continues.

use thiserror::Error;

use crate::data_structs::Frame;
use crate::data_structs::typedef::PosType;

pub type Result<T> = std::result::Result<T, AnnotError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotError {
    /// Unknown annotation type in the input stream. Aborts the run.
    #[error("unrecognized feature type from gff: {found}")]
    UnrecognizedType { found: String },

    /// A transcript record must declare exactly one parent, the gene id.
    #[error(
        "transcript {child} must have exactly one parent equal to {locus}, \
         got {parents:?}"
    )]
    ParentMismatch {
        child:   String,
        locus:   String,
        parents: Vec<String>,
    },

    /// Sequence id missing from the length catalog.
    #[error("unknown sequence {seqid} in the length catalog")]
    UnknownSequence { seqid: String },

    /// A linked feature id is absent from its owning locus.
    #[error("feature {id} is linked but absent from its locus")]
    MissingFeature { id: String },

    /// Interval partitioning requires at least one linked feature.
    #[error("transcript {id} has no linked features")]
    EmptyTranscript { id: String },

    /// A transcript cannot be walked 5'->3' without an orientation.
    #[error("feature {id} has no usable strand")]
    MissingStrand { id: String },

    /// A cluster whose type combination has no interpretation.
    #[error(
        "cannot resolve cluster of types {observed:?} over {n_intervals} \
         intervals"
    )]
    UnresolvedClusterType {
        observed:    Vec<String>,
        n_intervals: usize,
    },

    /// First cluster is neither 5' UTR nor coding.
    #[error("transcript cannot start with types {observed:?}")]
    InvalidTranscriptStart { observed: Vec<String> },

    /// Last cluster is neither 3' UTR nor coding.
    #[error("transcript cannot end with types {observed:?}")]
    InvalidTranscriptEnd { observed: Vec<String> },

    /// Flanking features must touch where a codon is synthesized.
    #[error("gap between {upstream} and {downstream} where features must be adjacent")]
    Gap {
        upstream:   PosType,
        downstream: PosType,
    },

    /// A start codon requires the canonical first-codon frame.
    #[error("start codon requires frame 0, found {found}")]
    Frame { found: Frame },

    /// Flanking features must leave a gap where an intron is synthesized.
    #[error(
        "features are contiguous at {upstream}..{downstream} where an intron \
         was expected"
    )]
    Adjacency {
        upstream:   PosType,
        downstream: PosType,
    },

    /// No rule covers this cluster pair in the current status.
    #[error("no rule for leaving {status} between {before:?} and {after:?}")]
    UnexpectedTransition {
        status: String,
        before: Vec<String>,
        after:  Vec<String>,
    },

    /// The status table has no entry for this feature type.
    #[error("do not know how to set status after feature of type {found}")]
    UnknownTransition { found: String },
}

impl AnnotError {
    /// Whether this error invalidates the whole run rather than one locus.
    pub fn aborts_run(&self) -> bool {
        matches!(self, AnnotError::UnrecognizedType { .. })
    }
}
