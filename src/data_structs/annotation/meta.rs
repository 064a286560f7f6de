use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::{
    PosType,
    SeqStr,
};
use crate::with_field_fn;

/// Provenance of a whole annotated genome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeMeta {
    pub species:       String,
    pub accession:     String,
    pub version:       String,
    pub acquired_from: String,
    pub number_genes:  u64,
}

impl GenomeMeta {
    with_field_fn!(species, String);

    with_field_fn!(accession, String);

    with_field_fn!(version, String);

    with_field_fn!(acquired_from, String);
}

/// Length record for one sequence, the boundary-clamping collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceMeta {
    pub seqid:    SeqStr,
    pub total_bp: PosType,
}

impl SequenceMeta {
    pub fn new<S: Into<SeqStr>>(
        seqid: S,
        total_bp: PosType,
    ) -> Self {
        SequenceMeta {
            seqid: seqid.into(),
            total_bp,
        }
    }
}
