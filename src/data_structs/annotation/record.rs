use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::enums::{
    Frame,
    Strand,
};
use crate::data_structs::typedef::{
    PosType,
    SeqStr,
};
use crate::with_field_fn;

/// One validated annotation line, as handed over by a record reader.
///
/// Coordinates are 1-based inclusive. The type is kept as the raw string
/// here; the ingester is the component that rejects unknown vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub feature_type: String,
    pub id:           Option<String>,
    pub parent_ids:   Vec<String>,
    pub seqid:        SeqStr,
    pub start:        PosType,
    pub end:          PosType,
    pub strand:       Strand,
    pub score:        Option<f64>,
    pub frame:        Frame,
    pub source:       SeqStr,
}

impl AnnotationRecord {
    pub fn new<T, S>(
        feature_type: T,
        seqid: S,
        start: PosType,
        end: PosType,
        strand: Strand,
    ) -> Self
    where
        T: Into<String>,
        S: Into<SeqStr>, {
        AnnotationRecord {
            feature_type: feature_type.into(),
            id: None,
            parent_ids: Vec::new(),
            seqid: seqid.into(),
            start,
            end,
            strand,
            score: None,
            frame: Frame::Missing,
            source: SeqStr::default(),
        }
    }

    pub fn with_id<S: Into<String>>(
        mut self,
        id: S,
    ) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_parent<S: Into<String>>(
        mut self,
        parent: S,
    ) -> Self {
        self.parent_ids.push(parent.into());
        self
    }

    with_field_fn!(parent_ids, Vec<String>);

    with_field_fn!(score, Option<f64>);

    with_field_fn!(frame, Frame);

    pub fn with_source<S: Into<SeqStr>>(
        mut self,
        source: S,
    ) -> Self {
        self.source = source.into();
        self
    }
}
