use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::annotation::record::AnnotationRecord;
use crate::data_structs::coords::PosInterval;
use crate::data_structs::enums::{
    FeatureType,
    Frame,
    Strand,
};
use crate::data_structs::typedef::{
    PosType,
    SeqStr,
};
use crate::error::{
    AnnotError,
    Result,
};

/// One annotated genomic span. Coordinates are 1-based inclusive.
///
/// Transcript links and the locus back-reference are non-owning ids,
/// maintained by the owning [`SuperLocus`] and rebuilt after import.
///
/// [`SuperLocus`]: crate::data_structs::annotation::SuperLocus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id:                  String,
    pub feature_type:        FeatureType,
    pub start:               PosType,
    pub end:                 PosType,
    pub seqid:               SeqStr,
    pub strand:              Strand,
    pub frame:               Frame,
    pub score:               Option<f64>,
    pub source:              SeqStr,
    pub is_partial:          bool,
    pub is_reconstructed:    bool,
    pub is_type_in_question: bool,
    #[serde(skip)]
    pub(crate) transcript_ids: Vec<String>,
    #[serde(skip)]
    pub(crate) locus_id: String,
}

impl Feature {
    pub fn from_record(
        record: &AnnotationRecord,
        feature_type: FeatureType,
        id: String,
    ) -> Self {
        Feature {
            id,
            feature_type,
            start: record.start,
            end: record.end,
            seqid: record.seqid.clone(),
            strand: record.strand,
            frame: record.frame,
            score: record.score,
            source: record.source.clone(),
            is_partial: false,
            is_reconstructed: false,
            is_type_in_question: false,
            transcript_ids: Vec::new(),
            locus_id: String::new(),
        }
    }

    pub fn transcript_ids(&self) -> &[String] {
        &self.transcript_ids
    }

    pub fn locus_id(&self) -> &str {
        &self.locus_id
    }

    pub fn set_span(
        &mut self,
        start: PosType,
        end: PosType,
    ) {
        self.start = start;
        self.end = end;
    }

    /// Collapses the span onto a single base.
    pub fn set_point(
        &mut self,
        at: PosType,
    ) {
        self.start = at;
        self.end = at;
    }

    /// 0-based begin of the half-open split interval for this span.
    pub fn interval_start(&self) -> PosType {
        self.start - 1
    }

    /// 0-based end of the half-open split interval for this span.
    pub fn interval_stop(&self) -> PosType {
        self.end
    }

    pub fn is_plus_strand(&self) -> Result<bool> {
        match self.strand {
            Strand::Forward => Ok(true),
            Strand::Reverse => Ok(false),
            Strand::None => {
                Err(AnnotError::MissingStrand {
                    id: self.id.clone(),
                })
            },
        }
    }

    /// 5'-most coordinate of the span in transcript direction.
    pub fn upstream(&self) -> Result<PosType> {
        if self.is_plus_strand()? {
            Ok(self.start)
        }
        else {
            Ok(self.end)
        }
    }

    /// 3'-most coordinate of the span in transcript direction.
    pub fn downstream(&self) -> Result<PosType> {
        if self.is_plus_strand()? {
            Ok(self.end)
        }
        else {
            Ok(self.start)
        }
    }

    /// 1-based 5'-most coordinate of a split interval, oriented by this
    /// feature's strand.
    pub fn upstream_from_interval(
        &self,
        interval: &PosInterval,
    ) -> Result<PosType> {
        if self.is_plus_strand()? {
            Ok(interval.start + 1)
        }
        else {
            Ok(interval.stop)
        }
    }

    /// 1-based 3'-most coordinate of a split interval, oriented by this
    /// feature's strand.
    pub fn downstream_from_interval(
        &self,
        interval: &PosInterval,
    ) -> Result<PosType> {
        if self.is_plus_strand()? {
            Ok(interval.stop)
        }
        else {
            Ok(interval.start + 1)
        }
    }

    /// Exact duplicate check used for deduplication: type, span, seqid,
    /// strand and frame all equal, within the same locus.
    pub fn fully_overlaps(
        &self,
        other: &Feature,
    ) -> bool {
        self.feature_type == other.feature_type
            && self.start == other.start
            && self.end == other.end
            && self.seqid == other.seqid
            && self.strand == other.strand
            && self.frame == other.frame
            && self.locus_id == other.locus_id
    }

    /// Spatial containment within the same locus: seqid and strand
    /// equal, frames compatible, coordinates within.
    pub fn is_contained_in(
        &self,
        other: &Feature,
    ) -> bool {
        self.seqid == other.seqid
            && self.strand == other.strand
            && self.frame.compatible_with(&other.frame)
            && self.locus_id == other.locus_id
            && self.start >= other.start
            && self.end <= other.end
    }

    /// Clones this feature as a template for a synthesized one: seqid,
    /// strand, frame, score, source and flags are copied, the id is the
    /// caller-minted fresh one, and transcript linkage is carried unless
    /// told otherwise. The caller overrides type and span.
    pub fn derived(
        &self,
        id: String,
        copy_transcripts: bool,
    ) -> Feature {
        let mut new = self.clone();
        new.id = id;
        if !copy_transcripts {
            new.transcript_ids.clear();
        }
        new
    }

    /// An exon exactly containing this feature, flagged as rebuilt.
    pub fn reconstruct_exon(
        &self,
        id: String,
    ) -> Feature {
        let mut exon = self.derived(id, true);
        exon.feature_type = FeatureType::Exon;
        exon.frame = Frame::Missing;
        exon.is_reconstructed = true;
        exon
    }
}
