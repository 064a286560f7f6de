use std::sync::Mutex;

use hashbrown::HashMap;
use itertools::Itertools;
use log::{
    debug,
    info,
    warn,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::annotation::feature::Feature;
use crate::data_structs::annotation::ids::IdAllocator;
use crate::data_structs::annotation::meta::SequenceMeta;
use crate::data_structs::annotation::record::AnnotationRecord;
use crate::data_structs::annotation::transcript::Transcript;
use crate::data_structs::enums::{
    FeatureCategory,
    FeatureType,
};
use crate::data_structs::typedef::SeqStr;
use crate::error::{
    AnnotError,
    Result,
};
use crate::interpreter::{
    InterpreterConfig,
    TranscriptInterpreter,
};

/// One gene-like unit: an arena of transcripts and features keyed by id.
///
/// Every owned entity's back-reference names this locus; all
/// cross-entity relationships are id lookups through these maps, never
/// owning pointers in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperLocus {
    pub id:                  String,
    pub locus_type:          Option<FeatureType>,
    /// All gene-level ids this locus was built from.
    pub ids:                 Vec<String>,
    pub is_partial:          bool,
    pub is_reconstructed:    bool,
    pub is_type_in_question: bool,
    transcripts:             HashMap<String, Transcript>,
    features:                HashMap<String, Feature>,
    #[serde(skip)]
    dummy_transcript_id: Option<String>,
}

impl Default for SuperLocus {
    fn default() -> Self {
        SuperLocus::new()
    }
}

impl SuperLocus {
    pub fn new() -> Self {
        SuperLocus {
            id: String::new(),
            locus_type: None,
            ids: Vec::new(),
            is_partial: false,
            is_reconstructed: false,
            is_type_in_question: false,
            transcripts: HashMap::new(),
            features: HashMap::new(),
            dummy_transcript_id: None,
        }
    }

    // ACCESSORS

    pub fn transcripts(&self) -> &HashMap<String, Transcript> {
        &self.transcripts
    }

    pub fn features(&self) -> &HashMap<String, Feature> {
        &self.features
    }

    pub fn transcript(
        &self,
        id: &str,
    ) -> Option<&Transcript> {
        self.transcripts.get(id)
    }

    pub fn feature(
        &self,
        id: &str,
    ) -> Result<&Feature> {
        self.features
            .get(id)
            .ok_or_else(|| AnnotError::MissingFeature { id: id.to_string() })
    }

    pub fn dummy_transcript_id(&self) -> Option<&str> {
        self.dummy_transcript_id.as_deref()
    }

    pub fn exons(&self) -> impl Iterator<Item = &Feature> {
        self.features
            .values()
            .filter(|f| f.feature_type == FeatureType::Exon)
    }

    pub fn coding_info_features(&self) -> impl Iterator<Item = &Feature> {
        self.features
            .values()
            .filter(|f| f.feature_type.category() == FeatureCategory::CodingInfo)
    }

    // INGESTION

    /// Routes one record of this locus's group into the entity graph.
    pub fn add_record(
        &mut self,
        record: &AnnotationRecord,
        feature_type: FeatureType,
        transcript_ider: &mut IdAllocator,
        feature_ider: &mut IdAllocator,
    ) -> Result<()> {
        match feature_type.category() {
            FeatureCategory::GeneLevel => {
                let gene_id = record.id.clone().unwrap_or_default();
                self.locus_type = Some(feature_type);
                self.id = gene_id.clone();
                self.ids.push(gene_id);
            },
            FeatureCategory::Transcribed => {
                let parent = self.one_parent(record)?;
                if parent != self.id {
                    return Err(AnnotError::ParentMismatch {
                        child:   record.id.clone().unwrap_or_default(),
                        locus:   self.id.clone(),
                        parents: record.parent_ids.clone(),
                    });
                }
                let id =
                    transcript_ider.allocate(record.id.as_deref());
                let mut transcript =
                    Transcript::new(id.clone(), Some(feature_type));
                transcript.locus_id = self.id.clone();
                self.transcripts.insert(id, transcript);
            },
            FeatureCategory::Region | FeatureCategory::Ignorable => {
                debug!(
                    "skipping {} record at {}:{}-{}",
                    feature_type, record.seqid, record.start, record.end
                );
            },
            _ => {
                self.add_feature_record(
                    record,
                    feature_type,
                    transcript_ider,
                    feature_ider,
                );
            },
        }
        Ok(())
    }

    fn one_parent<'a>(
        &self,
        record: &'a AnnotationRecord,
    ) -> Result<&'a str> {
        if record.parent_ids.len() == 1 {
            Ok(&record.parent_ids[0])
        }
        else {
            Err(AnnotError::ParentMismatch {
                child:   record.id.clone().unwrap_or_default(),
                locus:   self.id.clone(),
                parents: record.parent_ids.clone(),
            })
        }
    }

    fn add_feature_record(
        &mut self,
        record: &AnnotationRecord,
        feature_type: FeatureType,
        transcript_ider: &mut IdAllocator,
        feature_ider: &mut IdAllocator,
    ) {
        let suggested = record.id.as_deref();
        let id = feature_ider.allocate(suggested);
        let mut feature =
            Feature::from_record(record, feature_type, id.clone());
        feature.locus_id = self.id.clone();

        if record.parent_ids.is_empty() {
            feature.feature_type = FeatureType::Error;
            warn!(
                "{}:{:?}:{} - no parents listed",
                record.seqid, suggested, id
            );
            self.features.insert(id, feature);
            return;
        }

        self.features.insert(id.clone(), feature);
        for parent in record.parent_ids.iter() {
            if self.transcripts.contains_key(parent) {
                self.link_feature_to_transcript(&id, parent);
            }
            else if *parent == self.id {
                // parent is the gene itself, bridge with a dummy transcript
                let dummy = self.dummy_transcript(transcript_ider);
                info!(
                    "{}:{:?}:{} - parent gene instead of transcript, \
                     recreating",
                    record.seqid, suggested, id
                );
                self.link_feature_to_transcript(&id, &dummy);
            }
            else {
                if let Some(f) = self.features.get_mut(&id) {
                    f.feature_type = FeatureType::Error;
                }
                warn!(
                    "{}:{:?}:{} - parent \"{}\" not found at locus {}",
                    record.seqid, suggested, id, parent, self.id
                );
            }
        }
    }

    /// The cached placeholder transcript for gene-parented features,
    /// created on first use.
    pub fn dummy_transcript(
        &mut self,
        transcript_ider: &mut IdAllocator,
    ) -> String {
        if let Some(id) = self.dummy_transcript_id.clone() {
            return id;
        }
        let id = transcript_ider.allocate(None);
        let mut transcript = Transcript::new(id.clone(), None);
        transcript.locus_id = self.id.clone();
        self.transcripts.insert(id.clone(), transcript);
        self.dummy_transcript_id = Some(id.clone());
        id
    }

    // LINKAGE

    pub(crate) fn link_feature_to_transcript(
        &mut self,
        feature_id: &str,
        transcript_id: &str,
    ) {
        if let Some(transcript) = self.transcripts.get_mut(transcript_id) {
            transcript.link_feature(feature_id);
        }
        if let Some(feature) = self.features.get_mut(feature_id) {
            if !feature.transcript_ids.iter().any(|t| t == transcript_id) {
                feature
                    .transcript_ids
                    .push(transcript_id.to_string());
            }
        }
    }

    pub(crate) fn unlink_feature_from_transcript(
        &mut self,
        feature_id: &str,
        transcript_id: &str,
    ) {
        if let Some(transcript) = self.transcripts.get_mut(transcript_id) {
            transcript.remove_feature(feature_id);
        }
        if let Some(feature) = self.features.get_mut(feature_id) {
            if let Some(pos) = feature
                .transcript_ids
                .iter()
                .position(|t| t == transcript_id)
            {
                feature.transcript_ids.remove(pos);
            }
        }
    }

    /// Inserts a synthesized feature and back-links it from every
    /// transcript it lists.
    pub fn absorb_feature(
        &mut self,
        mut feature: Feature,
    ) {
        feature.locus_id = self.id.clone();
        for transcript_id in feature.transcript_ids.clone() {
            if let Some(transcript) = self.transcripts.get_mut(&transcript_id)
            {
                transcript.link_feature(&feature.id);
            }
        }
        self.features.insert(feature.id.clone(), feature);
    }

    // NORMALIZATION

    /// Brings the freshly ingested group into shape: an empty locus is
    /// marked erroneous, duplicates are collapsed and missing exons are
    /// rebuilt.
    pub fn normalize(
        &mut self,
        first_record: &AnnotationRecord,
        feature_ider: &mut IdAllocator,
    ) {
        let locus_id = self.id.clone();
        for transcript in self.transcripts.values_mut() {
            transcript.locus_id = locus_id.clone();
        }
        for feature in self.features.values_mut() {
            feature.locus_id = locus_id.clone();
        }

        if self.features.is_empty() {
            self.mark_erroneous(first_record, feature_ider);
            return;
        }
        self.collapse_identical_features();
        self.maybe_reconstruct_exons(feature_ider);
    }

    /// Represents a locus without usable features as one `error` span.
    fn mark_erroneous(
        &mut self,
        record: &AnnotationRecord,
        feature_ider: &mut IdAllocator,
    ) {
        let id = feature_ider.allocate(None);
        let mut feature =
            Feature::from_record(record, FeatureType::Error, id.clone());
        feature.locus_id = self.id.clone();
        warn!(
            "{}:{}-{}:{} by {}, no valid features found - marking erroneous",
            record.seqid, record.start, record.end, self.id, record.source
        );
        self.features.insert(id, feature);
    }

    /// Merges every feature that fully overlaps an earlier one into it.
    /// Idempotent: a second pass over a collapsed set changes nothing.
    pub fn collapse_identical_features(&mut self) {
        let mut i = 0;
        loop {
            // sorted snapshot so removal disturbs neither order nor loop
            let keys = self.features.keys().cloned().sorted().collect_vec();
            if keys.len() < 2 || i >= keys.len() - 1 {
                break;
            }
            let anchor = keys[i].clone();
            for other in keys[i + 1..].iter() {
                let overlaps = match (
                    self.features.get(&anchor),
                    self.features.get(other),
                ) {
                    (Some(a), Some(b)) => a.fully_overlaps(b),
                    _ => false,
                };
                if overlaps {
                    debug!(
                        "removing {} from {} as it overlaps {}",
                        other, self.id, anchor
                    );
                    self.merge_features(&anchor, other);
                }
            }
            i += 1;
        }
    }

    /// Moves every transcript link from `other` onto `into`, then drops
    /// `other` from the arena.
    fn merge_features(
        &mut self,
        into: &str,
        other: &str,
    ) {
        let transcript_ids = self
            .features
            .get(other)
            .map(|f| f.transcript_ids.clone())
            .unwrap_or_default();
        for transcript_id in transcript_ids {
            self.link_feature_to_transcript(into, &transcript_id);
            self.unlink_feature_from_transcript(other, &transcript_id);
        }
        self.features.remove(other);
    }

    /// Creates any exons necessary so that all CDS/UTR spans are
    /// contained within an exon.
    pub fn maybe_reconstruct_exons(
        &mut self,
        feature_ider: &mut IdAllocator,
    ) {
        let mut new_exons = Vec::new();
        {
            let exons = self.exons().collect_vec();
            for feature in self.coding_info_features() {
                if !exons.iter().any(|exon| feature.is_contained_in(exon)) {
                    new_exons.push(
                        feature.reconstruct_exon(feature_ider.allocate(None)),
                    );
                }
            }
        }
        for exon in new_exons {
            debug!(
                "reconstructed exon {} for locus {}",
                exon.id, self.id
            );
            self.absorb_feature(exon);
        }
    }

    // INTERPRETATION

    /// Walks every transcript 5'->3' and absorbs the synthesized
    /// explicit features. Any failure aborts the whole locus: nothing
    /// is absorbed unless every transcript decodes.
    pub fn make_explicit(
        &mut self,
        sequences: &HashMap<SeqStr, SequenceMeta>,
        feature_ider: &Mutex<IdAllocator>,
        config: &InterpreterConfig,
    ) -> Result<()> {
        let mut synthesized = Vec::new();
        for transcript_id in self.transcripts.keys().sorted() {
            let transcript = &self.transcripts[transcript_id];
            let mut interpreter = TranscriptInterpreter::new(
                self,
                transcript,
                sequences,
                feature_ider,
                config,
            );
            synthesized.extend(interpreter.decode_raw_features()?);
        }
        for feature in synthesized {
            self.absorb_feature(feature);
        }
        Ok(())
    }

    /// Restores the non-serialized side of the graph after import.
    pub(crate) fn relink(&mut self) {
        let locus_id = self.id.clone();
        for transcript in self.transcripts.values_mut() {
            transcript.locus_id = locus_id.clone();
        }
        for feature in self.features.values_mut() {
            feature.locus_id = locus_id.clone();
            feature.transcript_ids.clear();
        }
        let links = self
            .transcripts
            .iter()
            .flat_map(|(transcript_id, transcript)| {
                transcript
                    .feature_ids
                    .iter()
                    .map(move |f| (transcript_id.clone(), f.clone()))
            })
            .collect_vec();
        for (transcript_id, feature_id) in links {
            if let Some(feature) = self.features.get_mut(&feature_id) {
                feature.transcript_ids.push(transcript_id);
            }
        }
        // the dummy is the one transcript without a declared type
        self.dummy_transcript_id = self
            .transcripts
            .iter()
            .find(|(_, transcript)| transcript.transcript_type.is_none())
            .map(|(id, _)| id.clone());
    }
}
