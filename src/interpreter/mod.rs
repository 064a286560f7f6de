//! Decoding of implicit transcript structure into explicit features.
//!
//! A raw annotation describes a transcript as overlapping exon/CDS/UTR
//! spans. The [`TranscriptInterpreter`] walks those spans 5'->3' as a
//! sequence of boundary-aligned interval clusters and synthesizes what
//! the spans only imply: transcription start and termination sites,
//! start and stop codons, donor/acceptor splice sites, and status
//! points marking where a transcript is truncated inside coding
//! sequence. Truncations also get an `error` span covering the region
//! of uncertain gene structure next to them.

use std::sync::Mutex;

use hashbrown::HashMap;
use itertools::Itertools;
use rust_lapper::Lapper;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::annotation::{
    Feature,
    IdAllocator,
    SequenceMeta,
    SuperLocus,
    Transcript,
};
use crate::data_structs::coords::{
    clusters,
    split_intervals,
    PosInterval,
};
use crate::data_structs::typedef::{
    PosType,
    SeqStr,
};
use crate::data_structs::{
    FeatureType,
    Frame,
};
use crate::error::{
    AnnotError,
    Result,
};
use crate::with_field_fn;

/// Width in bp of the uncertainty region marked `error` beside a
/// transcript that is truncated inside coding sequence.
pub const DEFAULT_ERROR_BUFFER: PosType = 2000;

/// Tunables for transcript interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    pub error_buffer: PosType,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            error_buffer: DEFAULT_ERROR_BUFFER,
        }
    }
}

impl InterpreterConfig {
    pub fn new() -> Self {
        InterpreterConfig::default()
    }

    with_field_fn!(error_buffer, PosType);
}

/// The transcript status holding after `last_emitted`, together with
/// the status to restore once the next intron closes.
///
/// Statuses are the `Status*` members of [`FeatureType`]; any
/// non-status, non-point feature type has no entry in the table.
pub fn status_after(
    last_emitted: FeatureType,
    pre_intron: FeatureType,
) -> Result<(FeatureType, FeatureType)> {
    use FeatureType::*;
    match last_emitted {
        t if t.is_status() => Ok((t, pre_intron)),
        Tss => Ok((StatusFivePrimeUtr, StatusFivePrimeUtr)),
        StartCodon => Ok((StatusCoding, StatusCoding)),
        StopCodon => Ok((StatusThreePrimeUtr, StatusThreePrimeUtr)),
        Tts => Ok((StatusIntergenic, StatusIntergenic)),
        DonorSpliceSite => Ok((StatusIntron, pre_intron)),
        AcceptorSpliceSite => Ok((pre_intron, pre_intron)),
        other => {
            Err(AnnotError::UnknownTransition {
                found: other.to_string(),
            })
        },
    }
}

/// Walks one transcript's features and synthesizes the explicit ones.
///
/// One instance serves one walk; [`decode_raw_features`] returns the
/// synthesized features in 5'->3' emission order and the caller absorbs
/// them into the owning locus.
///
/// [`decode_raw_features`]: TranscriptInterpreter::decode_raw_features
pub struct TranscriptInterpreter<'a> {
    locus:          &'a SuperLocus,
    transcript:     &'a Transcript,
    sequences:      &'a HashMap<SeqStr, SequenceMeta>,
    feature_ider:   &'a Mutex<IdAllocator>,
    config:         &'a InterpreterConfig,
    status:         FeatureType,
    pre_intron:     FeatureType,
    clean_features: Vec<Feature>,
}

impl<'a> TranscriptInterpreter<'a> {
    pub fn new(
        locus: &'a SuperLocus,
        transcript: &'a Transcript,
        sequences: &'a HashMap<SeqStr, SequenceMeta>,
        feature_ider: &'a Mutex<IdAllocator>,
        config: &'a InterpreterConfig,
    ) -> Self {
        TranscriptInterpreter {
            locus,
            transcript,
            sequences,
            feature_ider,
            config,
            status: FeatureType::StatusIntergenic,
            pre_intron: FeatureType::StatusIntergenic,
            clean_features: Vec::new(),
        }
    }

    /// Decodes the whole transcript: first cluster, every adjacent
    /// cluster pair, last cluster.
    pub fn decode_raw_features(&mut self) -> Result<Vec<Feature>> {
        let plus_strand = self.is_plus_strand()?;
        let lapper = self.partition()?;
        let mut ordered = clusters(&lapper).collect_vec();
        if !plus_strand {
            ordered.reverse();
        }

        let first = match ordered.first() {
            Some(cluster) => cluster,
            None => {
                return Err(AnnotError::EmptyTranscript {
                    id: self.transcript.id.clone(),
                });
            },
        };
        self.interpret_first_pos(first)?;
        for pair in ordered.windows(2) {
            self.interpret_transition(&pair[0], &pair[1])?;
        }
        if let Some(last) = ordered.last() {
            self.interpret_last_pos(last)?;
        }
        Ok(std::mem::take(&mut self.clean_features))
    }

    /// Splits the transcript's feature spans into boundary-aligned
    /// intervals keyed by feature id.
    fn partition(&self) -> Result<Lapper<PosType, String>> {
        if self.transcript.feature_ids().is_empty() {
            return Err(AnnotError::EmptyTranscript {
                id: self.transcript.id.clone(),
            });
        }
        let mut spans = Vec::with_capacity(self.transcript.feature_ids().len());
        for feature_id in self.transcript.feature_ids() {
            let feature = self.locus.feature(feature_id)?;
            spans.push((
                feature.id.clone(),
                feature.interval_start(),
                feature.interval_stop(),
            ));
        }
        Ok(split_intervals(spans))
    }

    fn is_plus_strand(&self) -> Result<bool> {
        let mut plus = None;
        for feature_id in self.transcript.feature_ids() {
            let feature_plus =
                self.locus.feature(feature_id)?.is_plus_strand()?;
            match plus {
                None => plus = Some(feature_plus),
                // mixed strands cannot be walked in one direction
                Some(seen) if seen != feature_plus => {
                    return Err(AnnotError::MissingStrand {
                        id: self.transcript.id.clone(),
                    });
                },
                Some(_) => {},
            }
        }
        plus.ok_or_else(|| {
            AnnotError::EmptyTranscript {
                id: self.transcript.id.clone(),
            }
        })
    }

    /// Semantic candidates for one cluster, from the observed feature
    /// types. A cluster must hold one or two intervals.
    fn possible_types(
        &self,
        cluster: &[&PosInterval],
    ) -> Result<Vec<FeatureType>> {
        use FeatureType::*;
        if cluster.is_empty() || cluster.len() > 2 {
            return Err(self.unresolved_cluster(cluster));
        }
        let (mut exon, mut five, mut cds, mut three) =
            (false, false, false, false);
        for &interval in cluster {
            match self.feature(interval)?.feature_type {
                Exon => exon = true,
                FivePrimeUtr => five = true,
                Cds => cds = true,
                ThreePrimeUtr => three = true,
                _ => return Err(self.unresolved_cluster(cluster)),
            }
        }
        match (exon, five, cds, three) {
            (_, true, false, false) => Ok(vec![FivePrimeUtr]),
            (_, false, true, false) => Ok(vec![Cds]),
            (_, false, false, true) => Ok(vec![ThreePrimeUtr]),
            // a bare exon is resolved by position, not type
            (true, false, false, false) => {
                Ok(vec![FivePrimeUtr, ThreePrimeUtr])
            },
            _ => Err(self.unresolved_cluster(cluster)),
        }
    }

    /// Opens the walk: transcription start, or a truncated coding
    /// start with its upstream uncertainty region.
    fn interpret_first_pos(
        &mut self,
        cluster: &[&PosInterval],
    ) -> Result<()> {
        let types = self.possible_types(cluster)?;
        if types.contains(&FeatureType::FivePrimeUtr) {
            let template = self.feature(cluster[0])?;
            let at = template.upstream_from_interval(cluster[0])?;
            let mut tss = self.new_feature(template, FeatureType::Tss);
            tss.set_point(at);
            self.clean_features.push(tss);
        }
        else if types.contains(&FeatureType::Cds) {
            let interval = self.interval_of_type(cluster, FeatureType::Cds)?;
            let template = self.feature(interval)?;
            let at = template.upstream_from_interval(interval)?;
            self.synthesize_upstream_buffer(template, at)?;
            let mut point =
                self.new_feature(template, FeatureType::StatusCoding);
            point.set_point(at);
            self.clean_features.push(point);
            // a truncated start opens coding state for later introns
            self.pre_intron = FeatureType::StatusCoding;
        }
        else {
            return Err(AnnotError::InvalidTranscriptStart {
                observed: types.iter().map(ToString::to_string).collect(),
            });
        }
        Ok(())
    }

    /// Closes the walk: transcription termination, or a truncated
    /// coding end with its downstream uncertainty region.
    fn interpret_last_pos(
        &mut self,
        cluster: &[&PosInterval],
    ) -> Result<()> {
        let types = self.possible_types(cluster)?;
        if types.contains(&FeatureType::ThreePrimeUtr) {
            let template = self.feature(cluster[0])?;
            let at = template.downstream_from_interval(cluster[0])?;
            let mut tts = self.new_feature(template, FeatureType::Tts);
            tts.set_point(at);
            self.clean_features.push(tts);
        }
        else if types.contains(&FeatureType::Cds) {
            let interval = self.interval_of_type(cluster, FeatureType::Cds)?;
            let template = self.feature(interval)?;
            let at = template.downstream_from_interval(interval)?;
            let mut point =
                self.new_feature(template, FeatureType::StatusCoding);
            point.set_point(at);
            self.clean_features.push(point);
            self.synthesize_downstream_buffer(template, at)?;
        }
        else {
            return Err(AnnotError::InvalidTranscriptEnd {
                observed: types.iter().map(ToString::to_string).collect(),
            });
        }
        Ok(())
    }

    /// Resolves one adjacent cluster pair under the status that holds
    /// after the last emitted feature.
    fn interpret_transition(
        &mut self,
        before: &[&PosInterval],
        after: &[&PosInterval],
    ) -> Result<()> {
        use FeatureType::*;
        if let Some(last) = self.clean_features.last() {
            let (status, pre_intron) =
                status_after(last.feature_type, self.pre_intron)?;
            self.status = status;
            self.pre_intron = pre_intron;
        }
        let before_types = self.possible_types(before)?;
        let after_types = self.possible_types(after)?;
        match self.status {
            StatusFivePrimeUtr => {
                if before_types.contains(&FivePrimeUtr)
                    && after_types.contains(&Cds)
                {
                    self.interpret_start_codon(before, after)
                }
                else if before_types.contains(&FivePrimeUtr)
                    && after_types.contains(&FivePrimeUtr)
                {
                    self.interpret_intron(before, after)
                }
                else {
                    Err(self
                        .unexpected_transition(&before_types, &after_types))
                }
            },
            StatusCoding => {
                if before_types.contains(&Cds) && after_types.contains(&Cds)
                {
                    self.interpret_intron(before, after)
                }
                else if before_types.contains(&Cds)
                    && after_types.contains(&ThreePrimeUtr)
                {
                    self.interpret_stop_codon(before, after)
                }
                else {
                    Err(self
                        .unexpected_transition(&before_types, &after_types))
                }
            },
            StatusThreePrimeUtr => {
                if before_types.contains(&ThreePrimeUtr)
                    && after_types.contains(&ThreePrimeUtr)
                {
                    self.interpret_intron(before, after)
                }
                else {
                    Err(self
                        .unexpected_transition(&before_types, &after_types))
                }
            },
            _ => {
                Err(self.unexpected_transition(&before_types, &after_types))
            },
        }
    }

    /// Translation opens at the first CDS base: the 5' UTR must touch
    /// the CDS and the CDS must carry the first-codon frame.
    fn interpret_start_codon(
        &mut self,
        before: &[&PosInterval],
        after: &[&PosInterval],
    ) -> Result<()> {
        let cds_interval = self.interval_of_type(after, FeatureType::Cds)?;
        let template = self.feature(cds_interval)?;
        let at = template.upstream_from_interval(cds_interval)?;

        let upstream_feature = self.feature(before[0])?;
        let upstream_end =
            upstream_feature.downstream_from_interval(before[0])?;
        let sign = self.sign(template)?;
        if upstream_end as i64 + sign != at as i64 {
            return Err(AnnotError::Gap {
                upstream:   upstream_end,
                downstream: at,
            });
        }
        if template.frame != Frame::Zero {
            return Err(AnnotError::Frame {
                found: template.frame,
            });
        }

        let mut start_codon =
            self.new_feature(template, FeatureType::StartCodon);
        start_codon.set_point(at);
        self.clean_features.push(start_codon);
        Ok(())
    }

    /// Translation closes at the last CDS base before the 3' UTR.
    fn interpret_stop_codon(
        &mut self,
        before: &[&PosInterval],
        after: &[&PosInterval],
    ) -> Result<()> {
        let cds_interval = self.interval_of_type(before, FeatureType::Cds)?;
        let template = self.feature(cds_interval)?;
        let at = template.downstream_from_interval(cds_interval)?;

        let downstream_feature = self.feature(after[0])?;
        let downstream_start =
            downstream_feature.upstream_from_interval(after[0])?;
        let sign = self.sign(template)?;
        if at as i64 + sign != downstream_start as i64 {
            return Err(AnnotError::Gap {
                upstream:   at,
                downstream: downstream_start,
            });
        }

        let mut stop_codon =
            self.new_feature(template, FeatureType::StopCodon);
        stop_codon.set_point(at);
        self.clean_features.push(stop_codon);
        Ok(())
    }

    /// An intron between two pieces of the same region: donor one base
    /// past the upstream piece, acceptor one base before the downstream
    /// piece.
    fn interpret_intron(
        &mut self,
        before: &[&PosInterval],
        after: &[&PosInterval],
    ) -> Result<()> {
        let donor_template = self.feature(before[0])?;
        let acceptor_template = self.feature(after[0])?;
        let donor_flank =
            donor_template.downstream_from_interval(before[0])?;
        let acceptor_flank =
            acceptor_template.upstream_from_interval(after[0])?;

        let sign = self.sign(donor_template)?;
        if acceptor_flank as i64 * sign - donor_flank as i64 * sign <= 1 {
            return Err(AnnotError::Adjacency {
                upstream:   donor_flank,
                downstream: acceptor_flank,
            });
        }

        let mut donor =
            self.new_feature(donor_template, FeatureType::DonorSpliceSite);
        donor.set_point((donor_flank as i64 + sign) as PosType);
        let mut acceptor = self
            .new_feature(acceptor_template, FeatureType::AcceptorSpliceSite);
        acceptor.set_point((acceptor_flank as i64 - sign) as PosType);
        self.clean_features.push(donor);
        self.clean_features.push(acceptor);
        Ok(())
    }

    /// Marks the region transcript-upstream of `at` as uncertain,
    /// unless `at` sits on the sequence boundary.
    fn synthesize_upstream_buffer(
        &mut self,
        template: &Feature,
        at: PosType,
    ) -> Result<()> {
        let buffer = self.config.error_buffer;
        if template.is_plus_strand()? {
            if at > 1 {
                self.push_error_span(
                    template,
                    at.saturating_sub(buffer).max(1),
                    at - 1,
                );
            }
        }
        else {
            let total_bp = self.sequence_length(template)?;
            if at < total_bp {
                self.push_error_span(
                    template,
                    at + 1,
                    at.saturating_add(buffer).min(total_bp),
                );
            }
        }
        Ok(())
    }

    /// Marks the region transcript-downstream of `at` as uncertain,
    /// unless `at` sits on the sequence boundary.
    fn synthesize_downstream_buffer(
        &mut self,
        template: &Feature,
        at: PosType,
    ) -> Result<()> {
        let buffer = self.config.error_buffer;
        if template.is_plus_strand()? {
            let total_bp = self.sequence_length(template)?;
            if at < total_bp {
                self.push_error_span(
                    template,
                    at + 1,
                    at.saturating_add(buffer).min(total_bp),
                );
            }
        }
        else if at > 1 {
            self.push_error_span(
                template,
                at.saturating_sub(buffer).max(1),
                at - 1,
            );
        }
        Ok(())
    }

    fn push_error_span(
        &mut self,
        template: &Feature,
        start: PosType,
        end: PosType,
    ) {
        let mut error = self.new_feature(template, FeatureType::Error);
        error.set_span(start, end);
        error.frame = Frame::Missing;
        self.clean_features.push(error);
    }

    /// Clones `template` under a freshly minted id and the given type.
    fn new_feature(
        &self,
        template: &Feature,
        feature_type: FeatureType,
    ) -> Feature {
        let id = self
            .feature_ider
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .allocate(None);
        let mut feature = template.derived(id, true);
        feature.feature_type = feature_type;
        feature
    }

    fn feature(
        &self,
        interval: &PosInterval,
    ) -> Result<&'a Feature> {
        self.locus.feature(&interval.val)
    }

    fn interval_of_type<'c>(
        &self,
        cluster: &[&'c PosInterval],
        feature_type: FeatureType,
    ) -> Result<&'c PosInterval> {
        for &interval in cluster {
            if self.feature(interval)?.feature_type == feature_type {
                return Ok(interval);
            }
        }
        Err(AnnotError::MissingFeature {
            id: feature_type.to_string(),
        })
    }

    fn sequence_length(
        &self,
        feature: &Feature,
    ) -> Result<PosType> {
        self.sequences
            .get(&feature.seqid)
            .map(|sequence| sequence.total_bp)
            .ok_or_else(|| {
                AnnotError::UnknownSequence {
                    seqid: feature.seqid.to_string(),
                }
            })
    }

    fn sign(
        &self,
        feature: &Feature,
    ) -> Result<i64> {
        Ok(if feature.is_plus_strand()? { 1 } else { -1 })
    }

    fn unresolved_cluster(
        &self,
        cluster: &[&PosInterval],
    ) -> AnnotError {
        let observed = cluster
            .iter()
            .map(|interval| {
                self.locus
                    .feature(&interval.val)
                    .map(|f| f.feature_type.to_string())
                    .unwrap_or_else(|_| interval.val.clone())
            })
            .unique()
            .collect();
        AnnotError::UnresolvedClusterType {
            observed,
            n_intervals: cluster.len(),
        }
    }

    fn unexpected_transition(
        &self,
        before_types: &[FeatureType],
        after_types: &[FeatureType],
    ) -> AnnotError {
        AnnotError::UnexpectedTransition {
            status: self.status.to_string(),
            before: before_types.iter().map(ToString::to_string).collect(),
            after:  after_types.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests;
