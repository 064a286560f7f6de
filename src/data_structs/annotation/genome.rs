use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::Context;
use hashbrown::HashMap;
use log::{
    debug,
    warn,
};
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::annotation::ids::IdAllocator;
use crate::data_structs::annotation::locus::SuperLocus;
use crate::data_structs::annotation::meta::{
    GenomeMeta,
    SequenceMeta,
};
use crate::data_structs::annotation::record::AnnotationRecord;
use crate::data_structs::enums::{
    FeatureCategory,
    FeatureType,
};
use crate::data_structs::typedef::SeqStr;
use crate::error::{
    AnnotError,
    Result,
};
use crate::getter_fn;
use crate::interpreter::InterpreterConfig;
use crate::utils::THREAD_POOL;

/// The whole annotation set for one assembly: provenance, sequence
/// lengths and the gene-like loci, together with the id allocators that
/// keep every minted transcript/feature id unique across the run.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnnotatedGenome {
    meta:       GenomeMeta,
    sequences:  HashMap<SeqStr, SequenceMeta>,
    super_loci: Vec<SuperLocus>,
    #[serde(skip, default = "IdAllocator::transcripts")]
    transcript_ider: IdAllocator,
    #[serde(skip, default = "IdAllocator::features")]
    feature_ider: IdAllocator,
}

impl AnnotatedGenome {
    pub fn new(meta: GenomeMeta) -> Self {
        AnnotatedGenome {
            meta,
            sequences: HashMap::new(),
            super_loci: Vec::new(),
            transcript_ider: IdAllocator::transcripts(),
            feature_ider: IdAllocator::features(),
        }
    }

    getter_fn!(meta, GenomeMeta);

    getter_fn!(sequences, HashMap<SeqStr, SequenceMeta>);

    getter_fn!(super_loci, Vec<SuperLocus>);

    pub fn add_sequences<I>(
        &mut self,
        sequences: I,
    ) where
        I: IntoIterator<Item = SequenceMeta>, {
        for sequence in sequences {
            self.sequences
                .insert(sequence.seqid.clone(), sequence);
        }
    }

    /// Ingests an ordered record stream, one [`SuperLocus`] per
    /// gene-level record and its trailing children.
    ///
    /// An unknown feature type aborts the whole run. A locus whose
    /// records cannot be wired together is dropped and reported in the
    /// returned `(locus id, error)` list, and ingestion continues with
    /// the next gene.
    pub fn add_records<I>(
        &mut self,
        records: I,
    ) -> Result<Vec<(String, AnnotError)>>
    where
        I: IntoIterator<Item = AnnotationRecord>, {
        let mut failures = Vec::new();
        let mut group: Option<(SuperLocus, AnnotationRecord)> = None;
        let mut group_failed = false;

        for record in records {
            let feature_type = FeatureType::from_str(&record.feature_type)?;
            if feature_type.is_skippable() {
                debug!(
                    "skipping {} record at {}:{}-{}",
                    feature_type, record.seqid, record.start, record.end
                );
                continue;
            }

            if feature_type.category() == FeatureCategory::GeneLevel {
                self.close_group(group.take(), group_failed);
                let mut locus = SuperLocus::new();
                // gene-level routing itself cannot fail
                group_failed = locus
                    .add_record(
                        &record,
                        feature_type,
                        &mut self.transcript_ider,
                        &mut self.feature_ider,
                    )
                    .is_err();
                self.meta.number_genes += 1;
                group = Some((locus, record));
                continue;
            }

            match group.as_mut() {
                None => {
                    warn!(
                        "{} record at {}:{}-{} precedes any gene, dropping",
                        feature_type, record.seqid, record.start, record.end
                    );
                },
                Some(_) if group_failed => {
                    debug!(
                        "draining {} record of an already failed locus",
                        feature_type
                    );
                },
                Some((locus, _)) => {
                    if let Err(e) = locus.add_record(
                        &record,
                        feature_type,
                        &mut self.transcript_ider,
                        &mut self.feature_ider,
                    ) {
                        warn!("dropping locus {}: {}", locus.id, e);
                        failures.push((locus.id.clone(), e));
                        group_failed = true;
                    }
                },
            }
        }
        self.close_group(group.take(), group_failed);
        Ok(failures)
    }

    fn close_group(
        &mut self,
        group: Option<(SuperLocus, AnnotationRecord)>,
        group_failed: bool,
    ) {
        if let Some((mut locus, first_record)) = group {
            if !group_failed {
                locus.normalize(&first_record, &mut self.feature_ider);
                self.super_loci.push(locus);
            }
        }
    }

    /// Reads a GFF3 file and ingests every record.
    pub fn add_gff<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> anyhow::Result<Vec<(String, AnnotError)>> {
        let records = crate::io::gff::read_annotation_records(path.as_ref())
            .with_context(|| {
                format!("reading gff from {}", path.as_ref().display())
            })?;
        self.add_records(records).map_err(Into::into)
    }

    /// Decodes every transcript of every locus into explicit features,
    /// in parallel over loci.
    ///
    /// Loci that fail interpretation keep their raw features and are
    /// reported as `(locus id, error)` pairs.
    pub fn make_all_explicit(
        &mut self,
        config: &InterpreterConfig,
    ) -> Vec<(String, AnnotError)> {
        let feature_ider =
            Mutex::new(std::mem::take(&mut self.feature_ider));
        let sequences = &self.sequences;
        let super_loci = &mut self.super_loci;

        let failures = THREAD_POOL.install(|| {
            super_loci
                .par_iter_mut()
                .filter_map(|locus| {
                    locus
                        .make_explicit(sequences, &feature_ider, config)
                        .err()
                        .map(|e| {
                            warn!(
                                "interpretation failed for locus {}: {}",
                                locus.id, e
                            );
                            (locus.id.clone(), e)
                        })
                })
                .collect::<Vec<_>>()
        });

        self.feature_ider = feature_ider
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        failures
    }

    /// Restores back-references and allocator state after import.
    pub fn relink(&mut self) {
        let AnnotatedGenome {
            super_loci,
            transcript_ider,
            feature_ider,
            ..
        } = self;
        for locus in super_loci.iter_mut() {
            locus.relink();
        }
        transcript_ider.reseed(
            super_loci
                .iter()
                .flat_map(|locus| locus.transcripts().keys().cloned()),
        );
        feature_ider.reseed(
            super_loci
                .iter()
                .flat_map(|locus| locus.features().keys().cloned()),
        );
    }
}
