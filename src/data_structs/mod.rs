//! This module contains the core data structures used throughout the
//! `annotex` crate for representing gene annotations as an explicit,
//! id-linked entity graph.
//!
//! Key components of this module include:
//!
//! - [`annotation`]: The entity graph itself — [`AnnotatedGenome`]
//!   holding [`SuperLocus`] arenas of [`Transcript`] and [`Feature`]
//!   entities, the [`AnnotationRecord`] input shape, the
//!   [`IdAllocator`] that mints unique entity ids, and the
//!   [`GenomeMeta`]/[`SequenceMeta`] provenance records.
//! - [`coords`]: Interval partitioning of transcript features into
//!   ordered, non-partially-overlapping clusters.
//! - Common enumerations used across the crate: [`Strand`], [`Frame`],
//!   and the feature taxonomy ([`FeatureType`], [`FeatureCategory`]).
//! - [`typedef`]: Type aliases for positions, sequence names and entity
//!   ids.
//!
//! [`AnnotatedGenome`]: annotation::AnnotatedGenome
//! [`SuperLocus`]: annotation::SuperLocus
//! [`Transcript`]: annotation::Transcript
//! [`Feature`]: annotation::Feature
//! [`AnnotationRecord`]: annotation::AnnotationRecord
//! [`IdAllocator`]: annotation::IdAllocator
//! [`GenomeMeta`]: annotation::GenomeMeta
//! [`SequenceMeta`]: annotation::SequenceMeta

pub mod annotation;
pub mod coords;
mod enums;
pub mod typedef;

pub use enums::{
    FeatureCategory,
    FeatureType,
    Frame,
    Strand,
};
