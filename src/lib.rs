//! # annotex
//!
//! `annotex` is a Rust library for turning partial, implicit GFF3-style
//! gene annotations into fully explicit ones. Public annotation files
//! usually record gene structure as spans (exons, coding sequence, UTRs)
//! and leave the interesting coordinates implicit: transcription start
//! and termination sites, start and stop codons, splice donors and
//! acceptors. `annotex` ingests such files into a navigable entity graph,
//! repairs what can be repaired, and decodes every transcript into the
//! explicit features a downstream consumer can rely on.
//!
//! The crate provides core data structures to represent genomes, gene
//! loci, transcripts and features, readers for GFF3 and FASTA indexes,
//! and a per-transcript status machine that synthesizes the implicit
//! coordinates or reports precisely why a transcript cannot be decoded.
//!
//! ## Key Features
//!
//! * **Entity graph**: genes are grouped into [`SuperLocus`] arenas
//!   holding id-keyed [`Transcript`]s and [`Feature`]s with many-to-many
//!   links, ready for traversal in either direction.
//! * **Tolerant ingestion**: records with missing or unresolvable
//!   parents degrade into error-typed features instead of aborting the
//!   run; only unknown vocabulary is fatal.
//! * **Normalization**: identical features shared by several transcripts
//!   are collapsed, and exons missing around coding features are
//!   reconstructed before interpretation.
//! * **Explicit decoding**: a status machine walks each transcript 5′ to
//!   3′ and synthesizes TSS/TTS, start/stop codons and splice sites, or
//!   fails that one locus with a typed [`AnnotError`].
//! * **Truncation masking**: transcripts truncated at either end get
//!   error masks over the uncertain flanking region, clamped to the
//!   sequence bounds from a FASTA index.
//! * **Parallel decoding**: loci are interpreted in parallel with Rayon;
//!   the pool size follows the `ANNOTEX_NUM_THREADS` environment
//!   variable.
//! * **Serialization**: the whole genome graph round-trips through JSON,
//!   with links and id allocators rebuilt on import.
//!
//! ## Structure
//!
//! The crate is organized into several modules:
//!
//! * [`data_structs`]: the fundamental data types - the annotation
//!   entity graph ([`AnnotatedGenome`], [`SuperLocus`], [`Transcript`],
//!   [`Feature`]), the shared enums ([`FeatureType`], [`Strand`],
//!   [`Frame`]) and the interval partitioning primitives.
//! * [`interpreter`]: the per-transcript status machine that makes
//!   implicit coordinates explicit.
//! * [`io`]: GFF3 and FASTA-index readers plus JSON export/import.
//! * [`error`]: the [`AnnotError`] taxonomy.
//! * [`utils`]: the worker pool and small shared macros.
//!
//! ## Usage
//!
//! ### Making an annotation explicit
//!
//! ```no_run
//! use std::fs::File;
//!
//! use annotex::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut genome = AnnotatedGenome::new(
//!         GenomeMeta::default().with_species("A. thaliana".to_string()),
//!     );
//!     genome
//!         .add_sequences(annotex::io::read_sequence_catalog("genome.fa.fai", true)?);
//!
//!     // loci with malformed groups are dropped and reported, not fatal
//!     for (locus_id, error) in genome.add_gff("annotation.gff3")? {
//!         eprintln!("dropped {locus_id}: {error}");
//!     }
//!
//!     let failures = genome.make_all_explicit(&InterpreterConfig::default());
//!     eprintln!("{} loci could not be decoded", failures.len());
//!
//!     annotex::io::json::to_json_writer(&genome, File::create("explicit.json")?)?;
//!     Ok(())
//! }
//! ```
//!
//! ### Loading an exported genome
//!
//! ```no_run
//! use std::fs::File;
//!
//! use annotex::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let genome =
//!         annotex::io::json::from_json_reader(File::open("explicit.json")?)?;
//!     for locus in genome.super_loci() {
//!         println!(
//!             "{}: {} transcripts, {} features",
//!             locus.id,
//!             locus.transcripts().len(),
//!             locus.features().len()
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`AnnotError`]: crate::error::AnnotError

pub mod data_structs;
pub mod error;
pub mod interpreter;
pub mod io;
pub mod prelude;
pub mod utils;

#[allow(unused_imports)]
use prelude::*;
