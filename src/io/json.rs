//! JSON export and import of a whole [`AnnotatedGenome`].
//!
//! The export leaves back-references out of the payload; the import
//! rebuilds them and reseeds the id allocators, so a loaded genome can
//! keep ingesting records without id collisions.

use std::io::{
    Read,
    Write,
};

use anyhow::Context;

use crate::data_structs::annotation::AnnotatedGenome;

pub fn to_json_writer<W: Write>(
    genome: &AnnotatedGenome,
    writer: W,
) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, genome)
        .context("serializing genome to json")
}

pub fn from_json_reader<R: Read>(reader: R) -> anyhow::Result<AnnotatedGenome> {
    let mut genome: AnnotatedGenome = serde_json::from_reader(reader)
        .context("deserializing genome from json")?;
    genome.relink();
    Ok(genome)
}
