//! Readers and writers around the annotation graph.
//!
//! ## Key components
//!
//! - [`gff`] - adapts GFF3 lines into [`AnnotationRecord`]s.
//! - [`json`] - whole-genome JSON export and import.
//! - [`read_sequence_catalog`] - sequence lengths from a `.fai` index or
//!   a FASTA file.
//!
//! [`AnnotationRecord`]: crate::data_structs::annotation::AnnotationRecord

pub mod gff;
pub mod json;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use noodles::fasta::fai::io::Reader as FaiReader;
use noodles::fasta::fai::Record as FaiRecord;
use noodles::fasta::fs::index as index_fasta;

use crate::data_structs::annotation::SequenceMeta;
use crate::data_structs::typedef::PosType;

/// Loads the sequence catalog backing boundary clamping, either from an
/// existing `.fai` index or by indexing the FASTA itself.
pub fn read_sequence_catalog<P: AsRef<Path>>(
    path: P,
    is_index: bool,
) -> anyhow::Result<Vec<SequenceMeta>> {
    let index = if is_index {
        FaiReader::new(BufReader::new(File::open(path)?)).read_index()?
    }
    else {
        index_fasta(path)?
    };
    let records: Vec<FaiRecord> = index.into();
    Ok(records
        .into_iter()
        .map(|record| {
            SequenceMeta::new(
                String::from_utf8_lossy(record.name()).to_string(),
                record.length() as PosType,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_sequence_catalog_from_fai() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chr1\t5000\t6\t60\t61").unwrap();
        writeln!(file, "chr2\t1200\t5100\t60\t61").unwrap();
        file.flush().unwrap();

        let catalog = read_sequence_catalog(file.path(), true).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].seqid.as_str(), "chr1");
        assert_eq!(catalog[0].total_bp, 5000);
        assert_eq!(catalog[1].seqid.as_str(), "chr2");
        assert_eq!(catalog[1].total_bp, 1200);
    }

    #[test]
    fn test_read_sequence_catalog_indexes_fasta() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">chr1").unwrap();
        writeln!(file, "ACGTACGTAC").unwrap();
        file.flush().unwrap();

        let catalog = read_sequence_catalog(file.path(), false).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].seqid.as_str(), "chr1");
        assert_eq!(catalog[0].total_bp, 10);
    }
}
