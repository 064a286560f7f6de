//! Reading GFF3 files into [`AnnotationRecord`]s.

use std::path::Path;

use anyhow::Context;
use bio::io::gff::{
    GffType,
    Reader,
};

use crate::data_structs::annotation::AnnotationRecord;
use crate::data_structs::typedef::PosType;
use crate::data_structs::{
    Frame,
    Strand,
};

/// Reads every record of a GFF3 file, in file order.
///
/// Comment and directive lines are handled by the underlying reader; the
/// feature-type vocabulary is validated later, by the ingester.
pub fn read_annotation_records<P: AsRef<Path>>(
    path: P
) -> anyhow::Result<Vec<AnnotationRecord>> {
    let mut reader = Reader::from_file(path.as_ref(), GffType::GFF3)?;
    let mut records = Vec::new();
    for parsed in reader.records() {
        let record = parsed.with_context(|| {
            format!("malformed record in {}", path.as_ref().display())
        })?;
        records.push(AnnotationRecord::from(&record));
    }
    Ok(records)
}

impl From<&bio::io::gff::Record> for AnnotationRecord {
    fn from(record: &bio::io::gff::Record) -> Self {
        // a single Parent attribute may carry several comma-joined ids
        let parent_ids = record
            .attributes()
            .get_vec("Parent")
            .map(|parents| {
                parents
                    .iter()
                    .flat_map(|joined| joined.split(','))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        // bio models the phase column as an Option<u8>, "." being None
        let phase: Option<u8> =
            record.phase().clone().try_into().unwrap_or_default();
        AnnotationRecord {
            feature_type: record.feature_type().to_string(),
            id: record.attributes().get("ID").cloned(),
            parent_ids,
            seqid: record.seqname().into(),
            start: *record.start() as PosType,
            end: *record.end() as PosType,
            strand: Strand::from(record.strand()),
            score: record.score().map(|score| score as f64),
            frame: match phase {
                Some(0) => Frame::Zero,
                Some(1) => Frame::One,
                Some(2) => Frame::Two,
                _ => Frame::Missing,
            },
            source: record.source().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_annotation_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "##gff-version 3").unwrap();
        writeln!(file, "chr1\ttest\tgene\t1\t500\t.\t+\t.\tID=g1").unwrap();
        writeln!(file, "chr1\ttest\tmRNA\t1\t500\t.\t+\t.\tID=t1;Parent=g1")
            .unwrap();
        writeln!(file, "chr1\ttest\texon\t1\t150\t.\t+\t.\tParent=t1,t2")
            .unwrap();
        writeln!(file, "chr1\ttest\tCDS\t101\t150\t900\t-\t2\tParent=t1")
            .unwrap();
        file.flush().unwrap();

        let records = read_annotation_records(file.path()).unwrap();
        assert_eq!(records.len(), 4);

        let gene = &records[0];
        assert_eq!(gene.feature_type, "gene");
        assert_eq!(gene.id.as_deref(), Some("g1"));
        assert!(gene.parent_ids.is_empty());
        assert_eq!((gene.start, gene.end), (1, 500));
        assert_eq!(gene.strand, Strand::Forward);
        assert_eq!(gene.frame, Frame::Missing);
        assert_eq!(gene.source.as_str(), "test");
        assert_eq!(gene.score, None);

        let mrna = &records[1];
        assert_eq!(mrna.parent_ids, vec!["g1".to_string()]);

        let exon = &records[2];
        assert!(exon.id.is_none());
        assert_eq!(exon.parent_ids, vec![
            "t1".to_string(),
            "t2".to_string(),
        ]);

        let cds = &records[3];
        assert_eq!(cds.strand, Strand::Reverse);
        assert_eq!(cds.frame, Frame::Two);
        assert_eq!(cds.score, Some(900.0));
    }

    #[test]
    fn test_unstranded_record_maps_to_no_strand() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "##gff-version 3").unwrap();
        writeln!(file, "chr1\ttest\tchromosome\t1\t9000\t.\t.\t.\tID=chr1")
            .unwrap();
        file.flush().unwrap();

        let records = read_annotation_records(file.path()).unwrap();
        assert_eq!(records[0].strand, Strand::None);
    }
}
