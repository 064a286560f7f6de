use std::str::FromStr;
use std::sync::Mutex;

use rstest::{
    fixture,
    rstest,
};

use super::*;
use crate::data_structs::annotation::AnnotationRecord;
use crate::data_structs::Strand;

fn gene(
    id: &str,
    start: PosType,
    end: PosType,
    strand: Strand,
) -> AnnotationRecord {
    AnnotationRecord::new("gene", "chr1", start, end, strand).with_id(id)
}

fn mrna(
    id: &str,
    gene_id: &str,
    start: PosType,
    end: PosType,
    strand: Strand,
) -> AnnotationRecord {
    AnnotationRecord::new("mRNA", "chr1", start, end, strand)
        .with_id(id)
        .with_parent(gene_id)
}

fn child(
    feature_type: &str,
    transcript_id: &str,
    start: PosType,
    end: PosType,
    strand: Strand,
) -> AnnotationRecord {
    AnnotationRecord::new(feature_type, "chr1", start, end, strand)
        .with_parent(transcript_id)
}

fn build_locus(records: Vec<AnnotationRecord>) -> SuperLocus {
    let mut locus = SuperLocus::new();
    let mut transcript_ider = IdAllocator::transcripts();
    let mut feature_ider = IdAllocator::features();
    for record in records.iter() {
        let feature_type = FeatureType::from_str(&record.feature_type).unwrap();
        locus
            .add_record(record, feature_type, &mut transcript_ider, &mut feature_ider)
            .unwrap();
    }
    locus
}

fn decode(
    locus: &SuperLocus,
    transcript_id: &str,
    sequences: &HashMap<SeqStr, SequenceMeta>,
) -> Result<Vec<Feature>> {
    let feature_ider = Mutex::new(IdAllocator::features());
    let config = InterpreterConfig::default();
    let transcript = locus.transcript(transcript_id).unwrap();
    let mut interpreter = TranscriptInterpreter::new(
        locus,
        transcript,
        sequences,
        &feature_ider,
        &config,
    );
    interpreter.decode_raw_features()
}

fn summarize(features: &[Feature]) -> Vec<(FeatureType, PosType, PosType)> {
    features
        .iter()
        .map(|f| (f.feature_type, f.start, f.end))
        .collect()
}

#[fixture]
fn sequences() -> HashMap<SeqStr, SequenceMeta> {
    let mut map = HashMap::new();
    map.insert(SeqStr::from("chr1"), SequenceMeta::new("chr1", 5000));
    map
}

#[rstest]
fn test_plus_strand_two_exon_mrna(sequences: HashMap<SeqStr, SequenceMeta>) {
    use FeatureType::*;
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 1, 500, s),
        mrna("t1", "g1", 1, 500, s),
        child("exon", "t1", 1, 150, s),
        child("exon", "t1", 250, 500, s),
        child("five_prime_UTR", "t1", 1, 100, s),
        child("CDS", "t1", 101, 150, s).with_frame(Frame::Zero),
        child("CDS", "t1", 250, 400, s).with_frame(Frame::One),
        child("three_prime_UTR", "t1", 401, 500, s),
    ]);

    let features = decode(&locus, "t1", &sequences).unwrap();
    assert_eq!(summarize(&features), vec![
        (Tss, 1, 1),
        (StartCodon, 101, 101),
        (DonorSpliceSite, 151, 151),
        (AcceptorSpliceSite, 249, 249),
        (StopCodon, 400, 400),
        (Tts, 500, 500),
    ]);
    for feature in features.iter() {
        assert_eq!(feature.strand, Strand::Forward);
        assert_eq!(feature.transcript_ids(), ["t1".to_string()]);
    }
}

#[rstest]
fn test_minus_strand_two_exon_mrna(sequences: HashMap<SeqStr, SequenceMeta>) {
    use FeatureType::*;
    let s = Strand::Reverse;
    let locus = build_locus(vec![
        gene("g2", 1, 500, s),
        mrna("t2", "g2", 1, 500, s),
        child("exon", "t2", 1, 250, s),
        child("exon", "t2", 351, 500, s),
        child("five_prime_UTR", "t2", 401, 500, s),
        child("CDS", "t2", 351, 400, s).with_frame(Frame::Zero),
        child("CDS", "t2", 101, 250, s).with_frame(Frame::One),
        child("three_prime_UTR", "t2", 1, 100, s),
    ]);

    let features = decode(&locus, "t2", &sequences).unwrap();
    assert_eq!(summarize(&features), vec![
        (Tss, 500, 500),
        (StartCodon, 400, 400),
        (DonorSpliceSite, 350, 350),
        (AcceptorSpliceSite, 251, 251),
        (StopCodon, 101, 101),
        (Tts, 1, 1),
    ]);
}

#[rstest]
#[case::plus(Strand::Forward, vec![(1, 1), (101, 101), (200, 200), (300, 300)])]
#[case::minus(Strand::Reverse, vec![(300, 300), (200, 200), (101, 101), (1, 1)])]
fn test_noncoding_transcript_bounded_by_tss_and_tts(
    sequences: HashMap<SeqStr, SequenceMeta>,
    #[case] s: Strand,
    #[case] spans: Vec<(PosType, PosType)>,
) {
    use FeatureType::*;
    let locus = build_locus(vec![
        gene("g1", 1, 300, s),
        mrna("t1", "g1", 1, 300, s),
        child("exon", "t1", 1, 100, s),
        child("exon", "t1", 201, 300, s),
    ]);

    let features = decode(&locus, "t1", &sequences).unwrap();
    let expected = [Tss, DonorSpliceSite, AcceptorSpliceSite, Tts]
        .into_iter()
        .zip(spans)
        .map(|(t, (start, end))| (t, start, end))
        .collect::<Vec<_>>();
    assert_eq!(summarize(&features), expected);
}

#[rstest]
fn test_truncated_coding_transcript_gets_error_masks(
    sequences: HashMap<SeqStr, SequenceMeta>
) {
    use FeatureType::*;
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g3", 3000, 3100, s),
        mrna("t3", "g3", 3000, 3100, s),
        child("exon", "t3", 3000, 3100, s),
        child("CDS", "t3", 3000, 3100, s).with_frame(Frame::Zero),
    ]);

    let features = decode(&locus, "t3", &sequences).unwrap();
    assert_eq!(summarize(&features), vec![
        (Error, 1000, 2999),
        (StatusCoding, 3000, 3000),
        (StatusCoding, 3100, 3100),
        (Error, 3101, 5000),
    ]);
    // masks carry no frame, the coding points keep the template's
    assert_eq!(features[0].frame, Frame::Missing);
    assert_eq!(features[1].frame, Frame::Zero);
}

#[rstest]
fn test_no_error_mask_at_sequence_boundary(
    sequences: HashMap<SeqStr, SequenceMeta>
) {
    use FeatureType::*;
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 1, 100, s),
        mrna("t1", "g1", 1, 100, s),
        child("CDS", "t1", 1, 100, s).with_frame(Frame::Zero),
    ]);
    let features = decode(&locus, "t1", &sequences).unwrap();
    assert_eq!(summarize(&features), vec![
        (StatusCoding, 1, 1),
        (StatusCoding, 100, 100),
        (Error, 101, 2100),
    ]);

    let s = Strand::Reverse;
    let locus = build_locus(vec![
        gene("g2", 4901, 5000, s),
        mrna("t2", "g2", 4901, 5000, s),
        child("CDS", "t2", 4901, 5000, s).with_frame(Frame::Zero),
    ]);
    let features = decode(&locus, "t2", &sequences).unwrap();
    assert_eq!(summarize(&features), vec![
        (StatusCoding, 5000, 5000),
        (StatusCoding, 4901, 4901),
        (Error, 2901, 4900),
    ]);
}

#[rstest]
fn test_error_mask_clamps_to_sequence_bounds(
    sequences: HashMap<SeqStr, SequenceMeta>
) {
    use FeatureType::*;
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 500, 600, s),
        mrna("t1", "g1", 500, 600, s),
        child("CDS", "t1", 500, 600, s).with_frame(Frame::Zero),
    ]);
    let features = decode(&locus, "t1", &sequences).unwrap();
    assert_eq!(summarize(&features)[0], (Error, 1, 499));

    let locus = build_locus(vec![
        gene("g2", 4500, 4600, s),
        mrna("t2", "g2", 4500, 4600, s),
        child("CDS", "t2", 4500, 4600, s).with_frame(Frame::Zero),
    ]);
    let features = decode(&locus, "t2", &sequences).unwrap();
    assert_eq!(summarize(&features)[3], (Error, 4601, 5000));
}

#[rstest]
fn test_custom_error_buffer_width(sequences: HashMap<SeqStr, SequenceMeta>) {
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 500, 600, s),
        mrna("t1", "g1", 500, 600, s),
        child("CDS", "t1", 500, 600, s).with_frame(Frame::Zero),
    ]);
    let feature_ider = Mutex::new(IdAllocator::features());
    let config = InterpreterConfig::new().with_error_buffer(100);
    let transcript = locus.transcript("t1").unwrap();
    let mut interpreter = TranscriptInterpreter::new(
        &locus,
        transcript,
        &sequences,
        &feature_ider,
        &config,
    );
    let features = interpreter.decode_raw_features().unwrap();
    assert_eq!(
        summarize(&features)[0],
        (FeatureType::Error, 400, 499)
    );
}

#[rstest]
fn test_gap_before_start_codon_fails(
    sequences: HashMap<SeqStr, SequenceMeta>
) {
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 1, 200, s),
        mrna("t1", "g1", 1, 200, s),
        child("five_prime_UTR", "t1", 1, 100, s),
        child("CDS", "t1", 102, 200, s).with_frame(Frame::Zero),
    ]);
    let err = decode(&locus, "t1", &sequences).unwrap_err();
    assert!(matches!(err, AnnotError::Gap {
        upstream:   100,
        downstream: 102,
    }));
}

#[rstest]
fn test_start_codon_requires_first_codon_frame(
    sequences: HashMap<SeqStr, SequenceMeta>
) {
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 1, 200, s),
        mrna("t1", "g1", 1, 200, s),
        child("five_prime_UTR", "t1", 1, 100, s),
        child("CDS", "t1", 101, 200, s).with_frame(Frame::One),
    ]);
    let err = decode(&locus, "t1", &sequences).unwrap_err();
    assert_eq!(err, AnnotError::Frame { found: Frame::One });
}

#[rstest]
fn test_contiguous_pieces_cannot_form_intron(
    sequences: HashMap<SeqStr, SequenceMeta>
) {
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 1, 200, s),
        mrna("t1", "g1", 1, 200, s),
        child("five_prime_UTR", "t1", 1, 100, s),
        child("five_prime_UTR", "t1", 101, 200, s),
    ]);
    let err = decode(&locus, "t1", &sequences).unwrap_err();
    assert_eq!(err, AnnotError::Adjacency {
        upstream:   100,
        downstream: 101,
    });
}

#[rstest]
fn test_unexpected_transition_fails(
    sequences: HashMap<SeqStr, SequenceMeta>
) {
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 1, 250, s),
        mrna("t1", "g1", 1, 250, s),
        child("five_prime_UTR", "t1", 1, 100, s),
        child("three_prime_UTR", "t1", 151, 250, s),
    ]);
    let err = decode(&locus, "t1", &sequences).unwrap_err();
    assert!(matches!(err, AnnotError::UnexpectedTransition { .. }));
}

#[rstest]
fn test_transcript_must_start_with_utr_or_coding(
    sequences: HashMap<SeqStr, SequenceMeta>
) {
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 1, 100, s),
        mrna("t1", "g1", 1, 100, s),
        child("three_prime_UTR", "t1", 1, 100, s),
    ]);
    let err = decode(&locus, "t1", &sequences).unwrap_err();
    assert!(matches!(err, AnnotError::InvalidTranscriptStart { .. }));
}

#[rstest]
fn test_transcript_must_end_with_utr_or_coding(
    sequences: HashMap<SeqStr, SequenceMeta>
) {
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 1, 100, s),
        mrna("t1", "g1", 1, 100, s),
        child("five_prime_UTR", "t1", 1, 100, s),
    ]);
    let err = decode(&locus, "t1", &sequences).unwrap_err();
    assert!(matches!(err, AnnotError::InvalidTranscriptEnd { .. }));
}

#[rstest]
fn test_empty_transcript_fails(sequences: HashMap<SeqStr, SequenceMeta>) {
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 1, 100, s),
        mrna("t1", "g1", 1, 100, s),
    ]);
    let err = decode(&locus, "t1", &sequences).unwrap_err();
    assert_eq!(err, AnnotError::EmptyTranscript {
        id: "t1".to_string(),
    });
}

#[rstest]
fn test_unstranded_transcript_fails(
    sequences: HashMap<SeqStr, SequenceMeta>
) {
    let s = Strand::None;
    let locus = build_locus(vec![
        gene("g1", 1, 100, s),
        mrna("t1", "g1", 1, 100, s),
        child("exon", "t1", 1, 100, s),
    ]);
    let err = decode(&locus, "t1", &sequences).unwrap_err();
    assert!(matches!(err, AnnotError::MissingStrand { .. }));
}

#[rstest]
fn test_mixed_strand_transcript_fails(
    sequences: HashMap<SeqStr, SequenceMeta>
) {
    let locus = build_locus(vec![
        gene("g1", 1, 300, Strand::Forward),
        mrna("t1", "g1", 1, 300, Strand::Forward),
        child("exon", "t1", 1, 100, Strand::Forward),
        child("exon", "t1", 201, 300, Strand::Reverse),
    ]);
    let err = decode(&locus, "t1", &sequences).unwrap_err();
    assert!(matches!(err, AnnotError::MissingStrand { .. }));
}

#[rstest]
fn test_possible_types_resolution(sequences: HashMap<SeqStr, SequenceMeta>) {
    use FeatureType::*;
    let s = Strand::Forward;
    let locus = build_locus(vec![
        gene("g1", 1, 100, s),
        mrna("t1", "g1", 1, 100, s),
        child("exon", "t1", 1, 100, s).with_id("e1"),
        child("CDS", "t1", 1, 100, s).with_id("c1"),
        child("five_prime_UTR", "t1", 1, 100, s).with_id("u5"),
        child("three_prime_UTR", "t1", 1, 100, s).with_id("u3"),
    ]);
    let feature_ider = Mutex::new(IdAllocator::features());
    let config = InterpreterConfig::default();
    let transcript = locus.transcript("t1").unwrap();
    let interpreter = TranscriptInterpreter::new(
        &locus,
        transcript,
        &sequences,
        &feature_ider,
        &config,
    );
    let iv = |id: &str| {
        PosInterval {
            start: 0,
            stop:  100,
            val:   id.to_string(),
        }
    };
    let (e1, c1, u5, u3) = (iv("e1"), iv("c1"), iv("u5"), iv("u3"));

    assert_eq!(interpreter.possible_types(&[&e1]).unwrap(), vec![
        FivePrimeUtr,
        ThreePrimeUtr,
    ]);
    assert_eq!(
        interpreter.possible_types(&[&c1, &e1]).unwrap(),
        vec![Cds]
    );
    assert_eq!(
        interpreter.possible_types(&[&u5, &e1]).unwrap(),
        vec![FivePrimeUtr]
    );
    assert_eq!(
        interpreter.possible_types(&[&u3]).unwrap(),
        vec![ThreePrimeUtr]
    );
    assert!(matches!(
        interpreter.possible_types(&[&e1, &c1, &u5]).unwrap_err(),
        AnnotError::UnresolvedClusterType {
            n_intervals: 3,
            ..
        }
    ));
    assert!(matches!(
        interpreter.possible_types(&[&u5, &u3]).unwrap_err(),
        AnnotError::UnresolvedClusterType { .. }
    ));
}

#[rstest]
#[case(FeatureType::Tss, FeatureType::StatusIntergenic, FeatureType::StatusFivePrimeUtr, FeatureType::StatusFivePrimeUtr)]
#[case(FeatureType::StartCodon, FeatureType::StatusFivePrimeUtr, FeatureType::StatusCoding, FeatureType::StatusCoding)]
#[case(FeatureType::StopCodon, FeatureType::StatusCoding, FeatureType::StatusThreePrimeUtr, FeatureType::StatusThreePrimeUtr)]
#[case(FeatureType::Tts, FeatureType::StatusThreePrimeUtr, FeatureType::StatusIntergenic, FeatureType::StatusIntergenic)]
#[case(FeatureType::DonorSpliceSite, FeatureType::StatusCoding, FeatureType::StatusIntron, FeatureType::StatusCoding)]
#[case(FeatureType::AcceptorSpliceSite, FeatureType::StatusCoding, FeatureType::StatusCoding, FeatureType::StatusCoding)]
#[case(FeatureType::StatusCoding, FeatureType::StatusFivePrimeUtr, FeatureType::StatusCoding, FeatureType::StatusFivePrimeUtr)]
fn test_status_after_table(
    #[case] last: FeatureType,
    #[case] pre: FeatureType,
    #[case] status: FeatureType,
    #[case] new_pre: FeatureType,
) {
    assert_eq!(status_after(last, pre).unwrap(), (status, new_pre));
}

#[test]
fn test_status_after_rejects_span_types() {
    let err = status_after(FeatureType::Exon, FeatureType::StatusCoding)
        .unwrap_err();
    assert!(matches!(err, AnnotError::UnknownTransition { .. }));
}
