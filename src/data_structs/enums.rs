use std::convert::Infallible;
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::AnnotError;

#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum Strand {
    /// Forward strand.
    Forward,
    /// Reverse strand.
    Reverse,
    /// No strand.
    None,
}

impl FromStr for Strand {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            _ => Ok(Strand::None),
        }
    }
}

impl From<&str> for Strand {
    fn from(value: &str) -> Self {
        match value {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            _ => Strand::None,
        }
    }
}

impl From<char> for Strand {
    fn from(value: char) -> Self {
        match value {
            '+' => Strand::Forward,
            '-' => Strand::Reverse,
            _ => Strand::None,
        }
    }
}

impl From<Strand> for char {
    fn from(value: Strand) -> Self {
        match value {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::None => '.',
        }
    }
}

impl From<Option<bio_types::strand::Strand>> for Strand {
    fn from(value: Option<bio_types::strand::Strand>) -> Self {
        match value {
            Some(bio_types::strand::Strand::Forward) => Strand::Forward,
            Some(bio_types::strand::Strand::Reverse) => Strand::Reverse,
            _ => Strand::None,
        }
    }
}

impl Display for Strand {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::None => ".",
        })
    }
}

impl Serialize for Strand {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Strand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        Ok(Strand::from(s.as_str()))
    }
}


/// GFF3 phase of a coding feature. `Zero` marks the first base of a codon.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord, Default)]
pub enum Frame {
    #[default]
    Missing,
    Zero,
    One,
    Two,
}

impl Frame {
    pub fn is_set(&self) -> bool {
        !matches!(self, Frame::Missing)
    }

    /// Whether two frames can describe the same feature. `Missing` is
    /// compatible with anything; set frames must be equal.
    pub fn compatible_with(
        &self,
        other: &Frame,
    ) -> bool {
        match (self, other) {
            (Frame::Missing, _) | (_, Frame::Missing) => true,
            (a, b) => a == b,
        }
    }
}

impl FromStr for Frame {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Frame::Zero),
            "1" => Ok(Frame::One),
            "2" => Ok(Frame::Two),
            _ => Ok(Frame::Missing),
        }
    }
}

impl From<&str> for Frame {
    fn from(value: &str) -> Self {
        match value {
            "0" => Frame::Zero,
            "1" => Frame::One,
            "2" => Frame::Two,
            _ => Frame::Missing,
        }
    }
}

impl Display for Frame {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", match self {
            Frame::Missing => ".",
            Frame::Zero => "0",
            Frame::One => "1",
            Frame::Two => "2",
        })
    }
}

impl Serialize for Frame {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Frame {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        Ok(Frame::from(s.as_str()))
    }
}


/// Broad classes of the annotation vocabulary, used to route records
/// during ingestion and to answer containment questions.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub enum FeatureCategory {
    /// Gene-like, generally holding a collection of transcripts.
    GeneLevel,
    /// Transcript-like, generally holding a collection of exons.
    Transcribed,
    /// Regions of original or processed transcripts.
    SubTranscribed,
    /// Sub-exon-level categorization.
    CodingInfo,
    /// Zero-length landmarks.
    PointAnnotation,
    /// Whole sequences; never enter the entity graph.
    Region,
    /// Alignment artifacts; never enter the entity graph.
    Ignorable,
    /// Marker for mistakes and uncertain stretches.
    ErrorMarker,
    /// Explicitly recorded walk status.
    Status,
}

/// The closed annotation-type vocabulary.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub enum FeatureType {
    // gene level
    Gene,
    SuperGene,
    NcRnaGene,
    Pseudogene,
    // transcribed
    Mrna,
    Trna,
    Rrna,
    Mirna,
    Snorna,
    Snrna,
    SrpRna,
    LncRna,
    PreMirna,
    RnaseMrpRna,
    Transcript,
    PrimaryTranscript,
    PseudogenicTranscript,
    // sub transcribed
    Exon,
    Intron,
    // coding info
    Cds,
    FivePrimeUtr,
    ThreePrimeUtr,
    // point annotations; the trans variants mark splice sites whose far
    // side lies on another strand or sequence and do not imply an intron
    Tss,
    Tts,
    StartCodon,
    StopCodon,
    DonorSpliceSite,
    AcceptorSpliceSite,
    TransDonorSpliceSite,
    TransAcceptorSpliceSite,
    // regions
    Region,
    Chromosome,
    Supercontig,
    // not really annotations
    Match,
    CdnaMatch,
    // mistakes or near-mistakes
    Error,
    StatusCoding,
    StatusIntron,
    StatusFivePrimeUtr,
    StatusThreePrimeUtr,
    StatusIntergenic,
}

impl FeatureType {
    /// Canonical GFF spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Gene => "gene",
            FeatureType::SuperGene => "super_gene",
            FeatureType::NcRnaGene => "ncRNA_gene",
            FeatureType::Pseudogene => "pseudogene",
            FeatureType::Mrna => "mRNA",
            FeatureType::Trna => "tRNA",
            FeatureType::Rrna => "rRNA",
            FeatureType::Mirna => "miRNA",
            FeatureType::Snorna => "snoRNA",
            FeatureType::Snrna => "snRNA",
            FeatureType::SrpRna => "SRP_RNA",
            FeatureType::LncRna => "lnc_RNA",
            FeatureType::PreMirna => "pre_miRNA",
            FeatureType::RnaseMrpRna => "RNase_MRP_RNA",
            FeatureType::Transcript => "transcript",
            FeatureType::PrimaryTranscript => "primary_transcript",
            FeatureType::PseudogenicTranscript => "pseudogenic_transcript",
            FeatureType::Exon => "exon",
            FeatureType::Intron => "intron",
            FeatureType::Cds => "CDS",
            FeatureType::FivePrimeUtr => "five_prime_UTR",
            FeatureType::ThreePrimeUtr => "three_prime_UTR",
            FeatureType::Tss => "TSS",
            FeatureType::Tts => "TTS",
            FeatureType::StartCodon => "start_codon",
            FeatureType::StopCodon => "stop_codon",
            FeatureType::DonorSpliceSite => "donor_splice_site",
            FeatureType::AcceptorSpliceSite => "acceptor_splice_site",
            FeatureType::TransDonorSpliceSite => "trans_donor_splice_site",
            FeatureType::TransAcceptorSpliceSite => {
                "trans_acceptor_splice_site"
            },
            FeatureType::Region => "region",
            FeatureType::Chromosome => "chromosome",
            FeatureType::Supercontig => "supercontig",
            FeatureType::Match => "match",
            FeatureType::CdnaMatch => "cDNA_match",
            FeatureType::Error => "error",
            FeatureType::StatusCoding => "status_coding",
            FeatureType::StatusIntron => "status_intron",
            FeatureType::StatusFivePrimeUtr => "status_five_prime_UTR",
            FeatureType::StatusThreePrimeUtr => "status_three_prime_UTR",
            FeatureType::StatusIntergenic => "status_intergenic",
        }
    }

    pub fn category(&self) -> FeatureCategory {
        use FeatureType::*;
        match self {
            Gene | SuperGene | NcRnaGene | Pseudogene => {
                FeatureCategory::GeneLevel
            },
            Mrna | Trna | Rrna | Mirna | Snorna | Snrna | SrpRna | LncRna
            | PreMirna | RnaseMrpRna | Transcript | PrimaryTranscript
            | PseudogenicTranscript => FeatureCategory::Transcribed,
            Exon | Intron => FeatureCategory::SubTranscribed,
            Cds | FivePrimeUtr | ThreePrimeUtr => FeatureCategory::CodingInfo,
            Tss | Tts | StartCodon | StopCodon | DonorSpliceSite
            | AcceptorSpliceSite | TransDonorSpliceSite
            | TransAcceptorSpliceSite => FeatureCategory::PointAnnotation,
            Region | Chromosome | Supercontig => FeatureCategory::Region,
            Match | CdnaMatch => FeatureCategory::Ignorable,
            Error => FeatureCategory::ErrorMarker,
            StatusCoding | StatusIntron | StatusFivePrimeUtr
            | StatusThreePrimeUtr | StatusIntergenic => {
                FeatureCategory::Status
            },
        }
    }

    /// Types that never enter the entity graph.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self.category(),
            FeatureCategory::Region | FeatureCategory::Ignorable
        )
    }

    /// Types that create a [`Feature`] during ingestion.
    ///
    /// [`Feature`]: crate::data_structs::annotation::Feature
    pub fn is_feature_forming(&self) -> bool {
        matches!(
            self.category(),
            FeatureCategory::SubTranscribed
                | FeatureCategory::CodingInfo
                | FeatureCategory::PointAnnotation
                | FeatureCategory::ErrorMarker
                | FeatureCategory::Status
        )
    }

    pub fn is_status(&self) -> bool {
        matches!(self.category(), FeatureCategory::Status)
    }
}

impl FromStr for FeatureType {
    type Err = AnnotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gene" => Ok(FeatureType::Gene),
            "super_gene" => Ok(FeatureType::SuperGene),
            "ncRNA_gene" => Ok(FeatureType::NcRnaGene),
            "pseudogene" => Ok(FeatureType::Pseudogene),
            "mRNA" => Ok(FeatureType::Mrna),
            "tRNA" => Ok(FeatureType::Trna),
            "rRNA" => Ok(FeatureType::Rrna),
            "miRNA" => Ok(FeatureType::Mirna),
            "snoRNA" => Ok(FeatureType::Snorna),
            "snRNA" => Ok(FeatureType::Snrna),
            "SRP_RNA" => Ok(FeatureType::SrpRna),
            "lnc_RNA" => Ok(FeatureType::LncRna),
            "pre_miRNA" => Ok(FeatureType::PreMirna),
            "RNase_MRP_RNA" => Ok(FeatureType::RnaseMrpRna),
            "transcript" => Ok(FeatureType::Transcript),
            "primary_transcript" => Ok(FeatureType::PrimaryTranscript),
            "pseudogenic_transcript" => {
                Ok(FeatureType::PseudogenicTranscript)
            },
            "exon" => Ok(FeatureType::Exon),
            "intron" => Ok(FeatureType::Intron),
            "CDS" => Ok(FeatureType::Cds),
            "five_prime_UTR" => Ok(FeatureType::FivePrimeUtr),
            "three_prime_UTR" => Ok(FeatureType::ThreePrimeUtr),
            "TSS" => Ok(FeatureType::Tss),
            "TTS" => Ok(FeatureType::Tts),
            "start_codon" => Ok(FeatureType::StartCodon),
            "stop_codon" => Ok(FeatureType::StopCodon),
            "donor_splice_site" => Ok(FeatureType::DonorSpliceSite),
            "acceptor_splice_site" => Ok(FeatureType::AcceptorSpliceSite),
            "trans_donor_splice_site" => {
                Ok(FeatureType::TransDonorSpliceSite)
            },
            "trans_acceptor_splice_site" => {
                Ok(FeatureType::TransAcceptorSpliceSite)
            },
            "region" => Ok(FeatureType::Region),
            "chromosome" => Ok(FeatureType::Chromosome),
            "supercontig" => Ok(FeatureType::Supercontig),
            "match" => Ok(FeatureType::Match),
            "cDNA_match" => Ok(FeatureType::CdnaMatch),
            "error" => Ok(FeatureType::Error),
            "status_coding" => Ok(FeatureType::StatusCoding),
            "status_intron" => Ok(FeatureType::StatusIntron),
            "status_five_prime_UTR" => Ok(FeatureType::StatusFivePrimeUtr),
            "status_three_prime_UTR" => Ok(FeatureType::StatusThreePrimeUtr),
            "status_intergenic" => Ok(FeatureType::StatusIntergenic),
            other => {
                Err(AnnotError::UnrecognizedType {
                    found: other.to_string(),
                })
            },
        }
    }
}

impl Display for FeatureType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for FeatureType {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FeatureType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        FeatureType::from_str(&s).map_err(serde::de::Error::custom)
    }
}
