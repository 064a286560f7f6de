use arcstr::ArcStr;

/// Genomic positions are 1-based inclusive unless a name says otherwise.
pub type PosType = u32;

/// Sequence and source names are shared across many features of a locus.
pub type SeqStr = ArcStr;

/// Entity identifiers minted by [`IdAllocator`].
///
/// [`IdAllocator`]: crate::data_structs::annotation::IdAllocator
pub type IdStr = String;
