use std::collections::BTreeSet;

use rust_lapper::{
    Interval,
    Lapper,
};

use crate::data_structs::typedef::PosType;

/// One split piece of a feature span. `val` is the owning feature id.
pub type PosInterval = Interval<PosType, String>;

/// Splits every span at every boundary point of the whole set, so that
/// no two stored intervals partially overlap: after splitting they are
/// either identical or disjoint. Input spans are 0-based half-open.
pub fn split_intervals<I>(spans: I) -> Lapper<PosType, String>
where
    I: IntoIterator<Item = (String, PosType, PosType)>, {
    let spans = spans.into_iter().collect::<Vec<_>>();
    let mut cuts = BTreeSet::new();
    for (_, start, stop) in spans.iter() {
        cuts.insert(*start);
        cuts.insert(*stop);
    }

    let mut pieces = Vec::new();
    for (id, start, stop) in spans {
        let mut piece_start = start;
        for cut in cuts.range((
            std::ops::Bound::Excluded(start),
            std::ops::Bound::Excluded(stop),
        )) {
            pieces.push(Interval {
                start: piece_start,
                stop:  *cut,
                val:   id.clone(),
            });
            piece_start = *cut;
        }
        pieces.push(Interval {
            start: piece_start,
            stop,
            val: id,
        });
    }

    Lapper::new(pieces)
}

/// Groups the stored split intervals into clusters of equal begin
/// coordinate, yielded lazily in ascending coordinate order. A minus
/// strand consumer reverses the collected sequence to walk 5'->3'.
pub fn clusters(
    lapper: &Lapper<PosType, String>
) -> impl Iterator<Item = Vec<&PosInterval>> + '_ {
    let mut intervals = lapper.iter().peekable();
    std::iter::from_fn(move || {
        let first = intervals.next()?;
        let mut group = vec![first];
        while let Some(next) = intervals.next_if(|iv| iv.start == first.start)
        {
            group.push(next);
        }
        Some(group)
    })
}
