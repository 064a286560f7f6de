//! Coordinate primitives: 0-based half-open split intervals and the
//! boundary-aligned cluster grouping used to walk a transcript.

mod partition;

pub use partition::{
    clusters,
    split_intervals,
    PosInterval,
};
