use eyre::Result;

use alnmap_core_rs::loc::{Interval, Locus};

/// External database resolving opaque sequence names to actual sequences.
pub trait SequenceDb {
    /// Handle to one resolved sequence.
    type Handle;

    /// Resolve a sequence name. Fails when the database knows no such name.
    fn sequence(&self, name: &str) -> Result<Self::Handle>;

    /// Residues of a half-open slice of a resolved sequence.
    fn subsequence(&self, handle: &Self::Handle, interval: &Interval<u64>) -> Result<String>;
}

/// External index accumulating aligned locus pairs.
///
/// `build` consumes the index, so finalizing twice (or inserting after the
/// finalization) is a compile error rather than a runtime one.
pub trait IntervalIndex {
    /// The finalized, queryable form of the index.
    type Built;

    /// Announce a sequence before any of its loci are inserted.
    fn register(&mut self, name: &str);

    /// Record one aligned pair of loci.
    fn insert(&mut self, src: Locus<u64>, dst: Locus<u64>);

    /// Finalize the index.
    fn build(self) -> Result<Self::Built>;
}
