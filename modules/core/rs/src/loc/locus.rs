use std::fmt::Display;
use std::ops::Range;

use derive_getters::Dissolve;
use derive_more::Constructor;
use eyre::Report;

use crate::num::PrimInt;

use super::interval::{Interval, IntervalOp};
use super::strand::Strand;

/// A locus is a stranded coordinate range on a named sequence. Sequence names
/// are opaque keys resolved against an external sequence database.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Dissolve, Constructor)]
pub struct Locus<Idx: PrimInt> {
    pub name: String,
    pub interval: Interval<Idx>,
    pub strand: Strand,
}

impl<Idx: PrimInt + Display> Display for Locus<Idx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}[{}]",
            self.name,
            self.interval.start(),
            self.interval.end(),
            self.strand
        )
    }
}

impl<Idx: PrimInt> TryFrom<(&str, Range<Idx>, Strand)> for Locus<Idx> {
    type Error = Report;

    fn try_from((name, range, strand): (&str, Range<Idx>, Strand)) -> Result<Self, Self::Error> {
        Ok(Self {
            name: name.to_owned(),
            interval: (range.start, range.end).try_into()?,
            strand,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locus_try_from() {
        let locus: Locus<u64> = ("chr1", 10..20, Strand::Forward).try_into().unwrap();
        assert_eq!(locus.name, "chr1");
        assert_eq!(locus.interval, (10, 20));
        assert_eq!(locus.strand, Strand::Forward);

        assert!(Locus::<u64>::try_from(("chr1", 20..10, Strand::Forward)).is_err());
    }

    #[test]
    fn test_locus_display() {
        let locus = Locus::new("seq".to_owned(), Interval::new(0u64, 5).unwrap(), Strand::Reverse);
        assert_eq!(locus.to_string(), "seq:0-5[-]");
    }
}
