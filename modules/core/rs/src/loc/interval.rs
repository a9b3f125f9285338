use std::fmt::{Debug, Display};
use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;

use derive_getters::Dissolve;
use eyre::{eyre, Report, Result};
use impl_tools::autoimpl;

use crate::num::PrimInt;

/// Interval is a half-open coordinate range [start, end) on a sequence.
/// It's not represented as a Rust-native Range for a couple of reasons:
/// - Prohibit 'empty' intervals (start == end) or intervals with negative length (start > end)
/// - Implement custom traits (e.g. Dissolve) and methods (e.g. contains, intersects).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Dissolve)]
pub struct Interval<Idx: PrimInt> {
    start: Idx,
    end: Idx,
}

/// Trait for types that can be generally viewed as half-open coordinate intervals [start, end).
#[autoimpl(for <T: trait + ?Sized> &T, Box<T>, Rc<T>, Arc<T>)]
#[allow(clippy::len_without_is_empty)]
pub trait IntervalOp {
    type Idx: PrimInt;

    /// Start position of the interval-like object.
    fn start(&self) -> Self::Idx;

    /// End position of the interval-like object.
    fn end(&self) -> Self::Idx;

    /// Length of the interval-like object.
    fn len(&self) -> Self::Idx {
        self.end() - self.start()
    }

    /// Check if the interval-like object contains a given position.
    fn contains(&self, pos: Self::Idx) -> bool {
        self.start() <= pos && pos < self.end()
    }

    /// Check if the interval-like object intersects with another interval-like object.
    /// The condition is strict and doesn't allow touching intervals.
    fn intersects(&self, other: &Self) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }

    /// Turn the interval-like object into a basic half-open interval.
    fn as_interval(&self) -> Interval<Self::Idx> {
        Interval {
            start: self.start(),
            end: self.end(),
        }
    }
}

impl<T: PrimInt> IntervalOp for Interval<T> {
    type Idx = T;

    #[inline(always)]
    fn start(&self) -> Self::Idx {
        self.start
    }
    #[inline(always)]
    fn end(&self) -> Self::Idx {
        self.end
    }
}

impl<Idx: PrimInt> Interval<Idx> {
    pub fn new(start: Idx, end: Idx) -> Result<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(eyre!("Invalid interval: start >= end ({start:?} >= {end:?})"))
        }
    }

    /// Interval moved right by the given shift. The shift must keep the interval representable.
    pub fn shifted(&self, shift: Idx) -> Self {
        Self {
            start: self.start + shift,
            end: self.end + shift,
        }
    }

    pub fn cast<T: PrimInt>(&self) -> Option<Interval<T>> {
        match (T::from(self.start), T::from(self.end)) {
            (Some(start), Some(end)) => Some(Interval { start, end }),
            _ => None,
        }
    }
}

impl<Idx: PrimInt> Default for Interval<Idx> {
    fn default() -> Self {
        Self {
            start: Idx::zero(),
            end: Idx::one(),
        }
    }
}

impl<Idx: PrimInt + Display> Display for Interval<Idx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl<Idx: PrimInt> TryFrom<(Idx, Idx)> for Interval<Idx> {
    type Error = Report;

    fn try_from(value: (Idx, Idx)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1)
    }
}

impl<Idx: PrimInt> From<Interval<Idx>> for (Idx, Idx) {
    fn from(interval: Interval<Idx>) -> Self {
        (interval.start, interval.end)
    }
}

impl<Idx: PrimInt> TryFrom<Range<Idx>> for Interval<Idx> {
    type Error = Report;

    fn try_from(value: Range<Idx>) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl<Idx: PrimInt> From<Interval<Idx>> for Range<Idx> {
    fn from(interval: Interval<Idx>) -> Self {
        interval.start..interval.end
    }
}

impl<Idx: PrimInt> PartialEq<(Idx, Idx)> for Interval<Idx> {
    fn eq(&self, other: &(Idx, Idx)) -> bool {
        self.start == other.0 && self.end == other.1
    }
}

impl<Idx: PrimInt> PartialEq<Range<Idx>> for Interval<Idx> {
    fn eq(&self, other: &Range<Idx>) -> bool {
        self.start == other.start && self.end == other.end
    }
}
