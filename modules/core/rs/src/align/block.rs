use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};

use crate::loc::{Interval, IntervalOp};

/// A single maximal ungapped block inside a gapped local alignment: one run of
/// alignment columns with no gap character on either sequence. Coordinates are
/// 0-based, half-open.
///
/// Query and target spans are usually equally long, but that is a property of
/// how the block was produced (gap scan, tabular start+size pairs) and is not
/// enforced here: the block-marker format only guarantees matching position
/// deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Dissolve, Getters)]
pub struct UngappedBlock {
    query: Interval<u64>,
    target: Interval<u64>,
    /// Percent identity of the block; reported by the block-marker format only.
    identity: Option<u8>,
}

impl UngappedBlock {
    pub fn new(query: Interval<u64>, target: Interval<u64>, identity: Option<u8>) -> Result<Self> {
        if let Some(identity) = identity {
            ensure!(
                identity <= 100,
                "Block identity must be a percentage, got {identity}"
            );
        }
        Ok(Self {
            query,
            target,
            identity,
        })
    }

    /// Block length, defined on the target axis.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.target.len()
    }
}
