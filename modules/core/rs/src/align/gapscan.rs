use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};

use crate::loc::{Interval, IntervalOp};

/// Gap character used by all supported alignment tools.
pub const GAP: u8 = b'-';

/// One maximal ungapped correspondence between two gapped rows of a column
/// alignment. Coordinates are 0-based, half-open, ungapped positions local to
/// the scanned rows; both sides are equally long by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Dissolve, Getters)]
pub struct UngappedRun {
    a: Interval<u64>,
    b: Interval<u64>,
}

impl UngappedRun {
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.a.len()
    }
}

/// Extract all maximal ungapped correspondences from a pair of equal-length
/// gapped rows.
///
/// The rows are scanned column by column while two ungapped-position counters
/// advance whenever the respective row shows a residue. A run is open as long
/// as both rows show residues and is emitted the moment either row gaps (or at
/// the end of input). Zero-length runs are never emitted, and rows aligned
/// against nothing but gaps yield an empty list rather than an error.
///
/// The per-row position counters are checked against each row's gap-stripped
/// length after the scan; a mismatch means the input rows were not a single
/// column alignment and the whole extraction fails.
pub fn extract(a: &str, b: &str) -> Result<Vec<UngappedRun>> {
    ensure!(
        a.len() == b.len(),
        "Gapped rows must be equally long, got {} and {}",
        a.len(),
        b.len()
    );
    let (a, b) = (a.as_bytes(), b.as_bytes());

    let mut runs = Vec::new();
    let (mut a_pos, mut b_pos) = (0u64, 0u64);
    let mut open: Option<(u64, u64)> = None;

    for column in 0..a.len() {
        let (a_gap, b_gap) = (a[column] == GAP, b[column] == GAP);
        if a_gap || b_gap {
            if let Some((a_start, b_start)) = open.take() {
                runs.push(UngappedRun {
                    a: Interval::new(a_start, a_pos)?,
                    b: Interval::new(b_start, b_pos)?,
                });
            }
        } else if open.is_none() {
            open = Some((a_pos, b_pos));
        }

        if !a_gap {
            a_pos += 1;
        }
        if !b_gap {
            b_pos += 1;
        }
    }
    if let Some((a_start, b_start)) = open {
        runs.push(UngappedRun {
            a: Interval::new(a_start, a_pos)?,
            b: Interval::new(b_start, b_pos)?,
        });
    }

    let a_total = a.iter().filter(|x| **x != GAP).count() as u64;
    let b_total = b.iter().filter(|x| **x != GAP).count() as u64;
    ensure!(
        a_pos == a_total && b_pos == b_total,
        "Ungapped position counters diverged from the gap-stripped lengths \
         ({a_pos} vs {a_total}, {b_pos} vs {b_total}); the rows are not a column alignment"
    );

    Ok(runs)
}
