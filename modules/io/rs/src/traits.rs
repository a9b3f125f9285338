use ahash::AHashSet;
use derive_getters::{Dissolve, Getters};

use alnmap_core_rs::align::LocalAlignment;

/// Canonical output of every format parser: the local alignments found in the
/// buffer plus the names of all participating sequences. An empty buffer (or a
/// buffer with a valid signature and no records) yields empty collections, not
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Dissolve, Getters)]
pub struct Parsed {
    alignments: Vec<LocalAlignment>,
    names: AHashSet<String>,
}

impl Parsed {
    pub fn new(alignments: Vec<LocalAlignment>, names: AHashSet<String>) -> Self {
        Self { alignments, names }
    }

    pub fn is_empty(&self) -> bool {
        self.alignments.is_empty()
    }
}
