mod feed;
mod traits;

pub use feed::feed;
pub use traits::{IntervalIndex, SequenceDb};
