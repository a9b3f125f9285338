pub use interval::{Interval, IntervalOp};
pub use locus::Locus;
pub use strand::{Strand, StrandPair};

mod interval;
mod locus;
mod strand;
