pub mod clustal;
pub mod gfasta;
pub mod lagan;
pub mod lav;
pub mod mlagan;
pub mod psl;

mod format;
mod traits;

pub use format::Format;
pub use traits::Parsed;
