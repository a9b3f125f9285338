pub use block::UngappedBlock;
pub use local::LocalAlignment;

pub mod gapscan;

mod block;
mod local;
