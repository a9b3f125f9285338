pub mod align;
pub mod loc;
pub mod num;
