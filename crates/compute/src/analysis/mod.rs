pub mod statistics;
pub mod temporal;

pub use statistics::*;
pub use temporal::*;
