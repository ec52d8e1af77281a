pub mod boundary;
pub mod emissions;
pub mod loader;

pub use boundary::*;
pub use emissions::*;
pub use loader::*;
