pub mod analysis;
pub mod report;
pub mod store;

pub use analysis::*;
pub use report::*;
pub use store::*;
