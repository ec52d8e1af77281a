pub mod config;
pub mod transition;
pub mod view_state;
pub mod viewport;
pub mod zoom;

pub use config::*;
pub use transition::*;
pub use view_state::*;
pub use viewport::*;
pub use zoom::*;
