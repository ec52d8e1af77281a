//! Renderers for the emissions map: country fills, legend, tooltips and the
//! per-country detail panel. Output is SVG/HTML markup that any front end can
//! place into its document.

pub mod axis;
pub mod charts;
pub mod choropleth;
pub mod detail;
pub mod format;
pub mod legend;
pub mod page;
pub mod path;
pub mod svg;
pub mod symbology;
pub mod tooltip;

pub use choropleth::*;
pub use detail::*;
pub use legend::*;
pub use page::*;
pub use symbology::*;
pub use tooltip::*;
