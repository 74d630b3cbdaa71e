//! Report module - rendering and exporting dashboard views

pub mod export;
pub mod recommendations;
pub mod summary;
pub mod view;

pub use export::*;
pub use recommendations::*;
pub use summary::*;
pub use view::*;
