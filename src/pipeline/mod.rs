//! Pipeline module - loading, bucketing, aggregation and risk classification

pub mod aggregation;
pub mod bins;
pub mod bucketing;
pub mod cache;
pub mod columns;
pub mod filters;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod risk;

pub use aggregation::*;
pub use bins::*;
pub use bucketing::*;
pub use cache::ResourceCache;
pub use filters::*;
pub use loader::*;
pub use metrics::*;
pub use model::*;
pub use risk::*;
