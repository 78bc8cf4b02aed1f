//! Conversion core: kind table, per-run buckets and the converter lifecycle.

pub mod bucket;
pub mod converter;
pub mod inventory;
pub mod kind;
pub mod lifecycle;
pub mod run_counter;
pub mod stats;

/// Host run identifier.
pub type RunNumber = u32;

pub use converter::Converter;
pub use kind::{Kind, KindCode, KindCounts};
pub use lifecycle::{ConverterState, LifecycleRequest};
pub use stats::{ConversionStats, JobSummary, RunReport};
