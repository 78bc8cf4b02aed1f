//! Run products and the sink they are handed to.

pub mod container;
pub mod sink;

pub use container::{Accumulate, MeToEdm, RunProduct};
pub use sink::{Declaration, ProductSink, RunRecordStore, StoredProduct};
