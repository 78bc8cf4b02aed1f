pub mod config;
pub mod error;
pub mod host;
pub mod kernel;
pub mod monitor;
pub mod output;

// Entry points used by the binary and the tests.
pub use config::ConverterConfig;
pub use error::{ConfigError, ConverterError, ElementError, MergeConflict, SinkError};
pub use kernel::{Converter, Kind, RunNumber};
