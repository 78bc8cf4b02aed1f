use thiserror::Error;

use crate::kernel::kind::{Kind, KindCode};
use crate::kernel::lifecycle::{ConverterState, LifecycleRequest};
use crate::kernel::RunNumber;

/// Errors surfaced to the host by the converter lifecycle.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// No monitoring-element store was available when the converter was built.
    #[error("monitoring element store is not available")]
    StoreUnavailable,

    #[error("lifecycle request {request:?} is not valid in state {state:?}")]
    InvalidTransition {
        state: ConverterState,
        request: LifecycleRequest,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("output sink rejected product: {0}")]
    Sink(#[from] SinkError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("output label (Name) must not be empty")]
    EmptyName,

    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rejections raised by a [`crate::output::ProductSink`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("product {kind} with label '{label}' was never declared")]
    Undeclared { kind: Kind, label: String },

    #[error("product {kind} with label '{label}' for run {run} cannot be merged: {conflict}")]
    Incompatible {
        kind: Kind,
        label: String,
        run: RunNumber,
        conflict: MergeConflict,
    },

    #[error("declarations are frozen once products have been stored")]
    DeclarationsFrozen,
}

/// Why two products for the same (kind, label, run) could not be combined.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeConflict {
    #[error("stored {stored} product cannot absorb a {incoming} product")]
    KindMismatch { stored: Kind, incoming: Kind },

    #[error("binning of '{name}' differs from the stored entry")]
    Binning { name: String },
}

/// Per-element faults. These are logged and counted, never propagated: one bad
/// element must not abort the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ElementError {
    #[error("the monitoring element '{path}' has unrecognised kind code {code}")]
    UnrecognizedKind { path: String, code: KindCode },

    #[error("the monitoring element '{path}' is declared as {kind} but exposes no {kind} value")]
    MissingValue { path: String, kind: Kind },
}
