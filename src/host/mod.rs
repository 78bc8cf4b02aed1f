//! Stand-in for the host framework: event delivery and job fixtures.

pub mod driver;
pub mod fixture;

pub use driver::{HostEvent, JobDriver, StepOutcome};
pub use fixture::JobFixture;
