//! Monitoring elements and the store that owns them.

pub mod element;
pub mod histogram;
pub mod store;

pub use element::{MeObject, MeValue, MonitorElement, StoredElement, TagList};
pub use histogram::{Axis, Hist1D, Hist2D, Hist3D, Profile1D, Profile2D, ProfileCells};
pub use store::{InMemoryMonitorStore, MonitorStore};
