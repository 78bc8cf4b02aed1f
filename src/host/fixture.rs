use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::driver::HostEvent;
use crate::config::ConverterConfig;
use crate::error::ConverterError;
use crate::kernel::RunNumber;
use crate::monitor::{InMemoryMonitorStore, StoredElement};

/// A self-contained job description: converter parameters, the store contents
/// and the runs to process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFixture {
    pub config: ConverterConfig,
    pub elements: Vec<StoredElement>,
    pub runs: Vec<RunNumber>,
}

impl JobFixture {
    pub fn from_json_str(json: &str) -> Result<Self, ConverterError> {
        let fixture: Self = serde_json::from_str(json)?;
        fixture.config.validate()?;
        Ok(fixture)
    }

    pub fn load(path: &Path) -> Result<Self, ConverterError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn store(&self) -> InMemoryMonitorStore {
        InMemoryMonitorStore::from_elements(self.elements.iter().cloned())
    }

    /// Begin/end pairs for every run, then job end.
    pub fn events(&self) -> Vec<HostEvent> {
        let mut events: Vec<HostEvent> = self
            .runs
            .iter()
            .flat_map(|run| [HostEvent::BeginRun(*run), HostEvent::EndRun(*run)])
            .collect();
        events.push(HostEvent::EndJob);
        events
    }
}
