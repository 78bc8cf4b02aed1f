use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::element::{MonitorElement, StoredElement};
use crate::error::ConverterError;

/// The monitoring-element store as seen by the converter.
///
/// Enumeration order is the store's own order and is preserved by the
/// converter. The only mutation the converter performs is `reset()` on
/// object-kind elements after their payload has been copied.
pub trait MonitorStore {
    fn set_verbose(&mut self, level: i32);

    /// All elements whose directory lies under `prefix` ("" for everything).
    fn contents(&self, prefix: &str) -> Vec<&dyn MonitorElement>;

    fn contents_mut(&mut self, prefix: &str) -> Vec<&mut dyn MonitorElement>;
}

fn in_directory(pathname: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() || pathname == prefix {
        return true;
    }
    pathname
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// In-process store keyed (and therefore enumerated) by full name.
#[derive(Debug, Default)]
pub struct InMemoryMonitorStore {
    elements: BTreeMap<String, StoredElement>,
    verbose: i32,
}

impl InMemoryMonitorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: impl IntoIterator<Item = StoredElement>) -> Self {
        let mut store = Self::new();
        for element in elements {
            store.insert(element);
        }
        store
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConverterError> {
        let elements: Vec<StoredElement> = serde_json::from_str(json)?;
        Ok(Self::from_elements(elements))
    }

    pub fn load(path: &Path) -> Result<Self, ConverterError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Insert or replace (by full name) an element.
    pub fn insert(&mut self, element: StoredElement) -> Option<StoredElement> {
        self.elements.insert(element.full_name(), element)
    }

    pub fn remove(&mut self, full_name: &str) -> Option<StoredElement> {
        self.elements.remove(full_name)
    }

    pub fn get(&self, full_name: &str) -> Option<&StoredElement> {
        self.elements.get(full_name)
    }

    pub fn get_mut(&mut self, full_name: &str) -> Option<&mut StoredElement> {
        self.elements.get_mut(full_name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn verbose(&self) -> i32 {
        self.verbose
    }

    pub fn elements(&self) -> impl Iterator<Item = &StoredElement> {
        self.elements.values()
    }
}

impl MonitorStore for InMemoryMonitorStore {
    fn set_verbose(&mut self, level: i32) {
        self.verbose = level;
    }

    fn contents(&self, prefix: &str) -> Vec<&dyn MonitorElement> {
        self.elements
            .values()
            .filter(|e| in_directory(&e.pathname, prefix))
            .map(|e| e as &dyn MonitorElement)
            .collect()
    }

    fn contents_mut(&mut self, prefix: &str) -> Vec<&mut dyn MonitorElement> {
        self.elements
            .values_mut()
            .filter(|e| in_directory(&e.pathname, prefix))
            .map(|e| e as &mut dyn MonitorElement)
            .collect()
    }
}
