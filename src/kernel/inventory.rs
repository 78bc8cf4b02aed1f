use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info};

use super::kind::{Kind, KindCounts};
use crate::monitor::MonitorElement;

/// What the store held when the converter was initialized.
/// Only counts are kept; payloads are not copied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    /// Leading path segment -> number of elements (all kinds, recognised or not).
    pub packages: BTreeMap<String, usize>,
    pub counts: KindCounts,
    pub unrecognized: usize,
}

impl Inventory {
    pub fn take(elements: &[&dyn MonitorElement], verbosity: i32) -> Self {
        let mut inventory = Inventory::default();

        for me in elements {
            *inventory.packages.entry(me.package().to_string()).or_insert(0) += 1;

            match Kind::resolve(me.kind_code(), &me.full_name()) {
                Ok(kind) => {
                    if verbosity > 1 {
                        info!(name = me.name(), %kind, "counted monitoring element");
                    }
                    inventory.counts.increment(kind);
                }
                Err(e) => {
                    error!("{}", e);
                    inventory.unrecognized += 1;
                }
            }
        }

        inventory
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.counts.get(kind)
    }

    /// Kinds that get a declared product slot.
    pub fn declared_kinds(&self) -> Vec<Kind> {
        self.counts.present().collect()
    }

    pub fn log_summary(&self) {
        for (package, n) in &self.packages {
            info!(package = %package, elements = n, "package accessing the store");
        }
        for (kind, n) in self.counts.iter() {
            info!(%kind, objects = n, "monitoring elements by kind");
        }
        if self.unrecognized > 0 {
            info!(elements = self.unrecognized, "monitoring elements with unrecognised kind");
        }
    }
}
