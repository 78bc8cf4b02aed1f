use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::container::RunProduct;
use crate::error::{ConverterError, SinkError};
use crate::kernel::kind::Kind;
use crate::kernel::RunNumber;

/// The host's typed output mechanism.
///
/// Product shapes are fixed up front: every (kind, label) pair must be
/// declared with `produces` before the first `put`. A run number may come
/// round more than once, so a later `put` for a stored (kind, label, run)
/// must be folded into the stored product, not treated as a fault.
pub trait ProductSink {
    fn produces(&mut self, kind: Kind, label: &str) -> Result<(), SinkError>;

    fn put(&mut self, run: RunNumber, label: &str, product: RunProduct) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: Kind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProduct {
    pub run: RunNumber,
    pub label: String,
    pub product: RunProduct,
}

/// Reference sink keeping every run product in memory, persisted as JSON.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RunRecordStore {
    declarations: BTreeSet<Declaration>,
    products: Vec<StoredProduct>,
}

impl RunRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_declared(&self, kind: Kind, label: &str) -> bool {
        self.declarations.iter().any(|d| d.kind == kind && d.label == label)
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn declared_kinds(&self) -> Vec<Kind> {
        self.declarations.iter().map(|d| d.kind).collect()
    }

    pub fn get(&self, run: RunNumber, kind: Kind, label: &str) -> Option<&RunProduct> {
        self.products
            .iter()
            .find(|p| p.run == run && p.label == label && p.product.kind() == kind)
            .map(|p| &p.product)
    }

    pub fn products_for_run(&self, run: RunNumber) -> impl Iterator<Item = &StoredProduct> {
        self.products.iter().filter(move |p| p.run == run)
    }

    pub fn runs(&self) -> BTreeSet<RunNumber> {
        self.products.iter().map(|p| p.run).collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<(), ConverterError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConverterError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ProductSink for RunRecordStore {
    fn produces(&mut self, kind: Kind, label: &str) -> Result<(), SinkError> {
        if !self.products.is_empty() {
            return Err(SinkError::DeclarationsFrozen);
        }
        self.declarations.insert(Declaration {
            kind,
            label: label.to_string(),
        });
        Ok(())
    }

    fn put(&mut self, run: RunNumber, label: &str, product: RunProduct) -> Result<(), SinkError> {
        let kind = product.kind();
        if !self.is_declared(kind, label) {
            return Err(SinkError::Undeclared {
                kind,
                label: label.to_string(),
            });
        }
        let stored = self
            .products
            .iter_mut()
            .find(|p| p.run == run && p.label == label && p.product.kind() == kind);
        if let Some(stored) = stored {
            return stored.product.merge(product).map_err(|conflict| SinkError::Incompatible {
                kind,
                label: label.to_string(),
                run,
                conflict,
            });
        }
        self.products.push(StoredProduct {
            run,
            label: label.to_string(),
            product,
        });
        Ok(())
    }
}
