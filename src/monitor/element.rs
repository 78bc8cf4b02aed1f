use serde::{Deserialize, Serialize};

use super::histogram::{Hist1D, Hist2D, Hist3D, Profile1D, Profile2D};
use crate::kernel::kind::{Kind, KindCode};

/// Tags attached to a monitoring element (detector ids, quality flags...).
pub type TagList = Vec<u32>;

/// Binned payload of an object-kind element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeObject {
    Hist1D(Hist1D),
    Hist2D(Hist2D),
    Hist3D(Hist3D),
    Profile1D(Profile1D),
    Profile2D(Profile2D),
}

impl MeObject {
    pub fn kind(&self) -> Kind {
        match self {
            MeObject::Hist1D(_) => Kind::Hist1D,
            MeObject::Hist2D(_) => Kind::Hist2D,
            MeObject::Hist3D(_) => Kind::Hist3D,
            MeObject::Profile1D(_) => Kind::Profile1D,
            MeObject::Profile2D(_) => Kind::Profile2D,
        }
    }

    pub fn reset(&mut self) {
        match self {
            MeObject::Hist1D(h) => h.reset(),
            MeObject::Hist2D(h) => h.reset(),
            MeObject::Hist3D(h) => h.reset(),
            MeObject::Profile1D(p) => p.reset(),
            MeObject::Profile2D(p) => p.reset(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            MeObject::Hist1D(h) => h.is_empty(),
            MeObject::Hist2D(h) => h.is_empty(),
            MeObject::Hist3D(h) => h.is_empty(),
            MeObject::Profile1D(p) => p.is_empty(),
            MeObject::Profile2D(p) => p.is_empty(),
        }
    }
}

/// Value held by a monitoring element, one variant per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeValue {
    Int(i64),
    Float(f64),
    String(String),
    Object(MeObject),
}

impl MeValue {
    pub fn kind(&self) -> Kind {
        match self {
            MeValue::Int(_) => Kind::Int,
            MeValue::Float(_) => Kind::Float,
            MeValue::String(_) => Kind::String,
            MeValue::Object(obj) => obj.kind(),
        }
    }
}

impl From<Hist1D> for MeValue {
    fn from(h: Hist1D) -> Self {
        MeValue::Object(MeObject::Hist1D(h))
    }
}

impl From<Hist2D> for MeValue {
    fn from(h: Hist2D) -> Self {
        MeValue::Object(MeObject::Hist2D(h))
    }
}

impl From<Hist3D> for MeValue {
    fn from(h: Hist3D) -> Self {
        MeValue::Object(MeObject::Hist3D(h))
    }
}

impl From<Profile1D> for MeValue {
    fn from(p: Profile1D) -> Self {
        MeValue::Object(MeObject::Profile1D(p))
    }
}

impl From<Profile2D> for MeValue {
    fn from(p: Profile2D) -> Self {
        MeValue::Object(MeObject::Profile2D(p))
    }
}

/// Handle to one element living in a monitoring-element store.
///
/// Object kinds follow a two-step protocol: `snapshot()` returns an owned copy
/// of the payload, then `reset()` clears the source. A snapshot never aliases
/// the store, so the reset cannot alter data that was already captured.
pub trait MonitorElement {
    /// Directory part of the path, e.g. `Tracking/Hits`.
    fn pathname(&self) -> &str;

    fn name(&self) -> &str;

    fn full_name(&self) -> String {
        if self.pathname().is_empty() {
            self.name().to_string()
        } else {
            format!("{}/{}", self.pathname(), self.name())
        }
    }

    /// First path segment.
    fn package(&self) -> &str {
        self.pathname().split('/').next().unwrap_or("")
    }

    fn kind_code(&self) -> KindCode;

    fn tags(&self) -> TagList;

    fn int_value(&self) -> Option<i64>;
    fn float_value(&self) -> Option<f64>;
    fn string_value(&self) -> Option<String>;

    fn snapshot(&self) -> Option<MeObject>;

    fn reset(&mut self);
}

/// Element owned by [`super::store::InMemoryMonitorStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredElement {
    pub pathname: String,
    pub name: String,
    pub kind: KindCode,
    #[serde(default)]
    pub tags: TagList,
    pub value: MeValue,
}

impl StoredElement {
    pub fn new(pathname: &str, name: &str, value: impl Into<MeValue>) -> Self {
        let value = value.into();
        Self {
            pathname: pathname.to_string(),
            name: name.to_string(),
            kind: value.kind().code(),
            tags: Vec::new(),
            value,
        }
    }

    pub fn int(pathname: &str, name: &str, v: i64) -> Self {
        Self::new(pathname, name, MeValue::Int(v))
    }

    pub fn float(pathname: &str, name: &str, v: f64) -> Self {
        Self::new(pathname, name, MeValue::Float(v))
    }

    pub fn string(pathname: &str, name: &str, v: &str) -> Self {
        Self::new(pathname, name, MeValue::String(v.to_string()))
    }

    pub fn with_tags(mut self, tags: &[u32]) -> Self {
        self.tags = tags.to_vec();
        self
    }

    /// Override the reported kind code. Stores in the wild can hand out codes
    /// the converter does not recognise.
    pub fn with_kind_code(mut self, code: KindCode) -> Self {
        self.kind = code;
        self
    }

    pub fn object(&self) -> Option<&MeObject> {
        match &self.value {
            MeValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn object_mut(&mut self) -> Option<&mut MeObject> {
        match &mut self.value {
            MeValue::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl MonitorElement for StoredElement {
    fn pathname(&self) -> &str {
        &self.pathname
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind_code(&self) -> KindCode {
        self.kind
    }

    fn tags(&self) -> TagList {
        self.tags.clone()
    }

    fn int_value(&self) -> Option<i64> {
        match self.value {
            MeValue::Int(v) => Some(v),
            _ => None,
        }
    }

    fn float_value(&self) -> Option<f64> {
        match self.value {
            MeValue::Float(v) => Some(v),
            _ => None,
        }
    }

    fn string_value(&self) -> Option<String> {
        match &self.value {
            MeValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn snapshot(&self) -> Option<MeObject> {
        self.object().cloned()
    }

    fn reset(&mut self) {
        // Scalars keep their value; only binned payloads accumulate across runs.
        if let Some(obj) = self.object_mut() {
            obj.reset();
        }
    }
}
