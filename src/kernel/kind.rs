use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::ElementError;

/// Raw kind code as reported by a monitoring-element store.
/// Only the codes listed in [`Kind::code`] are recognised; anything else is
/// classified as an element error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindCode(pub u32);

impl KindCode {
    pub const INVALID: KindCode = KindCode(0x00);
}

impl fmt::Display for KindCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// The closed set of payload kinds the converter knows how to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
    Int,
    Float,
    String,
    Hist1D,
    Hist2D,
    Hist3D,
    Profile1D,
    Profile2D,
}

impl Kind {
    pub const COUNT: usize = 8;

    pub const ALL: [Kind; Kind::COUNT] = [
        Kind::Int,
        Kind::Float,
        Kind::String,
        Kind::Hist1D,
        Kind::Hist2D,
        Kind::Hist3D,
        Kind::Profile1D,
        Kind::Profile2D,
    ];

    /// Store-side code for this kind.
    pub fn code(self) -> KindCode {
        match self {
            Kind::Int => KindCode(0x01),
            Kind::Float => KindCode(0x02),
            Kind::String => KindCode(0x03),
            Kind::Hist1D => KindCode(0x10),
            Kind::Hist2D => KindCode(0x20),
            Kind::Hist3D => KindCode(0x30),
            Kind::Profile1D => KindCode(0x40),
            Kind::Profile2D => KindCode(0x41),
        }
    }

    pub fn from_code(code: KindCode) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Resolve the kind of an element, naming the element if the code is unknown.
    pub fn resolve(code: KindCode, path: &str) -> Result<Kind, ElementError> {
        Kind::from_code(code).ok_or_else(|| ElementError::UnrecognizedKind {
            path: path.to_string(),
            code,
        })
    }

    /// Object kinds carry a binned payload and are reset after extraction.
    pub fn is_object(self) -> bool {
        !self.is_scalar()
    }

    pub fn is_scalar(self) -> bool {
        matches!(self, Kind::Int | Kind::Float | Kind::String)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Int => "Int",
            Kind::Float => "Float",
            Kind::String => "String",
            Kind::Hist1D => "Hist1D",
            Kind::Hist2D => "Hist2D",
            Kind::Hist3D => "Hist3D",
            Kind::Profile1D => "Profile1D",
            Kind::Profile2D => "Profile2D",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One counter per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts([usize; Kind::COUNT]);

impl KindCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, kind: Kind) {
        self.0[kind.index()] += 1;
    }

    pub fn add(&mut self, kind: Kind, n: usize) {
        self.0[kind.index()] += n;
    }

    pub fn get(&self, kind: Kind) -> usize {
        self.0[kind.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Kinds with at least one entry, in declaration order.
    pub fn present(&self) -> impl Iterator<Item = Kind> + '_ {
        Kind::ALL.into_iter().filter(move |kind| self.get(*kind) > 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Kind, usize)> + '_ {
        Kind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

impl Index<Kind> for KindCounts {
    type Output = usize;

    fn index(&self, kind: Kind) -> &usize {
        &self.0[kind.index()]
    }
}

impl IndexMut<Kind> for KindCounts {
    fn index_mut(&mut self, kind: Kind) -> &mut usize {
        &mut self.0[kind.index()]
    }
}
