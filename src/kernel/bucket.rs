use tracing::info;

use super::kind::{Kind, KindCounts};
use crate::error::ElementError;
use crate::monitor::{Hist1D, Hist2D, Hist3D, MeObject, MonitorElement, Profile1D, Profile2D, TagList};
use crate::output::{MeToEdm, RunProduct};

/// Per-kind accumulator of (name, tags, value) triples.
#[derive(Debug, Clone)]
pub struct KindBucket<T> {
    names: Vec<String>,
    tags: Vec<TagList>,
    objects: Vec<T>,
}

impl<T> Default for KindBucket<T> {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            tags: Vec::new(),
            objects: Vec::new(),
        }
    }
}

impl<T> KindBucket<T> {
    pub fn push(&mut self, name: String, tags: TagList, object: T) {
        self.names.push(name);
        self.tags.push(tags);
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Moves the three sequences into a run product.
    pub fn into_container(self) -> MeToEdm<T> {
        MeToEdm::from_parts(self.names, self.tags, self.objects)
    }
}

/// The buckets of one run end. Built fresh, filled, turned into products,
/// dropped.
#[derive(Debug, Default)]
pub struct RunBuckets {
    pub ints: KindBucket<i64>,
    pub floats: KindBucket<f64>,
    pub strings: KindBucket<String>,
    pub hist1d: KindBucket<Hist1D>,
    pub hist2d: KindBucket<Hist2D>,
    pub hist3d: KindBucket<Hist3D>,
    pub profile1d: KindBucket<Profile1D>,
    pub profile2d: KindBucket<Profile2D>,
}

impl RunBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy one element into its bucket.
    ///
    /// Object kinds are snapshotted by value. The element itself is left
    /// untouched; the caller resets it once the product holding the snapshot
    /// has been stored. Nothing is appended when the element fails.
    pub fn classify(&mut self, me: &dyn MonitorElement, verbosity: i32) -> Result<Kind, ElementError> {
        let name = me.full_name();
        let kind = Kind::resolve(me.kind_code(), &name)?;
        let missing = || ElementError::MissingValue {
            path: name.clone(),
            kind,
        };

        if verbosity > 1 {
            info!(name = %name, %kind, "extracting monitoring element");
        }

        match kind {
            Kind::Int => {
                let v = me.int_value().ok_or_else(missing)?;
                if verbosity > 1 {
                    info!(value = v, "scalar value");
                }
                self.ints.push(name.clone(), me.tags(), v);
            }
            Kind::Float => {
                let v = me.float_value().ok_or_else(missing)?;
                if verbosity > 1 {
                    info!(value = v, "scalar value");
                }
                self.floats.push(name.clone(), me.tags(), v);
            }
            Kind::String => {
                let v = me.string_value().ok_or_else(missing)?;
                if verbosity > 1 {
                    info!(value = %v, "scalar value");
                }
                self.strings.push(name.clone(), me.tags(), v);
            }
            Kind::Hist1D | Kind::Hist2D | Kind::Hist3D | Kind::Profile1D | Kind::Profile2D => {
                let object = me.snapshot().ok_or_else(missing)?;
                let tags = me.tags();
                match (kind, object) {
                    (Kind::Hist1D, MeObject::Hist1D(h)) => self.hist1d.push(name.clone(), tags, h),
                    (Kind::Hist2D, MeObject::Hist2D(h)) => self.hist2d.push(name.clone(), tags, h),
                    (Kind::Hist3D, MeObject::Hist3D(h)) => self.hist3d.push(name.clone(), tags, h),
                    (Kind::Profile1D, MeObject::Profile1D(p)) => self.profile1d.push(name.clone(), tags, p),
                    (Kind::Profile2D, MeObject::Profile2D(p)) => self.profile2d.push(name.clone(), tags, p),
                    _ => return Err(missing()),
                }
            }
        }

        Ok(kind)
    }

    pub fn len(&self, kind: Kind) -> usize {
        match kind {
            Kind::Int => self.ints.len(),
            Kind::Float => self.floats.len(),
            Kind::String => self.strings.len(),
            Kind::Hist1D => self.hist1d.len(),
            Kind::Hist2D => self.hist2d.len(),
            Kind::Hist3D => self.hist3d.len(),
            Kind::Profile1D => self.profile1d.len(),
            Kind::Profile2D => self.profile2d.len(),
        }
    }

    pub fn counts(&self) -> KindCounts {
        let mut counts = KindCounts::new();
        for kind in Kind::ALL {
            counts.add(kind, self.len(kind));
        }
        counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }

    /// One product per non-empty bucket. Consumes the arena.
    pub fn into_products(self) -> Vec<RunProduct> {
        fn take<T>(bucket: KindBucket<T>, wrap: fn(MeToEdm<T>) -> RunProduct, out: &mut Vec<RunProduct>) {
            if !bucket.is_empty() {
                out.push(wrap(bucket.into_container()));
            }
        }

        let mut out = Vec::new();
        take(self.hist1d, RunProduct::Hist1D, &mut out);
        take(self.hist2d, RunProduct::Hist2D, &mut out);
        take(self.hist3d, RunProduct::Hist3D, &mut out);
        take(self.profile1d, RunProduct::Profile1D, &mut out);
        take(self.profile2d, RunProduct::Profile2D, &mut out);
        take(self.floats, RunProduct::Float, &mut out);
        take(self.ints, RunProduct::Int, &mut out);
        take(self.strings, RunProduct::String, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::kind::KindCode;
    use crate::monitor::{Axis, StoredElement};

    #[test]
    fn sequences_stay_aligned() {
        let mut buckets = RunBuckets::new();
        let a = StoredElement::int("A", "x", 1).with_tags(&[3]);
        let b = StoredElement::int("A", "y", 2);
        buckets.classify(&a, 0).unwrap();
        buckets.classify(&b, 0).unwrap();

        let products = buckets.into_products();
        assert_eq!(products.len(), 1);
        let ints = products[0].as_int().unwrap();
        assert_eq!(ints.names(), ["A/x", "A/y"]);
        assert_eq!(ints.tags(), [vec![3u32], Vec::<u32>::new()]);
        assert_eq!(ints.objects(), [1i64, 2]);
    }

    #[test]
    fn unrecognised_kind_appends_nothing() {
        let mut buckets = RunBuckets::new();
        let me = StoredElement::int("A", "x", 1).with_kind_code(KindCode(0x77));
        assert!(matches!(
            buckets.classify(&me, 0),
            Err(ElementError::UnrecognizedKind { .. })
        ));
        assert!(buckets.is_empty());
    }

    #[test]
    fn snapshot_leaves_source_filled() {
        let mut h = Hist1D::new("pt", Axis::new(4, 0.0, 4.0));
        h.fill(1.0, 1.0);
        let me = StoredElement::new("A", "pt", h.clone());

        let mut buckets = RunBuckets::new();
        assert_eq!(buckets.classify(&me, 0), Ok(Kind::Hist1D));
        assert_eq!(me.object(), Some(&MeObject::Hist1D(h.clone())));

        let products = buckets.into_products();
        assert_eq!(products[0].as_hist1d().unwrap().objects(), [h]);
    }

    #[test]
    fn mismatched_payload_is_not_reset() {
        let mut h = Hist1D::new("pt", Axis::new(4, 0.0, 4.0));
        h.fill(1.0, 1.0);
        let me = StoredElement::new("A", "pt", h).with_kind_code(Kind::Hist2D.code());

        let mut buckets = RunBuckets::new();
        let err = buckets.classify(&me, 0).unwrap_err();
        assert_eq!(
            err,
            ElementError::MissingValue {
                path: "A/pt".to_string(),
                kind: Kind::Hist2D
            }
        );
        assert!(!me.object().unwrap().is_empty());
        assert!(buckets.is_empty());
    }
}
