use serde::{Deserialize, Serialize};

use crate::error::MergeConflict;
use crate::kernel::kind::Kind;
use crate::monitor::{Hist1D, Hist2D, Hist3D, Profile1D, Profile2D, TagList};

/// How a later entry for the same element folds into a stored one.
///
/// Binned payloads add up; scalars take the later value.
pub trait Accumulate {
    fn compatible(&self, _other: &Self) -> bool {
        true
    }

    fn accumulate(&mut self, other: Self);
}

impl Accumulate for i64 {
    fn accumulate(&mut self, other: Self) {
        *self = other;
    }
}

impl Accumulate for f64 {
    fn accumulate(&mut self, other: Self) {
        *self = other;
    }
}

impl Accumulate for String {
    fn accumulate(&mut self, other: Self) {
        *self = other;
    }
}

macro_rules! binned_accumulate {
    ($($ty:ty),*) => {
        $(
            impl Accumulate for $ty {
                fn compatible(&self, other: &Self) -> bool {
                    self.same_binning(other)
                }

                fn accumulate(&mut self, other: Self) {
                    self.add(&other);
                }
            }
        )*
    };
}

binned_accumulate!(Hist1D, Hist2D, Hist3D, Profile1D, Profile2D);

/// Persistent run product: three parallel sequences describing every element of
/// one kind at the end of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeToEdm<T> {
    names: Vec<String>,
    tags: Vec<TagList>,
    objects: Vec<T>,
}

impl<T> MeToEdm<T> {
    /// Takes ownership of the three sequences; they must have equal length.
    pub fn from_parts(names: Vec<String>, tags: Vec<TagList>, objects: Vec<T>) -> Self {
        debug_assert_eq!(names.len(), tags.len());
        debug_assert_eq!(names.len(), objects.len());
        Self { names, tags, objects }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn tags(&self) -> &[TagList] {
        &self.tags
    }

    pub fn objects(&self) -> &[T] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entry for one element, by full name.
    pub fn find(&self, name: &str) -> Option<(&TagList, &T)> {
        let i = self.names.iter().position(|n| n == name)?;
        Some((&self.tags[i], &self.objects[i]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TagList, &T)> {
        self.names
            .iter()
            .zip(self.tags.iter())
            .zip(self.objects.iter())
            .map(|((n, t), o)| (n, t, o))
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<TagList>, Vec<T>) {
        (self.names, self.tags, self.objects)
    }
}

impl<T: Accumulate> MeToEdm<T> {
    /// Fold `other` into this product: known names accumulate, new names are
    /// appended. Nothing changes unless every entry can be merged.
    pub fn merge(&mut self, other: MeToEdm<T>) -> Result<(), MergeConflict> {
        for (name, _, object) in other.iter() {
            if let Some((_, stored)) = self.find(name) {
                if !stored.compatible(object) {
                    return Err(MergeConflict::Binning { name: name.clone() });
                }
            }
        }

        let (names, tags, objects) = other.into_parts();
        for ((name, tags), object) in names.into_iter().zip(tags).zip(objects) {
            match self.names.iter().position(|n| *n == name) {
                Some(i) => {
                    self.tags[i] = tags;
                    self.objects[i].accumulate(object);
                }
                None => {
                    self.names.push(name);
                    self.tags.push(tags);
                    self.objects.push(object);
                }
            }
        }
        Ok(())
    }
}

/// A run product of any kind, as handed to a [`super::ProductSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunProduct {
    Int(MeToEdm<i64>),
    Float(MeToEdm<f64>),
    String(MeToEdm<String>),
    Hist1D(MeToEdm<Hist1D>),
    Hist2D(MeToEdm<Hist2D>),
    Hist3D(MeToEdm<Hist3D>),
    Profile1D(MeToEdm<Profile1D>),
    Profile2D(MeToEdm<Profile2D>),
}

impl RunProduct {
    pub fn kind(&self) -> Kind {
        match self {
            RunProduct::Int(_) => Kind::Int,
            RunProduct::Float(_) => Kind::Float,
            RunProduct::String(_) => Kind::String,
            RunProduct::Hist1D(_) => Kind::Hist1D,
            RunProduct::Hist2D(_) => Kind::Hist2D,
            RunProduct::Hist3D(_) => Kind::Hist3D,
            RunProduct::Profile1D(_) => Kind::Profile1D,
            RunProduct::Profile2D(_) => Kind::Profile2D,
        }
    }

    pub fn names(&self) -> &[String] {
        match self {
            RunProduct::Int(p) => p.names(),
            RunProduct::Float(p) => p.names(),
            RunProduct::String(p) => p.names(),
            RunProduct::Hist1D(p) => p.names(),
            RunProduct::Hist2D(p) => p.names(),
            RunProduct::Hist3D(p) => p.names(),
            RunProduct::Profile1D(p) => p.names(),
            RunProduct::Profile2D(p) => p.names(),
        }
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    /// Merge a product of the same kind into this one.
    pub fn merge(&mut self, other: RunProduct) -> Result<(), MergeConflict> {
        match (self, other) {
            (RunProduct::Int(a), RunProduct::Int(b)) => a.merge(b),
            (RunProduct::Float(a), RunProduct::Float(b)) => a.merge(b),
            (RunProduct::String(a), RunProduct::String(b)) => a.merge(b),
            (RunProduct::Hist1D(a), RunProduct::Hist1D(b)) => a.merge(b),
            (RunProduct::Hist2D(a), RunProduct::Hist2D(b)) => a.merge(b),
            (RunProduct::Hist3D(a), RunProduct::Hist3D(b)) => a.merge(b),
            (RunProduct::Profile1D(a), RunProduct::Profile1D(b)) => a.merge(b),
            (RunProduct::Profile2D(a), RunProduct::Profile2D(b)) => a.merge(b),
            (stored, incoming) => Err(MergeConflict::KindMismatch {
                stored: stored.kind(),
                incoming: incoming.kind(),
            }),
        }
    }

    pub fn as_int(&self) -> Option<&MeToEdm<i64>> {
        match self {
            RunProduct::Int(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&MeToEdm<f64>> {
        match self {
            RunProduct::Float(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&MeToEdm<String>> {
        match self {
            RunProduct::String(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_hist1d(&self) -> Option<&MeToEdm<Hist1D>> {
        match self {
            RunProduct::Hist1D(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_hist2d(&self) -> Option<&MeToEdm<Hist2D>> {
        match self {
            RunProduct::Hist2D(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_hist3d(&self) -> Option<&MeToEdm<Hist3D>> {
        match self {
            RunProduct::Hist3D(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_profile1d(&self) -> Option<&MeToEdm<Profile1D>> {
        match self {
            RunProduct::Profile1D(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_profile2d(&self) -> Option<&MeToEdm<Profile2D>> {
        match self {
            RunProduct::Profile2D(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::Axis;

    fn hist(bins: usize, fills: &[f64]) -> Hist1D {
        let mut h = Hist1D::new("pt", Axis::new(bins, 0.0, 4.0));
        for x in fills {
            h.fill(*x, 1.0);
        }
        h
    }

    fn product(entries: Vec<(&str, Hist1D)>) -> MeToEdm<Hist1D> {
        let names = entries.iter().map(|(n, _)| n.to_string()).collect::<Vec<_>>();
        let tags = vec![Vec::new(); names.len()];
        let objects = entries.into_iter().map(|(_, h)| h).collect();
        MeToEdm::from_parts(names, tags, objects)
    }

    #[test]
    fn merge_adds_known_names_and_appends_new_ones() {
        let mut stored = product(vec![("A/pt", hist(4, &[0.5]))]);
        let later = product(vec![("A/pt", hist(4, &[0.5, 2.5])), ("A/eta", hist(4, &[1.5]))]);

        stored.merge(later).unwrap();

        assert_eq!(stored.names(), ["A/pt", "A/eta"]);
        assert_eq!(stored.objects()[0].entries, 3);
        assert_eq!(stored.objects()[0].bin_content(1), 2.0);
        assert_eq!(stored.objects()[1].entries, 1);
    }

    #[test]
    fn merge_with_other_binning_changes_nothing() {
        let mut stored = product(vec![("A/pt", hist(4, &[0.5]))]);
        let before = stored.clone();
        let later = product(vec![("A/eta", hist(4, &[1.5])), ("A/pt", hist(2, &[0.5]))]);

        assert_eq!(
            stored.merge(later),
            Err(MergeConflict::Binning { name: "A/pt".to_string() })
        );
        assert_eq!(stored, before);
    }

    #[test]
    fn scalars_take_the_later_value() {
        let mut stored = RunProduct::Int(MeToEdm::from_parts(vec!["A/n".to_string()], vec![vec![]], vec![3i64]));
        let later = RunProduct::Int(MeToEdm::from_parts(vec!["A/n".to_string()], vec![vec![1]], vec![5i64]));

        stored.merge(later).unwrap();
        let ints = stored.as_int().unwrap();
        assert_eq!(ints.objects(), [5i64]);
        assert_eq!(ints.tags(), [vec![1u32]]);

        let floats = RunProduct::Float(MeToEdm::from_parts(vec!["A/f".to_string()], vec![vec![]], vec![1.0]));
        assert!(matches!(stored.merge(floats), Err(MergeConflict::KindMismatch { .. })));
    }
}
