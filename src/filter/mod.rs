//! Document filters
//!
//! A filter produces, for one segment, the set of documents it matches. Filters
//! are immutable and may be evaluated on many segments concurrently; all
//! per-evaluation state lives in the returned `DocIdSet`.
//!
//! Filters compare and hash structurally, so two independently built but
//! equal filters are interchangeable as cache keys.

mod boolean;
mod cache;
mod clause;
mod term;

pub use boolean::BooleanFilter;
pub use cache::{CachedFilter, FilterCache};
pub use clause::{FilterClause, Occur};
pub use term::TermFilter;

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::bitset::DocBitSet;
use crate::segment::{DocIdSetIterator, LeafContext};
use crate::Result;

/// Documents matched by a filter within one segment
pub enum DocIdSet<'a> {
    /// Lazily produced ascending doc ids
    Iterator(Box<dyn DocIdSetIterator + 'a>),
    /// Fully materialized bitset
    Bits(DocBitSet),
}

impl<'a> DocIdSet<'a> {
    pub fn into_iterator(self) -> Box<dyn DocIdSetIterator + 'a> {
        match self {
            DocIdSet::Iterator(iter) => iter,
            DocIdSet::Bits(bits) => Box::new(bits.into_iterator()),
        }
    }

    /// Materialize into a bitset sized for `max_doc` documents
    pub fn into_bits(self, max_doc: u32) -> Result<DocBitSet> {
        match self {
            DocIdSet::Bits(bits) => Ok(bits),
            DocIdSet::Iterator(mut iter) => {
                let mut bits = DocBitSet::new(max_doc);
                bits.or_iter(&mut *iter)?;
                Ok(bits)
            }
        }
    }
}

impl fmt::Debug for DocIdSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocIdSet::Iterator(iter) => f
                .debug_struct("Iterator")
                .field("cost", &iter.cost())
                .finish(),
            DocIdSet::Bits(bits) => f.debug_tuple("Bits").field(bits).finish(),
        }
    }
}

/// Structural equality and hashing for filter trait objects
///
/// Implemented for every `PartialEq + Hash` type; filters never implement it by hand.
pub trait FilterEq: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_filter(&self, other: &dyn Any) -> bool;
    fn hash_filter(&self, state: &mut dyn Hasher);
}

impl<T: Any + PartialEq + Hash + Send + Sync> FilterEq for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_filter(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn hash_filter(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

/// Core trait for document filters
pub trait Filter: FilterEq + fmt::Display + fmt::Debug {
    /// Documents of the segment matched by this filter
    ///
    /// Returns `Ok(None)` when nothing matches; implementations should prefer
    /// that over an empty set whenever they can tell cheaply. Matches are
    /// restricted to `accept_docs` when given.
    fn doc_id_set<'a>(
        &self,
        ctx: &LeafContext<'a>,
        accept_docs: Option<&DocBitSet>,
    ) -> Result<Option<DocIdSet<'a>>>;
}

impl PartialEq for dyn Filter {
    fn eq(&self, other: &Self) -> bool {
        self.eq_filter(other.as_any())
    }
}

impl Eq for dyn Filter {}

impl Hash for dyn Filter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_filter(state);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Filter over a fixed list of documents; empty lists match nothing
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct DocsFilter {
        pub name: &'static str,
        pub docs: Vec<u32>,
    }

    impl DocsFilter {
        pub fn new(name: &'static str, docs: &[u32]) -> Self {
            Self {
                name,
                docs: docs.to_vec(),
            }
        }
    }

    impl fmt::Display for DocsFilter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.name)
        }
    }

    impl Filter for DocsFilter {
        fn doc_id_set<'a>(
            &self,
            ctx: &LeafContext<'a>,
            accept_docs: Option<&DocBitSet>,
        ) -> Result<Option<DocIdSet<'a>>> {
            if self.docs.is_empty() {
                return Ok(None);
            }
            let bits = DocBitSet::from_docs(ctx.max_doc(), self.docs.iter().copied());
            Ok(Some(DocIdSet::Bits(bits.masked(accept_docs))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::DocsFilter;
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::sync::Arc;

    fn hash_of(filter: &dyn Filter) -> u64 {
        let mut hasher = DefaultHasher::new();
        filter.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_structural_equality() {
        let a: Arc<dyn Filter> = Arc::new(TermFilter::new("body", "rust"));
        let b: Arc<dyn Filter> = Arc::new(TermFilter::new("body", "rust"));
        let c: Arc<dyn Filter> = Arc::new(TermFilter::new("body", "go"));

        assert!(*a == *b);
        assert!(*a != *c);
        assert_eq!(hash_of(a.as_ref()), hash_of(b.as_ref()));
    }

    #[test]
    fn test_different_types_never_equal() {
        let term: Arc<dyn Filter> = Arc::new(TermFilter::new("body", "rust"));
        let docs: Arc<dyn Filter> = Arc::new(DocsFilter::new("body:rust", &[1]));
        assert!(*term != *docs);
    }

    #[test]
    fn test_doc_id_set_into_bits() {
        let set = DocIdSet::Bits(DocBitSet::from_docs(4, [1, 2]));
        let bits = set.into_bits(4).unwrap();
        assert_eq!(bits.iter().collect::<Vec<_>>(), vec![1, 2]);

        let iter = DocIdSet::Iterator(Box::new(DocBitSet::from_docs(4, [3]).into_iterator()));
        assert_eq!(iter.into_bits(4).unwrap().iter().collect::<Vec<_>>(), vec![3]);
    }
}
