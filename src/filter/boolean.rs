//! Boolean filter - combines sub-filters with SHOULD, MUST_NOT and MUST semantics

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::clause::{FilterClause, Occur};
use super::{DocIdSet, Filter};
use crate::bitset::DocBitSet;
use crate::segment::{DocIdSetIterator, LeafContext};
use crate::Result;

/// Boolean composition of filters
///
/// The result bitset is built in three passes over the clauses:
/// - `should` clauses are OR'd together
/// - the result is AND-NOT'd with the `must_not` clauses
/// - the result is AND'd with the `must` clauses
///
/// The acceptable-documents mask is applied once to the final bitset rather
/// than to every clause.
///
/// # Example
///
/// ```
/// use squidex_queries::filter::{BooleanFilter, TermFilter};
///
/// let filter = BooleanFilter::new()
///     .should(TermFilter::new("tags", "rust"))
///     .should(TermFilter::new("tags", "go"))
///     .must_not(TermFilter::new("status", "draft"));
///
/// assert_eq!(filter.to_string(), "BooleanFilter(tags:rust tags:go -status:draft)");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BooleanFilter {
    clauses: Vec<FilterClause>,
}

impl BooleanFilter {
    /// Create a filter with no clauses; it matches nothing until clauses are added
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Append a clause
    pub fn add(&mut self, clause: FilterClause) {
        self.clauses.push(clause);
    }

    /// Append a shared filter with the given occurrence kind
    pub fn add_filter(&mut self, filter: Arc<dyn Filter>, occur: Occur) {
        self.add(FilterClause::new(filter, occur));
    }

    /// Add a must clause
    pub fn must(mut self, filter: impl Filter) -> Self {
        self.add_filter(Arc::new(filter), Occur::Must);
        self
    }

    /// Add a must_not clause
    pub fn must_not(mut self, filter: impl Filter) -> Self {
        self.add_filter(Arc::new(filter), Occur::MustNot);
        self
    }

    /// Add a should clause
    pub fn should(mut self, filter: impl Filter) -> Self {
        self.add_filter(Arc::new(filter), Occur::Should);
        self
    }

    /// Clauses in insertion order
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterClause> {
        self.clauses.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    fn clauses_with(&self, occur: Occur) -> impl Iterator<Item = &FilterClause> + '_ {
        self.clauses.iter().filter(move |c| c.occur == occur)
    }
}

/// Sub-filters are evaluated without the acceptable-documents mask
fn clause_iterator<'a>(
    clause: &FilterClause,
    ctx: &LeafContext<'a>,
) -> Result<Option<Box<dyn DocIdSetIterator + 'a>>> {
    Ok(clause
        .filter
        .doc_id_set(ctx, None)?
        .map(DocIdSet::into_iterator))
}

impl Filter for BooleanFilter {
    fn doc_id_set<'a>(
        &self,
        ctx: &LeafContext<'a>,
        accept_docs: Option<&DocBitSet>,
    ) -> Result<Option<DocIdSet<'a>>> {
        let max_doc = ctx.max_doc();
        let mut res: Option<DocBitSet> = None;

        let mut has_should_clauses = false;
        for clause in self.clauses_with(Occur::Should) {
            has_should_clauses = true;
            let Some(mut iter) = clause_iterator(clause, ctx)? else {
                continue;
            };
            res.get_or_insert_with(|| DocBitSet::new(max_doc))
                .or_iter(&mut *iter)?;
        }
        if has_should_clauses && res.is_none() {
            debug!(segment = %ctx.reader.segment_id(), filter = %self, "no should clause matched");
            return Ok(None);
        }

        for clause in self.clauses_with(Occur::MustNot) {
            // May set bits on deleted docs; accept_docs removes them at the end
            let bits = res.get_or_insert_with(|| DocBitSet::full(max_doc));
            if let Some(mut iter) = clause_iterator(clause, ctx)? {
                bits.and_not_iter(&mut *iter)?;
            }
        }

        for clause in self.clauses_with(Occur::Must) {
            let Some(mut iter) = clause_iterator(clause, ctx)? else {
                debug!(
                    segment = %ctx.reader.segment_id(),
                    clause = %clause,
                    "must clause matched nothing"
                );
                return Ok(None);
            };
            match res.as_mut() {
                Some(bits) => bits.and_iter(&mut *iter)?,
                None => {
                    let mut bits = DocBitSet::new(max_doc);
                    bits.or_iter(&mut *iter)?;
                    res = Some(bits);
                }
            }
        }

        Ok(res.map(|bits| DocIdSet::Bits(bits.masked(accept_docs))))
    }
}

impl<'a> IntoIterator for &'a BooleanFilter {
    type Item = &'a FilterClause;
    type IntoIter = std::slice::Iter<'a, FilterClause>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for BooleanFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BooleanFilter(")?;
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", clause)?;
        }
        write!(f, ")")
    }
}
