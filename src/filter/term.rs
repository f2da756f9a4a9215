//! Term filter - documents whose postings contain an exact term

use std::fmt;

use super::{DocIdSet, Filter};
use crate::bitset::DocBitSet;
use crate::segment::{DocIdSetIterator, LeafContext};
use crate::Result;

/// Filter matching documents that contain `term` in `field`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TermFilter {
    /// Field to look up
    pub field: String,
    /// Exact (already analyzed) term
    pub term: String,
}

impl TermFilter {
    pub fn new(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
        }
    }
}

impl fmt::Display for TermFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.term)
    }
}

impl Filter for TermFilter {
    fn doc_id_set<'a>(
        &self,
        ctx: &LeafContext<'a>,
        accept_docs: Option<&DocBitSet>,
    ) -> Result<Option<DocIdSet<'a>>> {
        let Some(postings) = ctx.reader.postings(&self.field, &self.term)? else {
            return Ok(None);
        };
        let mut iter: Box<dyn DocIdSetIterator + 'a> = Box::new(postings);
        match accept_docs {
            None => Ok(Some(DocIdSet::Iterator(iter))),
            Some(accept) => {
                let mut bits = DocBitSet::new(ctx.max_doc());
                bits.or_iter(&mut *iter)?;
                Ok(Some(DocIdSet::Bits(bits.masked(Some(accept)))))
            }
        }
    }
}
