//! Index-wide statistics of a term

use std::fmt;

use super::values::{ConstValues, FunctionValues, NumericValue};
use crate::segment::LeafContext;
use crate::Result;

/// A term as written by the user plus the form it was indexed under
///
/// Descriptions show `field`/`term`; postings lookups use the indexed form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexedTerm {
    pub field: String,
    pub term: String,
    pub indexed_field: String,
    pub indexed_term: String,
}

impl IndexedTerm {
    /// A term whose indexed form equals its external form
    pub fn new(field: impl Into<String>, term: impl Into<String>) -> Self {
        let field = field.into();
        let term = term.into();
        Self {
            indexed_field: field.clone(),
            indexed_term: term.clone(),
            field,
            term,
        }
    }

    /// A term whose analyzed form differs from the external one
    pub fn with_indexed(
        field: impl Into<String>,
        term: impl Into<String>,
        indexed_field: impl Into<String>,
        indexed_term: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
            indexed_field: indexed_field.into(),
            indexed_term: indexed_term.into(),
        }
    }
}

impl fmt::Display for IndexedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.term)
    }
}

/// Number of documents in the whole index containing the term
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocFreqValueSource {
    pub term: IndexedTerm,
}

impl DocFreqValueSource {
    pub fn new(term: IndexedTerm) -> Self {
        Self { term }
    }

    pub fn name(&self) -> &'static str {
        "docfreq"
    }

    pub fn description(&self) -> String {
        format!("{}({})", self.name(), self.term)
    }

    pub fn bind<'a>(&self, ctx: &LeafContext<'a>) -> Result<Box<dyn FunctionValues + 'a>> {
        let doc_freq = ctx
            .top
            .doc_freq(&self.term.indexed_field, &self.term.indexed_term)?;
        Ok(Box::new(ConstValues::new(
            NumericValue::Int(doc_freq as i64),
            self.description(),
        )))
    }
}

/// Total occurrences of the term across the whole index
///
/// Reports -1 when any segment indexed the field without frequencies.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TotalTermFreqValueSource {
    pub term: IndexedTerm,
}

impl TotalTermFreqValueSource {
    pub fn new(term: IndexedTerm) -> Self {
        Self { term }
    }

    pub fn name(&self) -> &'static str {
        "totaltermfreq"
    }

    pub fn description(&self) -> String {
        format!("{}({})", self.name(), self.term)
    }

    pub fn bind<'a>(&self, ctx: &LeafContext<'a>) -> Result<Box<dyn FunctionValues + 'a>> {
        let total = ctx
            .top
            .total_term_freq(&self.term.indexed_field, &self.term.indexed_term)?
            .map_or(-1, |total| total as i64);
        Ok(Box::new(ConstValues::new(
            NumericValue::Int(total),
            self.description(),
        )))
    }
}
