//! Filter clauses and occurrence kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::Filter;

/// Boolean role of a clause within a `BooleanFilter`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    /// Required: documents must match (intersection)
    Must,
    /// Excluded: matching documents are removed (difference)
    MustNot,
    /// Optional: at least one should clause must match (union)
    Should,
}

impl fmt::Display for Occur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occur::Must => write!(f, "+"),
            Occur::MustNot => write!(f, "-"),
            Occur::Should => Ok(()),
        }
    }
}

/// A filter paired with its occurrence kind
#[derive(Clone, Debug, Hash)]
pub struct FilterClause {
    pub filter: Arc<dyn Filter>,
    pub occur: Occur,
}

impl FilterClause {
    pub fn new(filter: Arc<dyn Filter>, occur: Occur) -> Self {
        Self { filter, occur }
    }
}

// Compared through the pointee; `==` on `Arc<dyn Filter>` would try to move the Arc
impl PartialEq for FilterClause {
    fn eq(&self, other: &Self) -> bool {
        self.occur == other.occur && *self.filter == *other.filter
    }
}

impl Eq for FilterClause {}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.occur, self.filter)
    }
}
