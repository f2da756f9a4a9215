//! Per-segment function value cursors

use std::fmt;

use crate::segment::DocId;
use crate::Result;

/// Numeric value of a function at one document
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumericValue {
    Int(i64),
    Float(f32),
}

impl NumericValue {
    pub fn as_f32(self) -> f32 {
        match self {
            NumericValue::Int(v) => v as f32,
            NumericValue::Float(v) => v,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            NumericValue::Int(v) => v as f64,
            NumericValue::Float(v) => v as f64,
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            NumericValue::Int(v) => v as i32,
            NumericValue::Float(v) => v as i32,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            NumericValue::Int(v) => v,
            NumericValue::Float(v) => v as i64,
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Int(v) => write!(f, "{}", v),
            NumericValue::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// Stateful reader mapping document ids of one segment to values
///
/// Cursors are created by `ValueSource::bind` and must not outlive the
/// segment evaluation they were bound for. Probing in ascending doc order is
/// cheapest; other orders are allowed but may force internal resets.
pub trait FunctionValues: Send {
    /// Value of the function at `doc`
    fn value_at(&mut self, doc: DocId) -> Result<NumericValue>;

    /// Human readable `description=value` rendering for `doc`
    fn value_string(&mut self, doc: DocId) -> Result<String>;

    fn float_val(&mut self, doc: DocId) -> Result<f32> {
        Ok(self.value_at(doc)?.as_f32())
    }

    fn double_val(&mut self, doc: DocId) -> Result<f64> {
        Ok(self.value_at(doc)?.as_f64())
    }

    fn int_val(&mut self, doc: DocId) -> Result<i32> {
        Ok(self.value_at(doc)?.as_i32())
    }

    fn long_val(&mut self, doc: DocId) -> Result<i64> {
        Ok(self.value_at(doc)?.as_i64())
    }

    /// Whether the function has a value for `doc`
    fn exists(&mut self, _doc: DocId) -> Result<bool> {
        Ok(true)
    }
}

/// Cursor returning the same value for every document
#[derive(Clone, Debug)]
pub struct ConstValues {
    value: NumericValue,
    description: String,
}

impl ConstValues {
    pub fn new(value: NumericValue, description: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
        }
    }
}

impl FunctionValues for ConstValues {
    fn value_at(&mut self, _doc: DocId) -> Result<NumericValue> {
        Ok(self.value)
    }

    fn value_string(&mut self, _doc: DocId) -> Result<String> {
        Ok(format!("{}={}", self.description, self.value))
    }
}
