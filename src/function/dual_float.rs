//! Functions combining two child values with a binary float operation

use serde::{Deserialize, Serialize};

use super::source::ValueSource;
use super::values::{FunctionValues, NumericValue};
use crate::segment::{DocId, LeafContext};
use crate::Result;

/// Binary float operation applied by a `DualFloatFunction`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DualFloatOp {
    /// Raise `a` to the power `b`
    Pow,
    /// Divide `a` by `b`
    Div,
}

impl DualFloatOp {
    pub fn name(self) -> &'static str {
        match self {
            DualFloatOp::Pow => "pow",
            DualFloatOp::Div => "div",
        }
    }

    /// Apply the operation; non-finite results follow IEEE rules
    pub fn apply(self, a: f32, b: f32) -> f32 {
        match self {
            DualFloatOp::Pow => (a as f64).powf(b as f64) as f32,
            DualFloatOp::Div => a / b,
        }
    }
}

/// Function of two child sources, evaluated at the same document
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DualFloatFunction {
    op: DualFloatOp,
    a: Box<ValueSource>,
    b: Box<ValueSource>,
}

impl DualFloatFunction {
    pub fn new(op: DualFloatOp, a: ValueSource, b: ValueSource) -> Self {
        Self {
            op,
            a: Box::new(a),
            b: Box::new(b),
        }
    }

    /// `base ^ exponent`
    pub fn pow(base: ValueSource, exponent: ValueSource) -> Self {
        Self::new(DualFloatOp::Pow, base, exponent)
    }

    /// `dividend / divisor`
    pub fn div(dividend: ValueSource, divisor: ValueSource) -> Self {
        Self::new(DualFloatOp::Div, dividend, divisor)
    }

    pub fn op(&self) -> DualFloatOp {
        self.op
    }

    pub fn a(&self) -> &ValueSource {
        &self.a
    }

    pub fn b(&self) -> &ValueSource {
        &self.b
    }

    pub fn name(&self) -> &'static str {
        self.op.name()
    }

    pub fn description(&self) -> String {
        format!(
            "{}({},{})",
            self.name(),
            self.a.description(),
            self.b.description()
        )
    }

    pub fn bind<'a>(&self, ctx: &LeafContext<'a>) -> Result<Box<dyn FunctionValues + 'a>> {
        Ok(Box::new(DualFloatValues {
            op: self.op,
            a: self.a.bind(ctx)?,
            b: self.b.bind(ctx)?,
        }))
    }
}

struct DualFloatValues<'a> {
    op: DualFloatOp,
    a: Box<dyn FunctionValues + 'a>,
    b: Box<dyn FunctionValues + 'a>,
}

impl FunctionValues for DualFloatValues<'_> {
    fn value_at(&mut self, doc: DocId) -> Result<NumericValue> {
        let a = self.a.float_val(doc)?;
        let b = self.b.float_val(doc)?;
        Ok(NumericValue::Float(self.op.apply(a, b)))
    }

    fn value_string(&mut self, doc: DocId) -> Result<String> {
        Ok(format!(
            "{}({},{})",
            self.op.name(),
            self.a.value_string(doc)?,
            self.b.value_string(doc)?
        ))
    }

    fn exists(&mut self, doc: DocId) -> Result<bool> {
        // Both children are probed, even when `a` has no value
        let a = self.a.exists(doc)?;
        let b = self.b.exists(doc)?;
        Ok(a & b)
    }
}
