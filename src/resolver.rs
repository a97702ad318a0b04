//! Late-bound operand lookup used by functions that read a second named value.

use std::collections::HashMap;

use thiserror::Error;

use crate::value::{TypeTag, Value};

/// Failure to produce a named operand of the requested type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot resolve operand '{name}' as {expected}: {reason}")]
pub struct ResolutionError {
    pub name: String,
    pub expected: TypeTag,
    pub reason: String,
}

impl ResolutionError {
    pub fn new(name: impl Into<String>, expected: TypeTag, reason: impl Into<String>) -> Self {
        ResolutionError {
            name: name.into(),
            expected,
            reason: reason.into(),
        }
    }

    pub fn not_found(name: impl Into<String>, expected: TypeTag) -> Self {
        Self::new(name, expected, "no such operand")
    }
}

/// Caller-supplied source of named operands.
///
/// Resolution happens on every evaluation, so a resolver always hands out
/// the operand's current value.
pub trait OperandResolver {
    fn resolve(&self, name: &str, expected: TypeTag) -> Result<Value, ResolutionError>;
}

impl<F> OperandResolver for F
where
    F: Fn(&str, TypeTag) -> Result<Value, ResolutionError>,
{
    fn resolve(&self, name: &str, expected: TypeTag) -> Result<Value, ResolutionError> {
        self(name, expected)
    }
}

/// Resolver for functions that never look up operands.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOperands;

impl OperandResolver for NoOperands {
    fn resolve(&self, name: &str, expected: TypeTag) -> Result<Value, ResolutionError> {
        Err(ResolutionError::not_found(name, expected))
    }
}

/// Resolver over a fixed set of named values.
///
/// Numeric operands are widened to `double` when that is what the function
/// asks for; any other mismatch is a resolution error.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    operands: HashMap<String, Value>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.operands.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.operands.remove(name)
    }
}

impl OperandResolver for MapResolver {
    fn resolve(&self, name: &str, expected: TypeTag) -> Result<Value, ResolutionError> {
        let value = self
            .operands
            .get(name)
            .ok_or_else(|| ResolutionError::not_found(name, expected))?;

        if value.type_tag() == Some(expected) {
            return Ok(value.clone());
        }
        match (expected, value.as_f64()) {
            (TypeTag::Double, Some(n)) => Ok(Value::Double(n)),
            _ => Err(ResolutionError::new(
                name,
                expected,
                format!("operand holds {}", value.type_name()),
            )),
        }
    }
}
