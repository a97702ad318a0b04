//! # Function Library
//!
//! Every formula compiles to one [`AggregationFunction`]. A function owns
//! its running state exclusively and can be shared between threads: all
//! updates go through either a compare-and-swap retry loop (single-field
//! state) or a short critical section (state whose fields must move
//! together).
//!
//! | Formula | Type | Input | Output | State update |
//! |---------|------|-------|--------|--------------|
//! | `max()` / `min()` | [`ExtremumFunction`] | numeric | double | CAS |
//! | `sum(N, unit)` | [`SumFunction`] | numeric | double | lock |
//! | `avg(N, unit)` | [`AverageFunction`] | numeric | double | lock |
//! | `percentile(P, N, unit)` | [`PercentileFunction`] | numeric | double | lock |
//! | `correl($name)` | [`CorrelationFunction`] | numeric | double | lock |
//! | `extract_*(path..)` | [`ExtractFunction`] | composite | string / int / double | none |
//! | `flag()` | [`FlagFunction`] | bool | composite | lock |
//! | `gauge_*()` | [`GaugeFunction`] | numeric | composite | lock |
//!
//! Callers are expected to check [`AggregationFunction::can_accept`] before
//! wiring a source to a function. Passing an unaccepted value to `eval`
//! fails with [`EvalError::TypeMismatch`] and leaves the state untouched.

pub mod correlation;
pub mod extract;
pub mod extremum;
pub mod recorder;
pub mod windowed;

pub use correlation::CorrelationFunction;
pub use extract::{ExtractFunction, ExtractTarget};
pub use extremum::ExtremumFunction;
pub use recorder::{FlagFunction, GaugeFunction};
pub use windowed::{AverageFunction, PercentileFunction, SumFunction};

use std::fmt;

use thiserror::Error;

use crate::resolver::{NoOperands, OperandResolver, ResolutionError};
use crate::value::{TypeTag, Value};

/// Identity of a built-in function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Max,
    Min,
    Sum,
    Average,
    Percentile,
    Correlation,
    ExtractString,
    ExtractInt,
    ExtractDouble,
    Flag,
    GaugeFp,
    GaugeInt,
    RangedGaugeFp,
    RangedGaugeInt,
}

impl FunctionKind {
    /// Name used in formula text.
    pub fn name(self) -> &'static str {
        match self {
            FunctionKind::Max => "max",
            FunctionKind::Min => "min",
            FunctionKind::Sum => "sum",
            FunctionKind::Average => "avg",
            FunctionKind::Percentile => "percentile",
            FunctionKind::Correlation => "correl",
            FunctionKind::ExtractString => "extract_string",
            FunctionKind::ExtractInt => "extract_int",
            FunctionKind::ExtractDouble => "extract_double",
            FunctionKind::Flag => "flag",
            FunctionKind::GaugeFp => "gauge_fp",
            FunctionKind::GaugeInt => "gauge_int",
            FunctionKind::RangedGaugeFp => "ranged_gauge_fp",
            FunctionKind::RangedGaugeInt => "ranged_gauge_int",
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by a single evaluation step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Required argument was not passed
    #[error("{function}: missing argument {index}")]
    MissingArgument { function: FunctionKind, index: usize },

    /// Argument type rejected by `can_accept`
    #[error("{function}: argument {index} of type {found} is not accepted")]
    TypeMismatch {
        function: FunctionKind,
        index: usize,
        found: String,
    },

    /// Extraction path names a field the record does not have
    #[error("field '{field}' not found (path {path})")]
    FieldNotFound { field: String, path: String },

    /// Extracted leaf cannot be read as the target type
    #[error("cannot convert '{value}' to {target}")]
    NumberFormat { value: String, target: TypeTag },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// A parsed, possibly stateful unit of computation over streaming samples.
///
/// Argument 0 passed to [`eval`](Self::eval) is always the current sample.
pub trait AggregationFunction: fmt::Debug + Send + Sync {
    fn kind(&self) -> FunctionKind;

    /// Type tag of every value `eval` returns.
    fn return_type(&self) -> TypeTag;

    /// Number of named operands read through the resolver.
    fn arity(&self) -> usize {
        0
    }

    /// Whether argument position `index` accepts values tagged `tag`.
    fn can_accept(&self, index: usize, tag: TypeTag) -> bool;

    /// Fold `args` into the function's state and return the updated result.
    fn eval(&self, resolver: &dyn OperandResolver, args: &[Value]) -> Result<Value, EvalError>;

    /// Drop all accumulated state.
    fn reset(&self);

    /// Evaluate a single sample for functions that need no operands.
    fn eval_sample(&self, sample: &Value) -> Result<Value, EvalError> {
        self.eval(&NoOperands, std::slice::from_ref(sample))
    }
}

pub(crate) fn argument(
    function: FunctionKind,
    args: &[Value],
    index: usize,
) -> Result<&Value, EvalError> {
    args.get(index)
        .ok_or(EvalError::MissingArgument { function, index })
}

pub(crate) fn type_mismatch(function: FunctionKind, index: usize, value: &Value) -> EvalError {
    EvalError::TypeMismatch {
        function,
        index,
        found: value.type_name(),
    }
}

/// Numeric argument at `index`, widened to `f64`.
pub(crate) fn numeric_argument(
    function: FunctionKind,
    args: &[Value],
    index: usize,
) -> Result<f64, EvalError> {
    let value = argument(function, args, index)?;
    value
        .as_f64()
        .ok_or_else(|| type_mismatch(function, index, value))
}
