use log::debug;
use parking_lot::Mutex;

use crate::functions::{AggregationFunction, EvalError, FunctionKind, numeric_argument};
use crate::resolver::{OperandResolver, ResolutionError};
use crate::stats::OnlineCorrelation;
use crate::value::{TypeTag, Value};

/// `correl($name)`: running correlation between the sample and a named
/// operand.
///
/// The operand is looked up through the resolver on every call, never
/// cached, so the pair always uses the operand's current value.
#[derive(Debug)]
pub struct CorrelationFunction {
    operand: String,
    state: Mutex<OnlineCorrelation>,
}

impl CorrelationFunction {
    pub fn new(operand: impl Into<String>) -> Self {
        CorrelationFunction {
            operand: operand.into(),
            state: Mutex::new(OnlineCorrelation::new()),
        }
    }

    pub fn operand(&self) -> &str {
        &self.operand
    }

    fn resolve_operand(&self, resolver: &dyn OperandResolver) -> Result<f64, EvalError> {
        let value = resolver
            .resolve(&self.operand, TypeTag::Double)
            .inspect_err(|e| debug!("correl: {}", e))?;
        value.as_f64().ok_or_else(|| {
            ResolutionError::new(
                self.operand.as_str(),
                TypeTag::Double,
                format!("resolved value has type {}", value.type_name()),
            )
            .into()
        })
    }
}

impl AggregationFunction for CorrelationFunction {
    fn kind(&self) -> FunctionKind {
        FunctionKind::Correlation
    }

    fn return_type(&self) -> TypeTag {
        TypeTag::Double
    }

    fn arity(&self) -> usize {
        1
    }

    /// Position 0 is the sample, position 1 the named operand.
    fn can_accept(&self, index: usize, tag: TypeTag) -> bool {
        index <= 1 && tag.is_numeric()
    }

    fn eval(&self, resolver: &dyn OperandResolver, args: &[Value]) -> Result<Value, EvalError> {
        let sample = numeric_argument(FunctionKind::Correlation, args, 0)?;
        let other = self.resolve_operand(resolver)?;
        Ok(Value::Double(self.state.lock().add(sample, other)))
    }

    fn reset(&self) {
        self.state.lock().clear();
    }
}
