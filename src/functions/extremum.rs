use crate::config::ExtremumSeed;
use crate::functions::{AggregationFunction, EvalError, FunctionKind, numeric_argument};
use crate::resolver::OperandResolver;
use crate::stats::AtomicF64;
use crate::value::{TypeTag, Value};

/// `max()` and `min()`: the largest or smallest sample seen so far.
///
/// The running value is a single `f64`, so it is updated lock-free.
#[derive(Debug)]
pub struct ExtremumFunction {
    kind: FunctionKind,
    seed: f64,
    current: AtomicF64,
}

impl ExtremumFunction {
    pub fn max(seed: ExtremumSeed) -> Self {
        Self::with_seed(FunctionKind::Max, seed.max_seed())
    }

    pub fn min(seed: ExtremumSeed) -> Self {
        Self::with_seed(FunctionKind::Min, seed.min_seed())
    }

    fn with_seed(kind: FunctionKind, seed: f64) -> Self {
        ExtremumFunction {
            kind,
            seed,
            current: AtomicF64::new(seed),
        }
    }

    /// Current extreme without folding in a sample.
    pub fn current(&self) -> f64 {
        self.current.load()
    }
}

impl AggregationFunction for ExtremumFunction {
    fn kind(&self) -> FunctionKind {
        self.kind
    }

    fn return_type(&self) -> TypeTag {
        TypeTag::Double
    }

    fn can_accept(&self, index: usize, tag: TypeTag) -> bool {
        index == 0 && tag.is_numeric()
    }

    fn eval(&self, _resolver: &dyn OperandResolver, args: &[Value]) -> Result<Value, EvalError> {
        let sample = numeric_argument(self.kind, args, 0)?;
        let updated = if self.kind == FunctionKind::Max {
            self.current.update(|current| current.max(sample))
        } else {
            self.current.update(|current| current.min(sample))
        };
        Ok(Value::Double(updated))
    }

    fn reset(&self) {
        self.current.store(self.seed);
    }
}
