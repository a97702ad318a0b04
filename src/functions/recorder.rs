use parking_lot::Mutex;

use crate::functions::{
    AggregationFunction, EvalError, FunctionKind, argument, numeric_argument, type_mismatch,
};
use crate::metrics::{FlagRecorder, GaugeKind, GaugeRecorder};
use crate::resolver::OperandResolver;
use crate::value::{TypeTag, Value};

/// `flag()`: feeds boolean samples into a [`FlagRecorder`] and returns its
/// snapshot.
#[derive(Debug, Default)]
pub struct FlagFunction {
    recorder: Mutex<FlagRecorder>,
}

impl FlagFunction {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AggregationFunction for FlagFunction {
    fn kind(&self) -> FunctionKind {
        FunctionKind::Flag
    }

    fn return_type(&self) -> TypeTag {
        TypeTag::Composite
    }

    fn can_accept(&self, index: usize, tag: TypeTag) -> bool {
        index == 0 && tag == TypeTag::Bool
    }

    fn eval(&self, _resolver: &dyn OperandResolver, args: &[Value]) -> Result<Value, EvalError> {
        let value = argument(FunctionKind::Flag, args, 0)?;
        let sample = value
            .as_bool()
            .ok_or_else(|| type_mismatch(FunctionKind::Flag, 0, value))?;

        let mut recorder = self.recorder.lock();
        recorder.update(sample);
        Ok(Value::Composite(recorder.snapshot()))
    }

    fn reset(&self) {
        self.recorder.lock().clear();
    }
}

/// Big integers past the `i64` range saturate at its bounds.
fn saturating_i64(n: i128) -> i64 {
    i64::try_from(n).unwrap_or(if n < 0 { i64::MIN } else { i64::MAX })
}

#[derive(Debug)]
enum GaugeState {
    Fp(Mutex<GaugeRecorder<f64>>),
    Int(Mutex<GaugeRecorder<i64>>),
}

/// `gauge_fp()`, `gauge_int()` and their ranged forms: feed samples into a
/// [`GaugeRecorder`] and return its snapshot.
#[derive(Debug)]
pub struct GaugeFunction {
    kind: GaugeKind,
    state: GaugeState,
}

impl GaugeFunction {
    pub fn new(kind: GaugeKind) -> Self {
        let name = kind.type_name();
        let state = match kind {
            GaugeKind::Fp => GaugeState::Fp(Mutex::new(GaugeRecorder::new(name))),
            GaugeKind::Int => GaugeState::Int(Mutex::new(GaugeRecorder::new(name))),
            GaugeKind::RangedFp { lower, upper } => {
                GaugeState::Fp(Mutex::new(GaugeRecorder::ranged(name, lower, upper)))
            }
            GaugeKind::RangedInt { lower, upper } => {
                GaugeState::Int(Mutex::new(GaugeRecorder::ranged(name, lower, upper)))
            }
        };
        GaugeFunction { kind, state }
    }

    pub fn gauge_kind(&self) -> GaugeKind {
        self.kind
    }
}

impl AggregationFunction for GaugeFunction {
    fn kind(&self) -> FunctionKind {
        match self.kind {
            GaugeKind::Fp => FunctionKind::GaugeFp,
            GaugeKind::Int => FunctionKind::GaugeInt,
            GaugeKind::RangedFp { .. } => FunctionKind::RangedGaugeFp,
            GaugeKind::RangedInt { .. } => FunctionKind::RangedGaugeInt,
        }
    }

    fn return_type(&self) -> TypeTag {
        TypeTag::Composite
    }

    fn can_accept(&self, index: usize, tag: TypeTag) -> bool {
        if self.kind.is_integral() {
            index == 0 && tag.is_integral()
        } else {
            index == 0 && tag.is_numeric()
        }
    }

    fn eval(&self, _resolver: &dyn OperandResolver, args: &[Value]) -> Result<Value, EvalError> {
        let function = self.kind();
        let snapshot = match &self.state {
            GaugeState::Fp(recorder) => {
                let sample = numeric_argument(function, args, 0)?;
                let mut recorder = recorder.lock();
                recorder.update(sample);
                recorder.snapshot()
            }
            GaugeState::Int(recorder) => {
                let value = argument(function, args, 0)?;
                let sample = match value {
                    Value::BigInt(n) => saturating_i64(*n),
                    _ => value
                        .as_i64()
                        .ok_or_else(|| type_mismatch(function, 0, value))?,
                };
                let mut recorder = recorder.lock();
                recorder.update(sample);
                recorder.snapshot()
            }
        };
        Ok(Value::Composite(snapshot))
    }

    fn reset(&self) {
        match &self.state {
            GaugeState::Fp(recorder) => recorder.lock().clear(),
            GaugeState::Int(recorder) => recorder.lock().clear(),
        }
    }
}
