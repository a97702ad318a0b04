//! Functions whose state resets once a configured interval has elapsed.
//!
//! Expiry is checked lazily on each call: when the interval since the last
//! reset is exceeded the state is cleared first and the new sample is then
//! folded into the fresh window.

use std::time::{Duration, Instant};

use log::trace;
use parking_lot::Mutex;

use crate::functions::{AggregationFunction, EvalError, FunctionKind, numeric_argument};
use crate::resolver::OperandResolver;
use crate::stats::{PercentileEstimator, ResetWindow};
use crate::value::{TypeTag, Value};

fn accepts_number(index: usize, tag: TypeTag) -> bool {
    index == 0 && tag.is_numeric()
}

#[derive(Debug)]
struct SumState {
    window: ResetWindow,
    sum: f64,
}

/// `sum(N, unit)`: sum of the samples received in the current window.
#[derive(Debug)]
pub struct SumFunction {
    state: Mutex<SumState>,
}

impl SumFunction {
    pub fn new(interval: Duration) -> Self {
        SumFunction {
            state: Mutex::new(SumState {
                window: ResetWindow::new(interval, Instant::now()),
                sum: 0.0,
            }),
        }
    }

    /// Fold in a sample taken at `now` and return the window's sum.
    pub fn accumulate_at(&self, sample: f64, now: Instant) -> f64 {
        let mut state = self.state.lock();
        if state.window.roll(now) {
            trace!("sum window of {:?} expired, resetting", state.window.length());
            state.sum = 0.0;
        }
        state.sum += sample;
        state.sum
    }
}

impl AggregationFunction for SumFunction {
    fn kind(&self) -> FunctionKind {
        FunctionKind::Sum
    }

    fn return_type(&self) -> TypeTag {
        TypeTag::Double
    }

    fn can_accept(&self, index: usize, tag: TypeTag) -> bool {
        accepts_number(index, tag)
    }

    fn eval(&self, _resolver: &dyn OperandResolver, args: &[Value]) -> Result<Value, EvalError> {
        let sample = numeric_argument(FunctionKind::Sum, args, 0)?;
        Ok(Value::Double(self.accumulate_at(sample, Instant::now())))
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.window.restart(Instant::now());
        state.sum = 0.0;
    }
}

#[derive(Debug)]
struct AverageState {
    window: ResetWindow,
    sum: f64,
    count: u64,
}

/// `avg(N, unit)`: arithmetic mean of the samples in the current window.
#[derive(Debug)]
pub struct AverageFunction {
    state: Mutex<AverageState>,
}

impl AverageFunction {
    pub fn new(interval: Duration) -> Self {
        AverageFunction {
            state: Mutex::new(AverageState {
                window: ResetWindow::new(interval, Instant::now()),
                sum: 0.0,
                count: 0,
            }),
        }
    }

    /// Fold in a sample taken at `now` and return the window's mean.
    pub fn accumulate_at(&self, sample: f64, now: Instant) -> f64 {
        let mut state = self.state.lock();
        if state.window.roll(now) {
            trace!("avg window of {:?} expired, resetting", state.window.length());
            state.sum = 0.0;
            state.count = 0;
        }
        state.sum += sample;
        state.count += 1;
        state.sum / state.count as f64
    }
}

impl AggregationFunction for AverageFunction {
    fn kind(&self) -> FunctionKind {
        FunctionKind::Average
    }

    fn return_type(&self) -> TypeTag {
        TypeTag::Double
    }

    fn can_accept(&self, index: usize, tag: TypeTag) -> bool {
        accepts_number(index, tag)
    }

    fn eval(&self, _resolver: &dyn OperandResolver, args: &[Value]) -> Result<Value, EvalError> {
        let sample = numeric_argument(FunctionKind::Average, args, 0)?;
        Ok(Value::Double(self.accumulate_at(sample, Instant::now())))
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.window.restart(Instant::now());
        state.sum = 0.0;
        state.count = 0;
    }
}

#[derive(Debug)]
struct PercentileState {
    window: ResetWindow,
    estimator: PercentileEstimator,
}

/// `percentile(P, N, unit)`: the P-th percentile of recent samples in the
/// current window.
#[derive(Debug)]
pub struct PercentileFunction {
    percentile: u8,
    state: Mutex<PercentileState>,
}

impl PercentileFunction {
    /// `capacity` bounds how many of the most recent samples are kept.
    pub fn new(percentile: u8, interval: Duration, capacity: usize) -> Self {
        PercentileFunction {
            percentile,
            state: Mutex::new(PercentileState {
                window: ResetWindow::new(interval, Instant::now()),
                estimator: PercentileEstimator::new(f64::from(percentile) / 100.0, capacity),
            }),
        }
    }

    pub fn percentile(&self) -> u8 {
        self.percentile
    }

    /// Fold in a sample taken at `now` and return the current estimate.
    pub fn accumulate_at(&self, sample: f64, now: Instant) -> f64 {
        let mut state = self.state.lock();
        if state.window.roll(now) {
            trace!(
                "percentile window of {:?} expired, clearing {} samples",
                state.window.length(),
                state.estimator.len()
            );
            state.estimator.clear();
        }
        state.estimator.add(sample);
        state.estimator.estimate()
    }
}

impl AggregationFunction for PercentileFunction {
    fn kind(&self) -> FunctionKind {
        FunctionKind::Percentile
    }

    fn return_type(&self) -> TypeTag {
        TypeTag::Double
    }

    fn can_accept(&self, index: usize, tag: TypeTag) -> bool {
        accepts_number(index, tag)
    }

    fn eval(&self, _resolver: &dyn OperandResolver, args: &[Value]) -> Result<Value, EvalError> {
        let sample = numeric_argument(FunctionKind::Percentile, args, 0)?;
        Ok(Value::Double(self.accumulate_at(sample, Instant::now())))
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.window.restart(Instant::now());
        state.estimator.clear();
    }
}
