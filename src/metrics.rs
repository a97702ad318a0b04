//! Metric recorders behind the `flag()` and `gauge*()` functions.
//!
//! Unlike the numeric aggregators, a recorder reports a structured snapshot
//! ([`CompositeValue`]) rather than a single scalar.

use crate::value::{CompositeValue, Value};

/// Flavour of a gauge: floating or integral samples, optionally clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GaugeKind {
    Fp,
    Int,
    RangedFp { lower: f64, upper: f64 },
    RangedInt { lower: i64, upper: i64 },
}

impl GaugeKind {
    pub fn type_name(self) -> &'static str {
        match self {
            GaugeKind::Fp => "gauge_fp",
            GaugeKind::Int => "gauge_int",
            GaugeKind::RangedFp { .. } => "ranged_gauge_fp",
            GaugeKind::RangedInt { .. } => "ranged_gauge_int",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(self, GaugeKind::Int | GaugeKind::RangedInt { .. })
    }
}

fn optional<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

/// Counts boolean samples and the number of times the value flipped.
#[derive(Debug, Clone, Default)]
pub struct FlagRecorder {
    current: Option<bool>,
    true_count: u64,
    false_count: u64,
    flips: u64,
}

impl FlagRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, sample: bool) {
        if let Some(previous) = self.current
            && previous != sample
        {
            self.flips += 1;
        }
        if sample {
            self.true_count += 1;
        } else {
            self.false_count += 1;
        }
        self.current = Some(sample);
    }

    pub fn snapshot(&self) -> CompositeValue {
        let total = self.true_count + self.false_count;
        let ratio = if total == 0 {
            0.0
        } else {
            self.true_count as f64 / total as f64
        };
        CompositeValue::new("flag")
            .with_field("value", optional(self.current))
            .with_field("true_count", self.true_count as i64)
            .with_field("false_count", self.false_count as i64)
            .with_field("flips", self.flips as i64)
            .with_field("true_ratio", ratio)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Sample type a [`GaugeRecorder`] can track.
pub trait GaugeSample: Copy + PartialOrd + Into<Value> {
    fn to_f64(self) -> f64;
}

impl GaugeSample for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl GaugeSample for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// Running gauge: last value, extremes, mean and sample count.
///
/// A ranged gauge clamps every sample into `[lower, upper]` and counts how
/// many samples fell outside on each side.
#[derive(Debug, Clone)]
pub struct GaugeRecorder<T> {
    type_name: &'static str,
    range: Option<(T, T)>,
    last: Option<T>,
    min: Option<T>,
    max: Option<T>,
    mean: f64,
    count: u64,
    below: u64,
    above: u64,
}

impl<T: GaugeSample> GaugeRecorder<T> {
    pub fn new(type_name: &'static str) -> Self {
        GaugeRecorder {
            type_name,
            range: None,
            last: None,
            min: None,
            max: None,
            mean: 0.0,
            count: 0,
            below: 0,
            above: 0,
        }
    }

    /// A gauge clamped to `[lower, upper]`; swapped bounds are reordered.
    pub fn ranged(type_name: &'static str, lower: T, upper: T) -> Self {
        let range = if lower > upper {
            (upper, lower)
        } else {
            (lower, upper)
        };
        GaugeRecorder {
            range: Some(range),
            ..Self::new(type_name)
        }
    }

    pub fn update(&mut self, sample: T) {
        let sample = match self.range {
            Some((lower, _)) if sample < lower => {
                self.below += 1;
                lower
            }
            Some((_, upper)) if sample > upper => {
                self.above += 1;
                upper
            }
            _ => sample,
        };

        self.count += 1;
        self.mean += (sample.to_f64() - self.mean) / self.count as f64;
        self.last = Some(sample);
        if self.min.is_none_or(|min| sample < min) {
            self.min = Some(sample);
        }
        if self.max.is_none_or(|max| sample > max) {
            self.max = Some(sample);
        }
    }

    pub fn snapshot(&self) -> CompositeValue {
        let mean = if self.count == 0 { f64::NAN } else { self.mean };
        let mut snapshot = CompositeValue::new(self.type_name)
            .with_field("value", optional(self.last))
            .with_field("min", optional(self.min))
            .with_field("max", optional(self.max))
            .with_field("mean", mean)
            .with_field("count", self.count as i64);
        if let Some((lower, upper)) = self.range {
            snapshot.insert("lower_bound", lower);
            snapshot.insert("upper_bound", upper);
            snapshot.insert("below_range", self.below as i64);
            snapshot.insert("above_range", self.above as i64);
        }
        snapshot
    }

    pub fn clear(&mut self) {
        *self = GaugeRecorder {
            range: self.range,
            ..Self::new(self.type_name)
        };
    }
}
