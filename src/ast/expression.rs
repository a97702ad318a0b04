use std::fmt;

use crate::ast::Interval;
use crate::config::EngineConfig;
use crate::functions::{
    AggregationFunction, AverageFunction, CorrelationFunction, ExtractFunction, ExtractTarget,
    ExtremumFunction, FlagFunction, FunctionKind, GaugeFunction, PercentileFunction, SumFunction,
};
use crate::metrics::GaugeKind;

/// Anything the parser can produce from a leading token.
///
/// Only [`Expression::Function`] is a complete formula; the other forms are
/// reported back to the user when they appear where a function is expected.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Function call with its validated parameters
    ///
    /// # Example
    /// ```text
    /// avg(5, sec)
    /// ```
    Function(FunctionDef),

    /// Bare integer literal
    Integer(u64),

    /// Operand reference (`$name`)
    Operand(String),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Function(def) => write!(f, "{}", def),
            Expression::Integer(n) => write!(f, "{}", n),
            Expression::Operand(name) => write!(f, "${}", name),
        }
    }
}

/// Parsed plan of a built-in function.
///
/// A `FunctionDef` carries no runtime state. Call
/// [`instantiate`](FunctionDef::instantiate) to get a fresh, independently
/// owned [`AggregationFunction`].
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionDef {
    /// `max()`
    Max,

    /// `min()`
    Min,

    /// `sum(N, unit)`
    Sum { interval: Interval },

    /// `avg(N, unit)`
    Average { interval: Interval },

    /// `percentile(P, N, unit)`
    Percentile { percentile: u8, interval: Interval },

    /// `correl($name)`
    Correlation { operand: String },

    /// `extract_string(a, b)`, `extract_int(..)`, `extract_double(..)`
    Extract {
        target: ExtractTarget,
        path: Vec<String>,
    },

    /// `flag()`
    Flag,

    /// `gauge_fp()`, `gauge_int()`, `ranged_gauge_fp(lo, hi)`, `ranged_gauge_int(lo, hi)`
    Gauge(GaugeKind),
}

impl FunctionDef {
    pub fn kind(&self) -> FunctionKind {
        match self {
            FunctionDef::Max => FunctionKind::Max,
            FunctionDef::Min => FunctionKind::Min,
            FunctionDef::Sum { .. } => FunctionKind::Sum,
            FunctionDef::Average { .. } => FunctionKind::Average,
            FunctionDef::Percentile { .. } => FunctionKind::Percentile,
            FunctionDef::Correlation { .. } => FunctionKind::Correlation,
            FunctionDef::Extract { target, .. } => match target {
                ExtractTarget::String => FunctionKind::ExtractString,
                ExtractTarget::Int => FunctionKind::ExtractInt,
                ExtractTarget::Double => FunctionKind::ExtractDouble,
            },
            FunctionDef::Flag => FunctionKind::Flag,
            FunctionDef::Gauge(kind) => match kind {
                GaugeKind::Fp => FunctionKind::GaugeFp,
                GaugeKind::Int => FunctionKind::GaugeInt,
                GaugeKind::RangedFp { .. } => FunctionKind::RangedGaugeFp,
                GaugeKind::RangedInt { .. } => FunctionKind::RangedGaugeInt,
            },
        }
    }

    /// Build a fresh function instance with its own state.
    pub fn instantiate(&self, config: &EngineConfig) -> Box<dyn AggregationFunction> {
        match self {
            FunctionDef::Max => Box::new(ExtremumFunction::max(config.extremum_seed)),
            FunctionDef::Min => Box::new(ExtremumFunction::min(config.extremum_seed)),
            FunctionDef::Sum { interval } => Box::new(SumFunction::new(interval.to_duration())),
            FunctionDef::Average { interval } => {
                Box::new(AverageFunction::new(interval.to_duration()))
            }
            FunctionDef::Percentile {
                percentile,
                interval,
            } => Box::new(PercentileFunction::new(
                *percentile,
                interval.to_duration(),
                config.percentile_window,
            )),
            FunctionDef::Correlation { operand } => {
                Box::new(CorrelationFunction::new(operand.clone()))
            }
            FunctionDef::Extract { target, path } => {
                Box::new(ExtractFunction::new(*target, path.clone()))
            }
            FunctionDef::Flag => Box::new(FlagFunction::new()),
            FunctionDef::Gauge(kind) => Box::new(GaugeFunction::new(*kind)),
        }
    }
}

impl fmt::Display for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind().name();
        match self {
            FunctionDef::Max | FunctionDef::Min | FunctionDef::Flag => write!(f, "{}()", name),
            FunctionDef::Sum { interval } | FunctionDef::Average { interval } => {
                write!(f, "{}({})", name, interval)
            }
            FunctionDef::Percentile {
                percentile,
                interval,
            } => write!(f, "{}({}, {})", name, percentile, interval),
            FunctionDef::Correlation { operand } => write!(f, "{}(${})", name, operand),
            FunctionDef::Extract { path, .. } => write!(f, "{}({})", name, path.join(", ")),
            FunctionDef::Gauge(kind) => match kind {
                GaugeKind::Fp | GaugeKind::Int => write!(f, "{}()", name),
                GaugeKind::RangedFp { lower, upper } => {
                    write!(f, "{}({}, {})", name, lower, upper)
                }
                GaugeKind::RangedInt { lower, upper } => {
                    write!(f, "{}({}, {})", name, lower, upper)
                }
            },
        }
    }
}
