use std::fmt;
use std::time::Duration;

/// Time unit accepted in windowed function parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Resolve a unit name, including its short synonyms.
    ///
    /// # Examples
    /// ```
    /// use aggfn_lang::ast::TimeUnit;
    ///
    /// assert_eq!(TimeUnit::from_name("sec"), Some(TimeUnit::Seconds));
    /// assert_eq!(TimeUnit::from_name("m"), Some(TimeUnit::Minutes));
    /// assert_eq!(TimeUnit::from_name("fortnight"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "s" | "sec" | "seconds" => Some(TimeUnit::Seconds),
            "ms" | "millis" => Some(TimeUnit::Milliseconds),
            "ns" | "nanos" => Some(TimeUnit::Nanoseconds),
            "m" | "minutes" => Some(TimeUnit::Minutes),
            "h" | "hours" => Some(TimeUnit::Hours),
            "d" | "days" => Some(TimeUnit::Days),
            _ => None,
        }
    }

    /// Canonical short name, as rendered by `FunctionDef`'s `Display`.
    pub fn short_name(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "sec",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }

    fn nanos_per_unit(self) -> u128 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60 * 1_000_000_000,
            TimeUnit::Hours => 3_600 * 1_000_000_000,
            TimeUnit::Days => 86_400 * 1_000_000_000,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A window length: `amount` of `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub amount: u64,
    pub unit: TimeUnit,
}

impl Interval {
    pub fn new(amount: u64, unit: TimeUnit) -> Self {
        Interval { amount, unit }
    }

    /// Length of the window, saturating at `Duration::MAX`.
    pub fn to_duration(self) -> Duration {
        let nanos = u128::from(self.amount).saturating_mul(self.unit.nanos_per_unit());
        let secs = nanos / 1_000_000_000;
        match u64::try_from(secs) {
            Ok(secs) => Duration::new(secs, (nanos % 1_000_000_000) as u32),
            Err(_) => Duration::MAX,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.amount, self.unit)
    }
}
