/// Starting value of the running `max()` and `min()` trackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtremumSeed {
    /// `max()` starts at the smallest positive double (4.9e-324) and `min()`
    /// at `f64::MAX`. A stream of only negative samples therefore keeps
    /// reporting the seed from `max()`.
    #[default]
    Legacy,

    /// `max()` starts at negative infinity and `min()` at positive infinity.
    Infinite,
}

impl ExtremumSeed {
    pub fn max_seed(self) -> f64 {
        match self {
            ExtremumSeed::Legacy => f64::from_bits(1),
            ExtremumSeed::Infinite => f64::NEG_INFINITY,
        }
    }

    pub fn min_seed(self) -> f64 {
        match self {
            ExtremumSeed::Legacy => f64::MAX,
            ExtremumSeed::Infinite => f64::INFINITY,
        }
    }
}

/// Default capacity of the percentile estimator's sample window.
pub const DEFAULT_PERCENTILE_WINDOW: usize = 100;

/// Settings applied when a parsed formula is turned into a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of most recent samples a `percentile()` estimate looks at
    pub percentile_window: usize,

    pub extremum_seed: ExtremumSeed,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            percentile_window: DEFAULT_PERCENTILE_WINDOW,
            extremum_seed: ExtremumSeed::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the percentile window; zero is raised to one.
    pub fn with_percentile_window(mut self, capacity: usize) -> Self {
        self.percentile_window = capacity.max(1);
        self
    }

    pub fn with_extremum_seed(mut self, seed: ExtremumSeed) -> Self {
        self.extremum_seed = seed;
        self
    }
}
