use std::collections::VecDeque;

/// Quantile estimate over the most recent `capacity` samples.
///
/// Once full, each new sample evicts the oldest one. The estimate sorts a
/// copy of the window and interpolates linearly between the two closest
/// ranks.
#[derive(Debug, Clone)]
pub struct PercentileEstimator {
    quantile: f64,
    capacity: usize,
    samples: VecDeque<f64>,
}

impl PercentileEstimator {
    /// `quantile` is a fraction in `[0, 1]`; out-of-range values are clamped.
    pub fn new(quantile: f64, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        PercentileEstimator {
            quantile: quantile.clamp(0.0, 1.0),
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn quantile(&self) -> f64 {
        self.quantile
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Add a sample; NaN is ignored.
    pub fn add(&mut self, sample: f64) {
        if sample.is_nan() {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Current estimate, or NaN while the window is empty.
    pub fn estimate(&self) -> f64 {
        if self.samples.is_empty() {
            return f64::NAN;
        }
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(f64::total_cmp);

        let rank = self.quantile * (sorted.len() - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        if lower == upper {
            sorted[lower]
        } else {
            let frac = rank - lower as f64;
            sorted[lower] * (1.0 - frac) + sorted[upper] * frac
        }
    }
}
