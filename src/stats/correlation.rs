/// Streaming Pearson correlation of two variables.
///
/// Means and co-moments are updated with Welford's method, so the estimate
/// stays stable over long streams without keeping any samples.
#[derive(Debug, Clone, Default)]
pub struct OnlineCorrelation {
    count: u64,
    mean_x: f64,
    mean_y: f64,
    m2_x: f64,
    m2_y: f64,
    c_xy: f64,
}

impl OnlineCorrelation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Fold in one `(x, y)` pair and return the updated coefficient.
    pub fn add(&mut self, x: f64, y: f64) -> f64 {
        self.count += 1;
        let n = self.count as f64;

        let dx = x - self.mean_x;
        self.mean_x += dx / n;
        let dy = y - self.mean_y;
        self.mean_y += dy / n;

        self.m2_x += dx * (x - self.mean_x);
        self.m2_y += dy * (y - self.mean_y);
        self.c_xy += dx * (y - self.mean_y);

        self.coefficient()
    }

    /// Correlation in `[-1, 1]`; NaN with fewer than two pairs or when
    /// either variable has not varied yet.
    pub fn coefficient(&self) -> f64 {
        if self.count < 2 || self.m2_x == 0.0 || self.m2_y == 0.0 {
            return f64::NAN;
        }
        (self.c_xy / (self.m2_x * self.m2_y).sqrt()).clamp(-1.0, 1.0)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_linear_pairs() {
        let mut corr = OnlineCorrelation::new();
        let mut last = f64::NAN;
        for i in 0..10 {
            let x = i as f64;
            last = corr.add(x, 3.0 * x + 1.0);
        }
        assert!((last - 1.0).abs() < 1e-12);
    }

    #[test]
    fn inverse_pairs() {
        let mut corr = OnlineCorrelation::new();
        for i in 0..10 {
            let x = i as f64;
            corr.add(x, -x);
        }
        assert!((corr.coefficient() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn undefined_until_both_vary() {
        let mut corr = OnlineCorrelation::new();
        assert!(corr.add(1.0, 2.0).is_nan());
        assert!(corr.add(2.0, 2.0).is_nan());
        assert!(!corr.add(3.0, 5.0).is_nan());
    }
}
