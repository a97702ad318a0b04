//! Thread-safe numeric building blocks shared by the function library.
//!
//! - **[atomic]** - `f64` cell updated through compare-and-swap retry loops
//! - **[window]** - lazily checked reset window for interval-bound state
//! - **[percentile]** - bounded sample window with interpolated quantiles
//! - **[correlation]** - streaming Pearson correlation (Welford co-moments)
//!
//! Only [`AtomicF64`] is safe to share on its own. The other primitives are
//! plain data meant to live behind the owning function's lock, so that
//! related fields move together.
pub mod atomic;
pub mod correlation;
pub mod percentile;
pub mod window;

pub use atomic::AtomicF64;
pub use correlation::OnlineCorrelation;
pub use percentile::PercentileEstimator;
pub use window::ResetWindow;
