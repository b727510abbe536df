use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Every random choice the advisory engine makes goes through this trait
/// so tests can pin template selection and trend jitter.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;

    /// Uniform float in `low..=high`
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Uniform integer in `low..=high`
    fn integer(&mut self, low: i32, high: i32) -> i32;
}

/// Adapter from any `rand` generator
pub struct RngSource<R>(R);

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.0.random_range(0..len)
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return low;
        }
        self.0.random_range(low..=high)
    }

    fn integer(&mut self, low: i32, high: i32) -> i32 {
        if low >= high {
            return low;
        }
        self.0.random_range(low..=high)
    }
}

/// Deterministic source: first choice, band midpoint, lowest integer
#[cfg(test)]
pub struct FixedSource;

#[cfg(test)]
impl RandomSource for FixedSource {
    fn index(&mut self, _len: usize) -> usize {
        0
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (low + high) / 2.0
    }

    fn integer(&mut self, low: i32, _high: i32) -> i32 {
        low
    }
}
