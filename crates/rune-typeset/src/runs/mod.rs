//! Run-length encoded values over character ranges.
//!
//! A run sequence stores `(limit, value)` pairs with strictly increasing
//! exclusive limits; run `i` covers `[limit[i - 1], limit[i])` and the last
//! limit equals the covered length. Fonts, scripts, colors and decoration
//! flags all flow through the layout engine in this form.

pub mod bool_runs;
pub mod builder;
pub mod value_runs;

pub use bool_runs::BoolRuns;
pub use builder::ValueRunBuilder;
pub use value_runs::{Run, ValueRuns};

/// Read access shared by every run storage.
pub trait Runs {
    type Value;

    /// Number of runs.
    fn run_count(&self) -> usize;

    /// Exclusive upper bound of run `index`.
    fn run_limit(&self, index: usize) -> usize;

    /// Value of run `index`.
    fn run_value(&self, index: usize) -> Self::Value;

    /// Start of run `index`.
    fn run_start(&self, index: usize) -> usize {
        if index == 0 { 0 } else { self.run_limit(index - 1) }
    }

    /// Total covered length.
    fn covered_len(&self) -> usize {
        match self.run_count() {
            0 => 0,
            n => self.run_limit(n - 1),
        }
    }

    /// Index of the run whose range contains `index`, found by binary search.
    fn find_run(&self, index: usize) -> Option<usize> {
        let (mut lo, mut hi) = (0usize, self.run_count());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.run_limit(mid) <= index {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        (lo < self.run_count()).then_some(lo)
    }
}
