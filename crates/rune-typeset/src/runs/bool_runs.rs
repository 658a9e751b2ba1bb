use super::{Runs, ValueRuns};

const VALUE_BIT: u32 = 1 << 31;
const LIMIT_MASK: u32 = VALUE_BIT - 1;

/// Boolean runs packed one word per run: the high bit holds the value and
/// the low 31 bits the limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolRuns {
    packed: Vec<u32>,
}

impl BoolRuns {
    pub fn new() -> Self {
        Self { packed: Vec::new() }
    }

    pub fn single(length: usize, value: bool) -> Self {
        let mut runs = Self::new();
        runs.add(length, value);
        runs
    }

    /// Append a run ending at `limit`. Limits above 2^31 - 1 are clamped.
    pub fn add(&mut self, limit: usize, value: bool) {
        let limit = (limit as u64).min(LIMIT_MASK as u64) as u32;
        self.packed.push(if value { limit | VALUE_BIT } else { limit });
    }

    pub fn len(&self) -> usize {
        self.packed.last().map_or(0, |word| (word & LIMIT_MASK) as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_value(&self, index: usize) -> Option<bool> {
        self.find_run(index).map(|run| self.run_value(run))
    }

    /// Runs covering `[offset, offset + length)`, re-based to start at zero.
    pub fn subset(&self, offset: usize, length: usize) -> Self {
        let end = offset + length;
        let mut subset = Self::new();
        let Some(first) = self.find_run(offset).filter(|_| length > 0) else {
            return subset;
        };
        for run in first..self.run_count() {
            if self.run_start(run) >= end {
                break;
            }
            subset.add(self.run_limit(run).min(end) - offset, self.run_value(run));
        }
        subset
    }
}

impl Runs for BoolRuns {
    type Value = bool;

    fn run_count(&self) -> usize {
        self.packed.len()
    }

    fn run_limit(&self, index: usize) -> usize {
        (self.packed[index] & LIMIT_MASK) as usize
    }

    fn run_value(&self, index: usize) -> bool {
        self.packed[index] & VALUE_BIT != 0
    }
}

impl From<&ValueRuns<bool>> for BoolRuns {
    fn from(runs: &ValueRuns<bool>) -> Self {
        let mut packed = Self::new();
        for run in runs.iter() {
            packed.add(run.limit, *run.value);
        }
        packed
    }
}

impl From<ValueRuns<bool>> for BoolRuns {
    fn from(runs: ValueRuns<bool>) -> Self {
        Self::from(&runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_value_in_high_bit() {
        let mut runs = BoolRuns::new();
        runs.add(4, false);
        runs.add(10, true);
        runs.add(12, false);
        assert_eq!(runs.len(), 12);
        assert_eq!(runs.run_count(), 3);
        assert_eq!(runs.run_limit(1), 10);
        assert!(runs.run_value(1));
        assert_eq!(runs.get_value(3), Some(false));
        assert_eq!(runs.get_value(4), Some(true));
        assert_eq!(runs.get_value(11), Some(false));
        assert_eq!(runs.get_value(12), None);
    }

    #[test]
    fn converts_from_generic_runs() {
        let mut generic = ValueRuns::new();
        generic.add(2, true);
        generic.add(5, false);
        let packed = BoolRuns::from(&generic);
        assert_eq!(packed.len(), 5);
        assert_eq!(packed.run_start(1), 2);
        assert_eq!(packed.get_value(1), Some(true));
    }

    #[test]
    fn subset_rebases_limits() {
        let mut runs = BoolRuns::new();
        runs.add(3, true);
        runs.add(6, false);
        runs.add(9, true);
        let subset = runs.subset(4, 4);
        assert_eq!(subset.len(), 4);
        assert_eq!(subset.run_count(), 2);
        assert_eq!(subset.get_value(0), Some(false));
        assert_eq!(subset.get_value(2), Some(true));
        assert_eq!(runs.subset(4, 0).run_count(), 0);
    }
}
