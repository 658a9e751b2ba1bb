use core::ops::Range;

use super::Runs;

/// One run borrowed from a [`ValueRuns`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Run<'a, T> {
    pub start: usize,
    pub limit: usize,
    pub value: &'a T,
}

impl<T> Run<'_, T> {
    pub fn range(&self) -> Range<usize> {
        self.start..self.limit
    }
}

/// Generic run-length sequence of values.
///
/// Consecutive runs may carry equal values; nothing is coalesced. `add`
/// does not validate ordering, callers (usually [`super::ValueRunBuilder`])
/// keep limits ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRuns<T> {
    limits: Vec<usize>,
    values: Vec<T>,
}

impl<T> Default for ValueRuns<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ValueRuns<T> {
    pub fn new() -> Self {
        Self {
            limits: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            limits: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// A single run of `value` covering `[0, length)`.
    pub fn single(length: usize, value: T) -> Self {
        let mut runs = Self::with_capacity(1);
        runs.add(length, value);
        runs
    }

    /// Append a run ending at `limit`.
    pub fn add(&mut self, limit: usize, value: T) {
        self.limits.push(limit);
        self.values.push(value);
    }

    /// Total covered length (the last limit).
    pub fn len(&self) -> usize {
        self.limits.last().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn run_count(&self) -> usize {
        self.limits.len()
    }

    pub fn limits(&self) -> &[usize] {
        &self.limits
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Index of the run containing character `index`.
    pub fn get_run_containing_index(&self, index: usize) -> Option<usize> {
        let run = self.limits.partition_point(|&limit| limit <= index);
        (run < self.limits.len()).then_some(run)
    }

    /// Value in effect at character `index`.
    pub fn get_value(&self, index: usize) -> Option<&T> {
        self.get_run_containing_index(index).map(|run| &self.values[run])
    }

    pub fn run(&self, index: usize) -> Option<Run<'_, T>> {
        let limit = *self.limits.get(index)?;
        let start = if index == 0 { 0 } else { self.limits[index - 1] };
        Some(Run {
            start,
            limit,
            value: &self.values[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Run<'_, T>> + '_ {
        (0..self.limits.len()).filter_map(move |i| self.run(i))
    }

    /// Call `f(start, limit, value)` for every run intersecting
    /// `[start, end)`, clipped to that range.
    pub fn for_each_run_in_range<F>(&self, start: usize, end: usize, mut f: F)
    where
        F: FnMut(usize, usize, &T),
    {
        if start >= end {
            return;
        }
        let Some(first) = self.get_run_containing_index(start) else {
            return;
        };
        for run in self.iter().skip(first) {
            if run.start >= end {
                break;
            }
            f(run.start.max(start), run.limit.min(end), run.value);
        }
    }
}

impl<T: Clone> ValueRuns<T> {
    /// Runs covering `[offset, offset + length)`, re-based so the subset
    /// starts at zero. Used to feed a slice of the input to a nested layout.
    pub fn get_runs_subset(&self, offset: usize, length: usize) -> ValueRuns<T> {
        let mut subset = ValueRuns::new();
        self.for_each_run_in_range(offset, offset + length, |_, limit, value| {
            subset.add(limit - offset, value.clone());
        });
        subset
    }
}

impl<T: Clone> Runs for ValueRuns<T> {
    type Value = T;

    fn run_count(&self) -> usize {
        self.limits.len()
    }

    fn run_limit(&self, index: usize) -> usize {
        self.limits[index]
    }

    fn run_value(&self, index: usize) -> T {
        self.values[index].clone()
    }
}
