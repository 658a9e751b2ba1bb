use super::ValueRuns;

/// Stack-based construction of [`ValueRuns`] for nested scopes.
///
/// The stack is seeded with a base value that is never popped. Every
/// boundary closes the open run with the value on top of the stack; runs
/// of zero width are not recorded, so the finished runs cover
/// `[0, length)` exactly.
#[derive(Debug, Clone)]
pub struct ValueRunBuilder<T> {
    stack: Vec<T>,
    runs: ValueRuns<T>,
    last_limit: usize,
}

impl<T: Clone> ValueRunBuilder<T> {
    pub fn new(base: T) -> Self {
        Self {
            stack: vec![base],
            runs: ValueRuns::new(),
            last_limit: 0,
        }
    }

    /// Value on top of the stack.
    pub fn current(&self) -> &T {
        // The base value is never popped.
        &self.stack[self.stack.len() - 1]
    }

    /// Nesting depth above the base value.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Close the open run at `limit` and make `value` current.
    pub fn push(&mut self, limit: usize, value: T) {
        self.close(limit);
        self.stack.push(value);
    }

    /// Close the open run at `limit` and restore the previous value.
    ///
    /// Returns `false` (and leaves the stack alone) when only the base
    /// value remains.
    pub fn pop(&mut self, limit: usize) -> bool {
        if self.stack.len() == 1 {
            return false;
        }
        self.close(limit);
        self.stack.pop();
        true
    }

    /// Close the final run at `length` and return the runs.
    pub fn finish(mut self, length: usize) -> ValueRuns<T> {
        self.close(length);
        self.runs
    }

    fn close(&mut self, limit: usize) {
        if limit > self.last_limit {
            let value = self.current().clone();
            self.runs.add(limit, value);
            self.last_limit = limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_scopes_restore_outer_value() {
        let mut builder = ValueRunBuilder::new(0u8);
        builder.push(2, 1);
        builder.push(4, 2);
        assert!(builder.pop(6));
        assert!(builder.pop(8));
        let runs = builder.finish(10);
        assert_eq!(runs.limits(), &[2, 4, 6, 8, 10]);
        assert_eq!(runs.values(), &[0, 1, 2, 1, 0]);
    }

    #[test]
    fn empty_scope_keeps_base_value_everywhere() {
        let mut builder = ValueRunBuilder::new(false);
        builder.push(3, true);
        assert!(builder.pop(3));
        let runs = builder.finish(7);
        assert_eq!(runs.len(), 7);
        for i in 0..7 {
            assert_eq!(runs.get_value(i), Some(&false));
        }
    }

    #[test]
    fn empty_builder_covers_whole_range() {
        let runs = ValueRunBuilder::new(false).finish(5);
        assert_eq!(runs.limits(), &[5]);
        assert_eq!(runs.values(), &[false]);
    }

    #[test]
    fn base_value_cannot_be_popped() {
        let mut builder = ValueRunBuilder::new('x');
        assert!(!builder.pop(1));
        assert_eq!(builder.depth(), 0);
        assert_eq!(builder.finish(2).values(), &['x']);
    }
}
