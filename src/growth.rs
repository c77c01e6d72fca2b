/// Largest number of slots `GrowthPolicy::default()` adds in one step.
pub const DEFAULT_MAX_INCREMENT: usize = 4096;

/// Strategy used when an insertion finds the buffer full.
///
/// Explicit capacity requests (`reserve`, `resize`) are always exact; the
/// policy only decides how far `push`, `insert` and friends grow a full
/// buffer. A step of zero is treated as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthPolicy {
    /// Grow by a fixed number of slots.
    Fixed(usize),
    /// Grow by the current capacity, adding at most `max_increment` slots.
    Doubling {
        /// Upper bound of a single growth step.
        max_increment: usize,
    },
}

impl GrowthPolicy {
    /// Grow one slot at a time.
    pub const UNIT: Self = Self::Fixed(1);

    /// Number of slots to add to a full buffer of `capacity` slots.
    #[must_use]
    pub fn increment(&self, capacity: usize) -> usize {
        match *self {
            Self::Fixed(step) => step.max(1),
            Self::Doubling { max_increment } => capacity.min(max_increment).max(1),
        }
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::Doubling {
            max_increment: DEFAULT_MAX_INCREMENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_increment() {
        assert_eq!(GrowthPolicy::UNIT.increment(0), 1);
        assert_eq!(GrowthPolicy::UNIT.increment(100), 1);
        assert_eq!(GrowthPolicy::Fixed(8).increment(3), 8);
        assert_eq!(GrowthPolicy::Fixed(0).increment(3), 1);
    }

    #[test]
    fn test_doubling_increment() {
        let policy = GrowthPolicy::Doubling { max_increment: 16 };
        assert_eq!(policy.increment(0), 1);
        assert_eq!(policy.increment(1), 1);
        assert_eq!(policy.increment(4), 4);
        assert_eq!(policy.increment(16), 16);
        assert_eq!(policy.increment(1000), 16);
    }

    #[test]
    fn test_default_is_capped_doubling() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.increment(8), 8);
        assert_eq!(policy.increment(1 << 20), DEFAULT_MAX_INCREMENT);
    }
}
