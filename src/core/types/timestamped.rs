//! Generic timestamped wrapper.

use serde::{Deserialize, Serialize};

/// A value paired with its acquisition time in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timestamped<T> {
    /// The wrapped value.
    pub data: T,
    /// Timestamp in microseconds.
    pub timestamp_us: u64,
}

impl<T> Timestamped<T> {
    /// Wrap a value with a timestamp.
    pub fn new(data: T, timestamp_us: u64) -> Self {
        Self { data, timestamp_us }
    }

    /// Elapsed seconds from `earlier` to this value.
    ///
    /// Saturates at zero if `earlier` is actually later.
    pub fn seconds_since<U>(&self, earlier: &Timestamped<U>) -> f64 {
        self.timestamp_us.saturating_sub(earlier.timestamp_us) as f64 / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_since() {
        let a = Timestamped::new((), 1_000_000);
        let b = Timestamped::new((), 3_500_000);
        assert_eq!(b.seconds_since(&a), 2.5);
        assert_eq!(a.seconds_since(&b), 0.0);
    }
}
