//! Whole-session averages and maxima for sensor values.

/// Running sum, count and maximum of the positive values seen in a session.
///
/// Zero readings are treated as "no data" and do not move the average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningStat {
    /// Sum of accepted values
    sum: u64,
    /// Number of accepted values
    count: u32,
    /// Maximum accepted value
    max: u16,
}

impl RunningStat {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value. Returns `false` if it was ignored.
    pub fn add(&mut self, value: u16) -> bool {
        if value == 0 {
            return false;
        }

        self.sum += value as u64;
        self.count += 1;
        self.max = self.max.max(value);
        true
    }

    /// Number of accepted values.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Mean of accepted values, rounded to the nearest integer.
    pub fn average(&self) -> Option<u16> {
        if self.count > 0 {
            Some((self.sum as f64 / self.count as f64).round() as u16)
        } else {
            None
        }
    }

    /// Largest accepted value.
    pub fn max(&self) -> Option<u16> {
        if self.count > 0 {
            Some(self.max)
        } else {
            None
        }
    }

    /// Forget all values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
