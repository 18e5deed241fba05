//! Fixed-window trailing averages.

use std::collections::VecDeque;

/// Trailing moving average over the last `window` values.
///
/// Storage is allocated once; pushing never grows past the window.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    values: VecDeque<f32>,
    window: usize,
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            values: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Push a value and return the updated average
    pub fn push(&mut self, value: f32) -> f32 {
        if self.values.len() == self.window {
            self.values.pop_front();
        }
        self.values.push_back(value);
        self.average()
    }

    /// Current average, 0 when empty
    pub fn average(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_over_window() {
        let mut avg = MovingAverage::new(3);
        assert_eq!(avg.average(), 0.0);

        assert_eq!(avg.push(3.0), 3.0);
        assert_eq!(avg.push(6.0), 4.5);
        assert_eq!(avg.push(9.0), 6.0);

        // Oldest value (3.0) falls out
        assert_eq!(avg.push(12.0), 9.0);
        assert_eq!(avg.len(), 3);
    }

    #[test]
    fn test_single_spike_is_damped() {
        let mut avg = MovingAverage::new(5);
        for _ in 0..4 {
            avg.push(0.0);
        }
        let smoothed = avg.push(1.0);
        assert!((smoothed - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_zero_window_treated_as_one() {
        let mut avg = MovingAverage::new(0);
        avg.push(1.0);
        assert_eq!(avg.push(2.0), 2.0);
    }
}
