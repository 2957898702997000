//! Bounded color history for temporal smoothing

use std::collections::VecDeque;

use super::Color;

/// Fixed-capacity FIFO of recent colors.
///
/// Pushing onto a full history evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct ColorHistory {
    samples: VecDeque<Color>,
    capacity: usize,
}

impl ColorHistory {
    /// Create an empty history. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_saturated(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Append a sample, returning the evicted one if the history was full
    pub fn push(&mut self, color: Color) -> Option<Color> {
        let evicted = if self.is_saturated() {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(color);
        evicted
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Oldest-first iteration
    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.samples.iter()
    }

    /// Componentwise mean of the stored samples, rounded to nearest.
    ///
    /// Returns `None` when empty.
    pub fn mean(&self) -> Option<Color> {
        if self.samples.is_empty() {
            return None;
        }

        let (r, g, b) = self.samples.iter().fold((0u64, 0u64, 0u64), |acc, c| {
            (acc.0 + c.r as u64, acc.1 + c.g as u64, acc.2 + c.b as u64)
        });
        let n = self.samples.len() as u64;

        Some(Color::new(
            rounded_div(r, n),
            rounded_div(g, n),
            rounded_div(b, n),
        ))
    }
}

/// Integer division rounding halves up; exact for every sum of u8 samples
pub(crate) fn rounded_div(sum: u64, count: u64) -> u8 {
    ((2 * sum + count) / (2 * count)).min(255) as u8
}
