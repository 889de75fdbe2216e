// Copyright (c) 2026 Bountyy Oy. All rights reserved.
//
// Bounded FIFO sample window
//
// Each case keeps only its most recent samples so the model follows a
// slowly drifting baseline instead of the whole run history.

use std::collections::VecDeque;

/// Default number of samples retained per case
pub const DEFAULT_WINDOW_CAPACITY: usize = 10;

/// Fixed-capacity ring of samples, oldest evicted first
#[derive(Debug, Clone, PartialEq)]
pub struct SampleWindow<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> SampleWindow<T> {
    /// Create an empty window. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a sample, returning the evicted one if the window was full
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.samples.contains(value)
    }
}

impl<T: Clone> SampleWindow<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.samples.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction_keeps_most_recent() {
        let mut window = SampleWindow::new(10);
        for i in 0..15 {
            window.push(i);
        }
        assert_eq!(window.len(), 10);
        assert_eq!(window.to_vec(), (5..15).collect::<Vec<_>>());
    }

    #[test]
    fn test_push_reports_evicted_sample() {
        let mut window = SampleWindow::new(2);
        assert_eq!(window.push("a"), None);
        assert_eq!(window.push("b"), None);
        assert_eq!(window.push("c"), Some("a"));
        assert!(window.contains(&"c"));
        assert!(!window.contains(&"a"));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut window = SampleWindow::new(0);
        assert_eq!(window.capacity(), 1);
        window.push(1.0);
        window.push(2.0);
        assert_eq!(window.to_vec(), vec![2.0]);
    }
}
