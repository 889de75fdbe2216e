// Copyright (c) 2026 Bountyy Oy. All rights reserved.
//
// Case Store
//
// Insertion-ordered mapping from case label to a bounded sample window
// and the return value the caller associates with that case. Statistics
// are recomputed inside every append so they can never go stale.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::statistics;
use super::window::SampleWindow;
use crate::signals::Signal;

/// Opaque, stable case identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseLabel(String);

impl CaseLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseLabel {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CaseLabel {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Mean and population stddev over a case's current window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaseStatistics {
    pub mean: f64,
    pub stddev: f64,
}

/// One observed bucket of response behavior
#[derive(Debug, Clone)]
pub struct Case<R> {
    label: CaseLabel,
    return_value: R,
    samples: SampleWindow<Signal>,
    statistics: Option<CaseStatistics>,
}

impl<R> Case<R> {
    fn new(label: CaseLabel, return_value: R, capacity: usize) -> Self {
        Self {
            label,
            return_value,
            samples: SampleWindow::new(capacity),
            statistics: None,
        }
    }

    pub fn label(&self) -> &CaseLabel {
        &self.label
    }

    pub fn return_value(&self) -> &R {
        &self.return_value
    }

    pub fn samples(&self) -> &SampleWindow<Signal> {
        &self.samples
    }

    /// Numeric statistics; None while the window holds text samples
    pub fn statistics(&self) -> Option<CaseStatistics> {
        self.statistics
    }

    pub fn mean(&self) -> Option<f64> {
        self.statistics.map(|s| s.mean)
    }

    pub fn stddev(&self) -> Option<f64> {
        self.statistics.map(|s| s.stddev)
    }

    /// Numeric view of the window, oldest first. Text samples are skipped.
    pub fn numeric_samples(&self) -> Vec<f64> {
        self.samples.iter().filter_map(Signal::as_f64).collect()
    }

    fn push(&mut self, value: Signal) {
        self.samples.push(value);
        self.recompute();
    }

    fn recompute(&mut self) {
        let values = self.numeric_samples();
        self.statistics = if !values.is_empty() && values.len() == self.samples.len() {
            let mean = statistics::mean(&values);
            Some(CaseStatistics {
                mean,
                stddev: statistics::stddev(&values, mean),
            })
        } else {
            None
        };
    }
}

/// Per-requester case model
#[derive(Debug, Clone)]
pub struct CaseStore<R> {
    cases: Vec<Case<R>>,
    index: HashMap<CaseLabel, usize>,
    capacity: usize,
}

impl<R> CaseStore<R> {
    pub fn new(capacity: usize) -> Self {
        Self {
            cases: Vec::new(),
            index: HashMap::new(),
            capacity,
        }
    }

    /// Create the case if absent. An existing case keeps its return value.
    /// Returns true when a case was created.
    pub fn ensure_case(&mut self, label: CaseLabel, return_value: R) -> bool {
        if self.index.contains_key(&label) {
            return false;
        }
        self.index.insert(label.clone(), self.cases.len());
        self.cases.push(Case::new(label, return_value, self.capacity));
        true
    }

    /// Append a sample to a case's window, evicting the oldest when full.
    /// Returns None when the label is unknown.
    pub fn append_sample(&mut self, label: &CaseLabel, value: Signal) -> Option<&Case<R>> {
        let idx = *self.index.get(label)?;
        let case = &mut self.cases[idx];
        case.push(value);
        Some(&*case)
    }

    pub fn get_case(&self, label: &CaseLabel) -> Option<&Case<R>> {
        self.index.get(label).map(|&idx| &self.cases[idx])
    }

    /// Cases in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Case<R>> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Next free auto-generated label (`case-0`, `case-1`, ...)
    pub fn next_label(&self) -> CaseLabel {
        let mut n = self.cases.len();
        loop {
            let label = CaseLabel(format!("case-{}", n));
            if !self.index.contains_key(&label) {
                return label;
            }
            n += 1;
        }
    }
}
