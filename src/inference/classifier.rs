// Copyright (c) 2026 Bountyy Oy. All rights reserved.
//
// Case Classifiers
//
// Each strategy maps a fresh signal onto an existing case, or reports
// that no case matched (Ok(None)), which the requester treats as
// "create the next case".
//
// - Strict: exact membership in a case's sample window
// - Numeric: midpoint boundaries between mean-sorted cases
// - Text similarity: case owning the single most similar stored body

use similar::TextDiff;
use tracing::debug;

use super::case_store::{CaseLabel, CaseStore};
use crate::config::{ComparisonSignal, MatchMode};
use crate::errors::{OracleError, OracleResult};
use crate::signals::Signal;

/// Assigns a signal to the best-matching case
pub trait Classifier<R>: Send + Sync {
    /// Ok(None) means no case matched; it is not an error.
    fn classify(&self, signal: &Signal, store: &CaseStore<R>) -> OracleResult<Option<CaseLabel>>;

    /// Strategy name for logs and snapshots
    fn name(&self) -> &'static str;

    /// Whether true/false separation must be checked after each update
    fn requires_overlap_guard(&self) -> bool {
        false
    }
}

/// Pick the strategy for a signal/match-mode combination
pub fn select_classifier<R: 'static>(
    signal: ComparisonSignal,
    mode: MatchMode,
) -> Box<dyn Classifier<R>> {
    match (mode, signal.is_numeric()) {
        (MatchMode::Strict, _) => Box::new(StrictClassifier),
        (MatchMode::Loose, true) => Box::new(NumericClassifier),
        (MatchMode::Loose, false) => Box::new(TextSimilarityClassifier),
    }
}

/// Exact-value membership
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictClassifier;

impl<R> Classifier<R> for StrictClassifier {
    fn classify(&self, signal: &Signal, store: &CaseStore<R>) -> OracleResult<Option<CaseLabel>> {
        Ok(store
            .iter()
            .find(|case| case.samples().contains(signal))
            .map(|case| case.label().clone()))
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}

/// Midpoint-boundary classification over case means
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericClassifier;

impl<R> Classifier<R> for NumericClassifier {
    fn classify(&self, signal: &Signal, store: &CaseStore<R>) -> OracleResult<Option<CaseLabel>> {
        let value = signal.as_f64().ok_or(OracleError::SignalMismatch {
            expected: "numeric",
            found: signal.kind(),
        })?;

        let mut ordered: Vec<(&CaseLabel, f64)> = store
            .iter()
            .filter_map(|case| case.mean().map(|mean| (case.label(), mean)))
            .collect();

        if ordered.is_empty() {
            return Ok(None);
        }

        // sort_by is stable: equal means keep creation order
        ordered.sort_by(|a, b| a.1.total_cmp(&b.1));

        let last = ordered.len() - 1;
        let matches: Vec<&CaseLabel> = ordered
            .iter()
            .enumerate()
            .filter(|&(i, &(_, mean))| {
                let lower = (i > 0).then(|| (ordered[i - 1].1 + mean) / 2.0);
                let upper = (i < last).then(|| (mean + ordered[i + 1].1) / 2.0);
                lower.map_or(true, |lo| value >= lo) && upper.map_or(true, |hi| value <= hi)
            })
            .map(|(_, &(label, _))| label)
            .collect();

        match matches.as_slice() {
            [only] => {
                debug!("Numeric signal {} bracketed by case '{}'", value, only);
                Ok(Some((*only).clone()))
            }
            _ => Err(OracleError::CannotDetermineCase {
                signal: value.to_string(),
                matches: matches.len(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "numeric"
    }

    fn requires_overlap_guard(&self) -> bool {
        true
    }
}

/// Highest single-sample similarity across every case
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSimilarityClassifier;

impl<R> Classifier<R> for TextSimilarityClassifier {
    fn classify(&self, signal: &Signal, store: &CaseStore<R>) -> OracleResult<Option<CaseLabel>> {
        let needle = signal.as_text();
        let mut best: Option<(&CaseLabel, f64)> = None;

        for case in store.iter() {
            for sample in case.samples().iter() {
                let ratio = similarity_ratio(&needle, &sample.as_text());
                // strict '>' keeps the first-found sample on ties
                if best.map_or(true, |(_, top)| ratio > top) {
                    best = Some((case.label(), ratio));
                }
            }
        }

        if let Some((label, ratio)) = best {
            debug!("Text signal closest to case '{}' (ratio {:.3})", label, ratio);
        }

        Ok(best.map(|(label, _)| label.clone()))
    }

    fn name(&self) -> &'static str {
        "text-similarity"
    }
}

/// Character-level sequence similarity in [0, 1]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    TextDiff::from_chars(a, b).ratio().into()
}
