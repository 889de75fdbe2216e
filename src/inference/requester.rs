// Copyright (c) 2026 Bountyy Oy. All rights reserved.
//
// Requester
//
// Owns one oracle's probe lifecycle:
//
//   render -> send -> extract signal -> classify -> update case store
//          -> recompute statistics -> overlap guard -> return value
//
// Transport I/O happens outside the lock. Everything from classification
// to the overlap check runs as one critical section per requester, since
// every decision depends on all updates before it.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::case_store::{CaseLabel, CaseStore};
use super::classifier::{select_classifier, Classifier};
use super::overlap::OverlapGuard;
use crate::config::{ConfigValidator, RequesterConfig};
use crate::errors::{OracleError, OracleResult};
use crate::http_client::Transport;
use crate::signals::{extract_signal, Signal};
use crate::template::RenderRequest;

/// Lifecycle of a requester's statistical model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequesterState {
    /// No cases yet
    Init,
    /// Exactly one case, created by the first probe
    Bootstrapped,
    /// Two or more cases
    Calibrating,
    /// Overlap or classification failure; no further probes accepted
    Fatal,
}

/// How the case for a signal is chosen
enum Resolution<R> {
    /// Run the classifier; `expected` seeds any new case
    Classify { expected: R },
    /// Caller already knows the case
    Explicit { label: CaseLabel, return_value: R },
}

struct OracleState<R> {
    store: CaseStore<R>,
    state: RequesterState,
    fatal_reason: Option<String>,
    probes: u64,
}

/// Per-case summary for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseSnapshot<R> {
    pub label: CaseLabel,
    pub return_value: R,
    pub samples: Vec<Signal>,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
}

/// Point-in-time view of a requester's model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequesterSnapshot<R> {
    pub state: RequesterState,
    pub classifier: &'static str,
    pub probes: u64,
    pub fatal_reason: Option<String>,
    pub cases: Vec<CaseSnapshot<R>>,
}

pub struct Requester<R> {
    config: RequesterConfig,
    transport: Arc<dyn Transport>,
    template: Arc<dyn RenderRequest>,
    classifier: Box<dyn Classifier<R>>,
    guard: OverlapGuard,
    inner: Mutex<OracleState<R>>,
}

impl<R> Requester<R>
where
    R: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    pub fn new(
        config: RequesterConfig,
        transport: Arc<dyn Transport>,
        template: Arc<dyn RenderRequest>,
    ) -> OracleResult<Self> {
        ConfigValidator::validate_requester_config(&config)
            .map_err(|e| OracleError::Configuration(format!("{:#}", e)))?;

        let classifier = select_classifier(config.comparison_signal, config.match_mode);

        info!(
            "Requester ready: signal={}, classifier={}, window={}",
            config.comparison_signal.as_str(),
            classifier.name(),
            config.window_capacity
        );

        Ok(Self {
            inner: Mutex::new(OracleState {
                store: CaseStore::new(config.window_capacity),
                state: RequesterState::Init,
                fatal_reason: None,
                probes: 0,
            }),
            config,
            transport,
            template,
            classifier,
            guard: OverlapGuard,
        })
    }

    /// Probe `value` and return the return value of the case its response
    /// falls into. `expected` is only used when a new case has to be
    /// created: on the very first probe, or on a strict-mode miss.
    pub async fn make_request(&self, value: &str, expected: R) -> OracleResult<R> {
        let signal = self.probe(value).await?;
        self.record(signal, Resolution::Classify { expected })
    }

    /// Probe `value` and file the response under a known case, skipping
    /// classification. Used to calibrate with values of known truth.
    pub async fn make_request_as(
        &self,
        value: &str,
        label: impl Into<CaseLabel>,
        return_value: R,
    ) -> OracleResult<R> {
        let label = label.into();
        let signal = self.probe(value).await?;
        self.record(
            signal,
            Resolution::Explicit {
                label,
                return_value,
            },
        )
    }

    /// Run the decision critical section on an already-extracted signal
    pub fn classify_signal(&self, signal: Signal, expected: R) -> OracleResult<R> {
        self.record(signal, Resolution::Classify { expected })
    }

    /// File an already-extracted signal under a known case
    pub fn record_signal_as(
        &self,
        signal: Signal,
        label: impl Into<CaseLabel>,
        return_value: R,
    ) -> OracleResult<R> {
        self.record(
            signal,
            Resolution::Explicit {
                label: label.into(),
                return_value,
            },
        )
    }

    pub fn state(&self) -> RequesterState {
        self.inner.lock().state
    }

    pub fn case_count(&self) -> usize {
        self.inner.lock().store.len()
    }

    pub fn config(&self) -> &RequesterConfig {
        &self.config
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub fn snapshot(&self) -> RequesterSnapshot<R> {
        let inner = self.inner.lock();
        RequesterSnapshot {
            state: inner.state,
            classifier: self.classifier.name(),
            probes: inner.probes,
            fatal_reason: inner.fatal_reason.clone(),
            cases: inner
                .store
                .iter()
                .map(|case| CaseSnapshot {
                    label: case.label().clone(),
                    return_value: case.return_value().clone(),
                    samples: case.samples().to_vec(),
                    mean: case.mean(),
                    stddev: case.stddev(),
                })
                .collect(),
        }
    }

    fn ensure_live(&self) -> OracleResult<()> {
        let inner = self.inner.lock();
        if inner.state == RequesterState::Fatal {
            return Err(halted(&*inner));
        }
        Ok(())
    }

    /// Render, send and extract. Never touches the case store.
    async fn probe(&self, value: &str) -> OracleResult<Signal> {
        self.ensure_live()?;

        let request = self.template.render(value);
        let response = self.transport.send(&request).await.map_err(|e| {
            warn!("Probe request to {} failed: {}", request.url, e);
            OracleError::SendRequestFailed(e)
        })?;

        Ok(extract_signal(&response, self.config.comparison_signal))
    }

    fn record(&self, signal: Signal, resolution: Resolution<R>) -> OracleResult<R> {
        let mut inner = self.inner.lock();

        if inner.state == RequesterState::Fatal {
            return Err(halted(&*inner));
        }

        self.check_signal(&signal)?;

        let outcome = self.resolve(&mut inner, signal, resolution);

        if let Err(e) = &outcome {
            if e.is_fatal() {
                error!("Oracle is no longer reliable, halting requester: {}", e);
                inner.state = RequesterState::Fatal;
                inner.fatal_reason = Some(e.to_string());
            }
        }

        outcome
    }

    /// Reject signals the configured comparison cannot use before they
    /// reach the store. A text sample in a numeric model leaves a case
    /// without statistics, and a NaN mean can never be bracketed.
    fn check_signal(&self, signal: &Signal) -> OracleResult<()> {
        let expected = self.config.comparison_signal;
        match signal {
            Signal::Numeric(v) if expected.is_numeric() && !v.is_finite() => {
                Err(OracleError::SignalMismatch {
                    expected: "finite numeric",
                    found: "non-finite numeric",
                })
            }
            Signal::Numeric(_) if expected.is_numeric() => Ok(()),
            Signal::Text(_) if !expected.is_numeric() => Ok(()),
            _ => Err(OracleError::SignalMismatch {
                expected: if expected.is_numeric() { "numeric" } else { "text" },
                found: signal.kind(),
            }),
        }
    }

    fn resolve(
        &self,
        inner: &mut OracleState<R>,
        signal: Signal,
        resolution: Resolution<R>,
    ) -> OracleResult<R> {
        let label = match resolution {
            Resolution::Explicit {
                label,
                return_value,
            } => {
                if inner.store.ensure_case(label.clone(), return_value) {
                    info!("Created case '{}' from explicit calibration", label);
                }
                label
            }
            Resolution::Classify { expected } if inner.store.is_empty() => {
                let label = inner.store.next_label();
                info!("Bootstrapping first case '{}' ({:?})", label, expected);
                inner.store.ensure_case(label.clone(), expected);
                label
            }
            Resolution::Classify { expected } => {
                match self.classifier.classify(&signal, &inner.store)? {
                    Some(label) => label,
                    None => {
                        let label = inner.store.next_label();
                        info!("No case matched {}, creating '{}' ({:?})", signal, label, expected);
                        inner.store.ensure_case(label.clone(), expected);
                        label
                    }
                }
            }
        };

        debug!("Signal {} -> case '{}'", signal, label);

        let return_value = inner
            .store
            .append_sample(&label, signal)
            .map(|case| case.return_value().clone())
            .ok_or_else(|| OracleError::CannotDetermineCase {
                signal: format!("<case '{}' missing after insert>", label),
                matches: 0,
            })?;

        inner.probes += 1;
        inner.state = if inner.store.len() >= 2 {
            RequesterState::Calibrating
        } else {
            RequesterState::Bootstrapped
        };

        if self.classifier.requires_overlap_guard() {
            self.guard.check(&inner.store)?;
        }

        Ok(return_value)
    }
}

fn halted<R>(inner: &OracleState<R>) -> OracleError {
    OracleError::Halted {
        reason: inner
            .fatal_reason
            .clone()
            .unwrap_or_else(|| "requester is in fatal state".to_string()),
    }
}
