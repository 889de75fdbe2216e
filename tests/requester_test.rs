// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Requester Tests
 * Probe lifecycle, bootstrap, calibration, overlap and transport isolation
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use async_trait::async_trait;
use lonkero_oracle::config::{ComparisonSignal, MatchMode, RequesterConfig};
use lonkero_oracle::http_client::{HttpResponse, Transport};
use lonkero_oracle::inference::{Requester, RequesterState};
use lonkero_oracle::template::{ProbeRequest, QueryTemplate};
use lonkero_oracle::{OracleError, TransportError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Replays a fixed sequence of timings; `None` entries fail at the socket
struct ScriptedTransport {
    script: Mutex<VecDeque<Option<f64>>>,
}

impl ScriptedTransport {
    fn new(script: &[Option<f64>]) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.iter().copied().collect()),
        })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ProbeRequest) -> Result<HttpResponse, TransportError> {
        match self.script.lock().pop_front() {
            Some(Some(duration_ms)) => Ok(HttpResponse {
                status_code: 200,
                body: String::new(),
                duration_ms,
            }),
            Some(None) => Err(TransportError::ConnectionReset {
                url: request.url.clone(),
            }),
            None => Err(TransportError::Other("script exhausted".to_string())),
        }
    }
}

fn timing_requester(script: &[Option<f64>]) -> Requester<bool> {
    let config = RequesterConfig::default().with_signal(ComparisonSignal::Time);
    let template = QueryTemplate::get("http://target.test/item?id={value}").unwrap();
    Requester::new(config, ScriptedTransport::new(script), Arc::new(template)).unwrap()
}

#[tokio::test]
async fn test_timing_oracle_scenario() {
    let requester = timing_requester(&[
        Some(100.0),
        Some(101.0),
        Some(99.0),
        Some(500.0),
        Some(510.0),
        Some(495.0),
        Some(102.0),
        Some(480.0),
    ]);

    for _ in 0..3 {
        assert!(requester.make_request_as("1=1", "true", true).await.unwrap());
    }
    for _ in 0..3 {
        assert!(!requester.make_request_as("1=2", "false", false).await.unwrap());
    }

    let snapshot = requester.snapshot();
    assert_eq!(snapshot.cases.len(), 2);
    assert_eq!(snapshot.state, RequesterState::Calibrating);
    assert!((snapshot.cases[0].mean.unwrap() - 100.0).abs() < 1e-9);
    assert!((snapshot.cases[1].mean.unwrap() - 501.666_666).abs() < 1e-3);

    // the caller's expectation is ignored once cases exist
    assert!(requester.make_request("ascii(c)>64", false).await.unwrap());
    assert!(!requester.make_request("ascii(c)>96", true).await.unwrap());
    assert_eq!(requester.snapshot().probes, 8);
}

#[tokio::test]
async fn test_first_probe_creates_case_from_expected_value() {
    let requester = timing_requester(&[Some(250.0)]);
    assert_eq!(requester.state(), RequesterState::Init);

    assert!(!requester.make_request("1=2", false).await.unwrap());

    let snapshot = requester.snapshot();
    assert_eq!(snapshot.state, RequesterState::Bootstrapped);
    assert_eq!(snapshot.cases.len(), 1);
    assert_eq!(snapshot.cases[0].label.as_str(), "case-0");
    assert!(!snapshot.cases[0].return_value);
    assert_eq!(snapshot.cases[0].stddev, Some(0.0));
}

#[tokio::test]
async fn test_transport_failure_leaves_model_untouched() {
    let requester = timing_requester(&[Some(100.0), Some(400.0), None]);
    requester.make_request_as("1=1", "true", true).await.unwrap();
    requester.make_request_as("1=2", "false", false).await.unwrap();

    let before = requester.snapshot();
    let err = requester.make_request("1=1", true).await.unwrap_err();

    assert!(matches!(err, OracleError::SendRequestFailed(_)));
    assert!(err.is_retryable());
    assert!(!err.is_fatal());
    assert_eq!(requester.snapshot(), before);
}

#[tokio::test]
async fn test_transport_failure_before_bootstrap() {
    let requester = timing_requester(&[None, Some(90.0)]);
    assert!(requester.make_request("1=1", true).await.is_err());
    assert_eq!(requester.state(), RequesterState::Init);
    assert_eq!(requester.case_count(), 0);

    // next successful probe is still the bootstrap
    assert!(requester.make_request("1=1", true).await.unwrap());
    assert_eq!(requester.state(), RequesterState::Bootstrapped);
}

#[tokio::test]
async fn test_drift_into_overlap_is_fatal() {
    // FALSE responses creep toward the TRUE baseline until the guard trips
    let requester = timing_requester(&[
        Some(95.0),
        Some(105.0),
        Some(200.0),
        Some(140.0),
        Some(95.0),
        Some(999.0),
    ]);
    requester.make_request_as("t", "true", true).await.unwrap();
    requester.make_request_as("t", "true", true).await.unwrap();
    requester.make_request_as("f", "false", false).await.unwrap();
    requester.make_request_as("f", "false", false).await.unwrap();

    let err = requester.make_request_as("f", "false", false).await.unwrap_err();
    assert!(matches!(err, OracleError::TrueFalseRangeOverlap { .. }));
    assert!(err.is_fatal());
    assert_eq!(requester.state(), RequesterState::Fatal);

    let err = requester.make_request("t", true).await.unwrap_err();
    match err {
        OracleError::Halted { reason } => assert!(reason.contains("overlap")),
        other => panic!("expected Halted, got {other}"),
    }
}

#[tokio::test]
async fn test_boundary_signal_is_invariant_violation() {
    let requester = timing_requester(&[Some(100.0), Some(300.0), Some(200.0)]);
    requester.make_request_as("t", "true", true).await.unwrap();
    requester.make_request_as("f", "false", false).await.unwrap();

    let before = requester.snapshot();
    let err = requester.make_request("x", true).await.unwrap_err();
    assert!(matches!(err, OracleError::CannotDetermineCase { matches: 2, .. }));
    assert_eq!(requester.state(), RequesterState::Fatal);

    // nothing was appended for the ambiguous signal
    let after = requester.snapshot();
    assert_eq!(after.cases, before.cases);
    assert_eq!(after.probes, before.probes);
}

#[tokio::test]
async fn test_window_capacity_from_config() {
    let config = RequesterConfig::default()
        .with_signal(ComparisonSignal::Time)
        .with_window_capacity(3);
    let template = QueryTemplate::get("http://target.test/?q={value}").unwrap();
    let script: Vec<Option<f64>> = (0..6).map(|i| Some(10.0 + i as f64)).collect();
    let requester: Requester<u8> =
        Requester::new(config, ScriptedTransport::new(&script), Arc::new(template)).unwrap();

    for _ in 0..6 {
        requester.make_request("v", 7).await.unwrap();
    }

    let snapshot = requester.snapshot();
    assert_eq!(snapshot.cases.len(), 1);
    assert_eq!(snapshot.cases[0].samples.len(), 3);
    assert_eq!(snapshot.cases[0].mean, Some(14.0));
}

#[tokio::test]
async fn test_multi_way_return_values() {
    let config = RequesterConfig::default()
        .with_signal(ComparisonSignal::Time)
        .with_match_mode(MatchMode::Loose);
    let template = QueryTemplate::get("http://target.test/?q={value}").unwrap();
    let transport = ScriptedTransport::new(&[
        Some(10.0),
        Some(1000.0),
        Some(2000.0),
        Some(1100.0),
        Some(1900.0),
        Some(15.0),
    ]);
    let requester: Requester<char> = Requester::new(config, transport, Arc::new(template)).unwrap();

    requester.make_request_as("a", "a", 'a').await.unwrap();
    requester.make_request_as("b", "b", 'b').await.unwrap();
    requester.make_request_as("c", "c", 'c').await.unwrap();

    assert_eq!(requester.make_request("?", 'x').await.unwrap(), 'b');
    assert_eq!(requester.make_request("?", 'x').await.unwrap(), 'c');
    assert_eq!(requester.make_request("?", 'x').await.unwrap(), 'a');
}

#[tokio::test]
async fn test_invalid_config_rejected() {
    let config = RequesterConfig::default().with_window_capacity(0);
    let template = QueryTemplate::get("http://target.test/?q={value}").unwrap();
    let result: Result<Requester<bool>, _> =
        Requester::new(config, ScriptedTransport::new(&[]), Arc::new(template));
    assert!(matches!(result, Err(OracleError::Configuration(_))));
}
