// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Oracle Error Types
 * Error taxonomy for the blind-injection oracle core
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary - Enterprise Edition
 */

use std::time::Duration;
use thiserror::Error;

/// Main oracle error type
#[derive(Error, Debug)]
pub enum OracleError {
    /// Transport collaborator failed; core state was not touched
    #[error("Send request failed: {0}")]
    SendRequestFailed(#[from] TransportError),

    /// Two cases with different return values are no longer separable
    #[error(
        "True/false range overlap between '{first}' and '{second}': \
         mean gap {mean_gap:.4} <= 2 x avg stddev {avg_stddev:.4}"
    )]
    TrueFalseRangeOverlap {
        first: String,
        second: String,
        mean_gap: f64,
        avg_stddev: f64,
    },

    /// Numeric boundaries did not bracket the signal exactly once
    #[error("Cannot determine case for signal {signal}: {matches} cases matched")]
    CannotDetermineCase { signal: String, matches: usize },

    /// Probe attempted after the requester entered the fatal state
    #[error("Requester halted: {reason}")]
    Halted { reason: String },

    /// Signal kind does not fit the configured classifier
    #[error("Signal mismatch: expected {expected} signal, got {found}")]
    SignalMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Transport-level errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection timeout after {timeout:?} to {url}")]
    ConnectionTimeout { url: String, timeout: Duration },

    #[error("Connection refused for {url}")]
    ConnectionRefused { url: String },

    #[error("Connection reset by peer for {url}")]
    ConnectionReset { url: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::ConnectionTimeout { .. } => true,
            TransportError::ConnectionReset { .. } => true,
            TransportError::ConnectionRefused { .. } => false,
            TransportError::InvalidUrl { .. } => false,
            TransportError::Other(_) => false,
        }
    }
}

impl OracleError {
    /// Terminal errors end the extraction session that owns the requester
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OracleError::TrueFalseRangeOverlap { .. }
                | OracleError::CannotDetermineCase { .. }
                | OracleError::Halted { .. }
        )
    }

    /// Check if error is retryable at the caller's discretion
    pub fn is_retryable(&self) -> bool {
        match self {
            OracleError::SendRequestFailed(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl TransportError {
    /// Classify a reqwest failure. `timeout` is the client's configured
    /// request timeout, reported on timeouts.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();

        if err.is_timeout() {
            TransportError::ConnectionTimeout { url, timeout }
        } else if err.is_connect() {
            TransportError::ConnectionRefused { url }
        } else if err.is_builder() {
            TransportError::InvalidUrl { url }
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Result type for oracle operations
pub type OracleResult<T> = Result<T, OracleError>;
