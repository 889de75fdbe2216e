// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Signal Extraction
 * Turns a raw transport response into the one value the oracle compares
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use crate::config::ComparisonSignal;
use crate::http_client::HttpResponse;

/// A comparison signal taken from one response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Signal {
    Numeric(f64),
    Text(String),
}

impl Signal {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Signal::Numeric(v) => Some(*v),
            Signal::Text(_) => None,
        }
    }

    /// Text view of the signal; numeric signals are formatted
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Signal::Text(s) => Cow::Borrowed(s.as_str()),
            Signal::Numeric(v) => Cow::Owned(v.to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Signal::Numeric(_) => "numeric",
            Signal::Text(_) => "text",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Numeric(v) => write!(f, "{}", v),
            // Bodies can be large; keep log lines readable
            Signal::Text(s) if s.chars().count() > 64 => {
                let head: String = s.chars().take(64).collect();
                write!(f, "{:?}... ({} bytes)", head, s.len())
            }
            Signal::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<f64> for Signal {
    fn from(value: f64) -> Self {
        Signal::Numeric(value)
    }
}

impl From<&str> for Signal {
    fn from(value: &str) -> Self {
        Signal::Text(value.to_string())
    }
}

impl From<String> for Signal {
    fn from(value: String) -> Self {
        Signal::Text(value)
    }
}

/// Extract the configured comparison signal from a response
pub fn extract_signal(response: &HttpResponse, mode: ComparisonSignal) -> Signal {
    match mode {
        ComparisonSignal::Size => Signal::Numeric(response.body.len() as f64),
        ComparisonSignal::Time => Signal::Numeric(response.duration_ms),
        ComparisonSignal::Status => Signal::Numeric(f64::from(response.status_code)),
        ComparisonSignal::Text => Signal::Text(response.body.clone()),
    }
}
