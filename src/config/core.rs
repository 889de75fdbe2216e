// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::inference::window::DEFAULT_WINDOW_CAPACITY;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OracleConfig {
    #[validate(nested)]
    #[serde(default)]
    pub requester: RequesterConfig,

    #[validate(nested)]
    #[serde(default)]
    pub http: HttpClientConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RequesterConfig {
    #[serde(default)]
    pub comparison_signal: ComparisonSignal,

    #[serde(default)]
    pub match_mode: MatchMode,

    /// Accepted and stored; no strategy reads it yet
    #[validate(range(min = 0.0))]
    #[serde(default = "default_acceptable_deviation")]
    pub acceptable_deviation: f64,

    #[validate(range(min = 1, max = 10000))]
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct HttpClientConfig {
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[validate(range(max = 10))]
    #[serde(default)]
    pub max_retries: u32,

    #[serde(default)]
    pub method: HttpMethod,
}

/// Which scalar of a response the oracle compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonSignal {
    #[default]
    Size,
    Time,
    Text,
    Status,
}

impl ComparisonSignal {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ComparisonSignal::Text)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonSignal::Size => "size",
            ComparisonSignal::Time => "time",
            ComparisonSignal::Text => "text",
            ComparisonSignal::Status => "status",
        }
    }
}

/// Strict: exact sample membership. Loose: statistical/similarity matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    Strict,
    #[default]
    Loose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl Default for RequesterConfig {
    fn default() -> Self {
        Self {
            comparison_signal: ComparisonSignal::default(),
            match_mode: MatchMode::default(),
            acceptable_deviation: default_acceptable_deviation(),
            window_capacity: default_window_capacity(),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: 0,
            method: HttpMethod::default(),
        }
    }
}

impl RequesterConfig {
    pub fn with_signal(mut self, signal: ComparisonSignal) -> Self {
        self.comparison_signal = signal;
        self
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn with_window_capacity(mut self, capacity: usize) -> Self {
        self.window_capacity = capacity;
        self
    }
}

impl std::str::FromStr for ComparisonSignal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "size" | "length" => Ok(ComparisonSignal::Size),
            "time" | "timing" => Ok(ComparisonSignal::Time),
            "text" | "body" => Ok(ComparisonSignal::Text),
            "status" | "status_code" => Ok(ComparisonSignal::Status),
            _ => Err(anyhow::anyhow!("Invalid comparison signal: {}", s)),
        }
    }
}

impl std::str::FromStr for MatchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(MatchMode::Strict),
            "loose" => Ok(MatchMode::Loose),
            _ => Err(anyhow::anyhow!("Invalid match mode: {}", s)),
        }
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            _ => Err(anyhow::anyhow!("Unsupported HTTP method: {}", s)),
        }
    }
}

fn default_acceptable_deviation() -> f64 {
    0.6
}

fn default_window_capacity() -> usize {
    DEFAULT_WINDOW_CAPACITY
}

fn default_timeout() -> u64 {
    30
}
