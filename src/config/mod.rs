// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

pub mod core;
pub mod loader;
pub mod validation;

pub use self::core::{
    ComparisonSignal, HttpClientConfig, HttpMethod, MatchMode, OracleConfig, RequesterConfig,
};

pub use loader::{load_from_env, ConfigFormat, ConfigLoader};

pub use validation::ConfigValidator;
