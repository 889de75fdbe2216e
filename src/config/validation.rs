// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use validator::Validate;

use super::core::{OracleConfig, RequesterConfig};

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate_oracle_config(config: &OracleConfig) -> Result<()> {
        config.validate().context("Configuration validation failed")?;

        Self::validate_requester_config(&config.requester)?;

        Ok(())
    }

    pub fn validate_requester_config(config: &RequesterConfig) -> Result<()> {
        config
            .validate()
            .context("Requester configuration validation failed")?;

        if !config.acceptable_deviation.is_finite() {
            return Err(anyhow::anyhow!("acceptable_deviation must be a finite number"));
        }

        Ok(())
    }
}
