// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe Templates
 * Renders an opaque probe value into a concrete HTTP request
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::config::HttpMethod;
use crate::errors::{OracleError, OracleResult};

/// Placeholder replaced by the probe value
pub const VALUE_PLACEHOLDER: &str = "{value}";

/// A fully rendered request, ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
}

/// Templating collaborator: pure function of the probe value
pub trait RenderRequest: Send + Sync {
    fn render(&self, value: &str) -> ProbeRequest;
}

/// URL (and optional form body) template with a `{value}` placeholder
#[derive(Debug, Clone)]
pub struct QueryTemplate {
    method: HttpMethod,
    url: String,
    body: Option<String>,
}

impl QueryTemplate {
    /// GET template; the placeholder must appear in the URL
    pub fn get(url: impl Into<String>) -> OracleResult<Self> {
        Self::new(HttpMethod::Get, url.into(), None)
    }

    /// POST template; the placeholder may appear in the URL or the body
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> OracleResult<Self> {
        Self::new(HttpMethod::Post, url.into(), Some(body.into()))
    }

    pub fn new(method: HttpMethod, url: String, body: Option<String>) -> OracleResult<Self> {
        let in_url = url.contains(VALUE_PLACEHOLDER);
        let in_body = body.as_deref().is_some_and(|b| b.contains(VALUE_PLACEHOLDER));
        if !in_url && !in_body {
            return Err(OracleError::Configuration(format!(
                "Template has no {} placeholder: {}",
                VALUE_PLACEHOLDER, url
            )));
        }

        // Validate with a neutral value so the placeholder itself is not parsed
        let probe = url.replace(VALUE_PLACEHOLDER, "1");
        url::Url::parse(&probe).map_err(|e| {
            OracleError::Configuration(format!("Invalid template URL {}: {}", url, e))
        })?;

        Ok(Self { method, url, body })
    }
}

impl RenderRequest for QueryTemplate {
    fn render(&self, value: &str) -> ProbeRequest {
        let encoded = urlencoding::encode(value);
        ProbeRequest {
            method: self.method,
            url: self.url.replace(VALUE_PLACEHOLDER, &encoded),
            body: self
                .body
                .as_ref()
                .map(|b| b.replace(VALUE_PLACEHOLDER, &encoded)),
        }
    }
}
