// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::{HttpClientConfig, HttpMethod};
use crate::errors::TransportError;
use crate::template::ProbeRequest;

/// Maximum response body size (10MB) to prevent memory exhaustion
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

const DEFAULT_POOL_IDLE_PER_HOST: usize = 32;
const DEFAULT_POOL_MAX_IDLE_TIMEOUT: u64 = 90;

/// Base delay between socket-level retries
const RETRY_BACKOFF_MS: u64 = 100;

/// Transport collaborator used by the requester
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ProbeRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    timeout: Duration,
    max_retries: u32,
    max_body_size: usize,
}

impl HttpClient {
    pub fn new(timeout_secs: u64, max_retries: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .pool_max_idle_per_host(DEFAULT_POOL_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_MAX_IDLE_TIMEOUT))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
            max_body_size: MAX_BODY_SIZE,
        })
    }

    pub fn from_config(config: &HttpClientConfig) -> Result<Self> {
        Self::new(config.timeout_secs, config.max_retries)
    }

    async fn execute(&self, request: &ProbeRequest) -> Result<HttpResponse, TransportError> {
        let mut attempts = 0;

        loop {
            match self.send_once(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempts < self.max_retries => {
                    attempts += 1;
                    let delay = backoff_with_jitter(attempts);
                    warn!(
                        "Request to {} failed ({}), retry {}/{} in {:?}",
                        request.url, e, attempts, self.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, request: &ProbeRequest) -> Result<HttpResponse, TransportError> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self
                .client
                .post(&request.url)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(request.body.clone().unwrap_or_default()),
        };

        // Elapsed time covers the full round trip including the body
        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;

        let status_code = response.status().as_u16();
        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        let body = if body_bytes.len() > self.max_body_size {
            String::from_utf8_lossy(&body_bytes[..self.max_body_size]).to_string()
        } else {
            String::from_utf8_lossy(&body_bytes).to_string()
        };

        debug!(
            "{:?} {} -> {} ({} bytes, {:.1}ms)",
            request.method,
            request.url,
            status_code,
            body.len(),
            duration_ms
        );

        Ok(HttpResponse {
            status_code,
            body,
            duration_ms,
        })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: &ProbeRequest) -> Result<HttpResponse, TransportError> {
        self.execute(request).await
    }
}

/// Linear backoff with +/-30% jitter
fn backoff_with_jitter(attempt: u32) -> Duration {
    let base = (RETRY_BACKOFF_MS * attempt as u64) as f64;
    let jitter_range = base * 0.3;
    let jitter = rand::rng().random_range(-jitter_range..=jitter_range);
    Duration::from_millis((base + jitter).max(0.0) as u64)
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
    /// Wall-clock round trip in milliseconds
    pub duration_ms: f64,
}
