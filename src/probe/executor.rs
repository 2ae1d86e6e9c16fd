// src/probe/executor.rs
use crate::config::ProbeSettings;
use crate::probe::{Endpoint, ProbeOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::HeaderName;
use reqwest::Client;
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Performs one timed request for a backend identity.
///
/// Implementations must always return an outcome; transport problems are
/// reported as `ProbeStatus::Failure`, never as an error or a panic.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, endpoint: &Endpoint, target: &str, limit: Duration) -> ProbeOutcome;

    fn name(&self) -> &'static str;
}

/// HTTP GET against the shared entry point, with the target identity carried
/// in a routing header.
pub struct HttpProbe {
    client: Client,
    path: String,
    routing_header: HeaderName,
    excerpt_chars: usize,
}

impl HttpProbe {
    pub fn new(settings: &ProbeSettings) -> Result<Self> {
        // The per-request bound is applied in `probe`, around send and body read.
        let client = Client::builder()
            .no_proxy()
            .build()
            .context("Failed to create HTTP client")?;

        let routing_header = HeaderName::from_bytes(settings.routing_header.as_bytes())
            .with_context(|| format!("Invalid routing header '{}'", settings.routing_header))?;

        Ok(Self {
            client,
            path: settings.path.clone(),
            routing_header,
            excerpt_chars: settings.body_excerpt_chars,
        })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, endpoint: &Endpoint, target: &str, limit: Duration) -> ProbeOutcome {
        let start = Instant::now();
        let url = match endpoint.url(&self.path) {
            Ok(url) => url,
            Err(e) => {
                let message = format!("invalid endpoint {}: {}", endpoint, e);
                warn!(%target, %message, "probe failed");
                return ProbeOutcome::failure(target, message, start.elapsed());
            }
        };

        let request = self
            .client
            .get(url)
            .header(self.routing_header.clone(), target);

        let cap = excerpt_byte_cap(self.excerpt_chars);
        let result = timeout(limit, async {
            let mut response = request.send().await?;
            let code = response.status().as_u16();

            // Drain the whole body so latency covers the full response, but
            // only keep enough bytes for the excerpt.
            let mut kept = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                keep_prefix(&mut kept, &chunk, cap);
            }
            Ok::<_, reqwest::Error>((code, kept))
        })
        .await;
        let latency = start.elapsed();

        match result {
            Ok(Ok((code, body))) => {
                debug!(%target, code, ?latency, "probe answered");
                let body = String::from_utf8_lossy(&body);
                ProbeOutcome::success(target, code, &body, self.excerpt_chars, latency)
            }
            Ok(Err(e)) => {
                let message = describe(&e);
                warn!(%target, %message, ?latency, "probe failed");
                ProbeOutcome::failure(target, message, latency)
            }
            Err(_) => {
                let message = format!("request timed out after {:?}", limit);
                warn!(%target, %message, "probe failed");
                ProbeOutcome::failure(target, message, latency)
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Bytes needed to hold `chars` UTF-8 characters.
fn excerpt_byte_cap(chars: usize) -> usize {
    chars.saturating_mul(4)
}

/// Appends as much of `chunk` as fits under `cap` bytes.
fn keep_prefix(kept: &mut Vec<u8>, chunk: &[u8], cap: usize) {
    let room = cap.saturating_sub(kept.len());
    kept.extend_from_slice(&chunk[..room.min(chunk.len())]);
}

/// Error message with its source chain, e.g. `error sending request: connection refused`.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
