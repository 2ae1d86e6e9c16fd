// src/config/models.rs
use anyhow::{ensure, Result};
use reqwest::header::HeaderName;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::probe::Endpoint;

pub const DEFAULT_REQUESTS: usize = 50;
pub const SERVICE_ACCOUNT_TOKEN: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Number of ticks in a run.
    pub requests: usize,
    pub probe: ProbeSettings,
    /// Skips endpoint discovery when set.
    pub endpoint: Option<Endpoint>,
    pub discovery: DiscoveryConfig,
    /// Skips pod discovery when non-empty.
    pub backends: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            requests: DEFAULT_REQUESTS,
            probe: ProbeSettings::default(),
            endpoint: None,
            discovery: DiscoveryConfig::default(),
            backends: Vec::new(),
        }
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<()> {
        self.probe.validate()?;
        if let Some(endpoint) = &self.endpoint {
            ensure!(!endpoint.host.is_empty(), "endpoint.host must not be empty");
            ensure!(endpoint.port > 0, "endpoint.port must be greater than 0");
        }
        ensure!(
            self.backends.iter().all(|b| !b.trim().is_empty()),
            "backends must not contain blank identifiers"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub timeout_secs: u64,
    pub path: String,
    /// Header carrying the backend identity to the entry point.
    pub routing_header: String,
    pub body_excerpt_chars: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            path: "/".to_string(),
            routing_header: "Host".to_string(),
            body_excerpt_chars: 100,
        }
    }
}

impl ProbeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.timeout_secs > 0, "probe.timeout_secs must be greater than 0");
        ensure!(
            self.body_excerpt_chars > 0,
            "probe.body_excerpt_chars must be greater than 0"
        );
        ensure!(self.path.starts_with('/'), "probe.path must start with '/'");
        ensure!(
            HeaderName::from_bytes(self.routing_header.as_bytes()).is_ok(),
            "probe.routing_header '{}' is not a valid header name",
            self.routing_header
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub ingress_name: String,
    pub ingress_port: u16,
    pub local_host: String,
    pub local_port: u16,
    pub deployment: String,
    pub namespace: String,
    pub label_key: String,
    pub service_account_token: PathBuf,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            ingress_name: "add-app-ingress".to_string(),
            ingress_port: 80,
            local_host: "localhost".to_string(),
            local_port: 8080,
            deployment: "add-app".to_string(),
            namespace: "default".to_string(),
            label_key: "app".to_string(),
            service_account_token: PathBuf::from(SERVICE_ACCOUNT_TOKEN),
        }
    }
}

impl DiscoveryConfig {
    pub fn pod_selector(&self) -> String {
        format!("{}={}", self.label_key, self.deployment)
    }
}
