// src/discovery/resolver.rs
use crate::config::DiscoveryConfig;
use crate::discovery::kubectl::{ingress_args, kubectl, parse_ingress_host};
use crate::discovery::DiscoveryError;
use crate::probe::Endpoint;
use async_trait::async_trait;
use tracing::info;

/// Finds the entry point the probes are sent to.
#[async_trait]
pub trait EndpointResolver: Send + Sync {
    async fn resolve(&self) -> Result<Endpoint, DiscoveryError>;

    fn name(&self) -> &'static str;
}

/// Reads the external address of an ingress through kubectl.
pub struct IngressResolver {
    pub ingress_name: String,
    pub namespace: String,
    pub port: u16,
}

#[async_trait]
impl EndpointResolver for IngressResolver {
    async fn resolve(&self) -> Result<Endpoint, DiscoveryError> {
        let stdout = kubectl(&ingress_args(&self.ingress_name, &self.namespace)).await?;
        let host = parse_ingress_host(&stdout).ok_or_else(|| DiscoveryError::EmptyIngressHost {
            ingress: self.ingress_name.clone(),
        })?;
        Ok(Endpoint::new(host, self.port))
    }

    fn name(&self) -> &'static str {
        "ingress"
    }
}

/// A fixed address, e.g. a local port-forward.
pub struct LocalResolver {
    pub endpoint: Endpoint,
}

#[async_trait]
impl EndpointResolver for LocalResolver {
    async fn resolve(&self) -> Result<Endpoint, DiscoveryError> {
        Ok(self.endpoint.clone())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// An explicit endpoint wins; otherwise the service-account token decides
/// between the in-cluster ingress and the local port-forward.
pub fn select_resolver(
    explicit: Option<&Endpoint>,
    config: &DiscoveryConfig,
) -> Box<dyn EndpointResolver> {
    if let Some(endpoint) = explicit {
        return Box::new(LocalResolver {
            endpoint: endpoint.clone(),
        });
    }

    if config.service_account_token.exists() {
        info!("Running in cluster. Using ingress {}", config.ingress_name);
        Box::new(IngressResolver {
            ingress_name: config.ingress_name.clone(),
            namespace: config.namespace.clone(),
            port: config.ingress_port,
        })
    } else {
        info!("Running locally. Using port-forwarded connection.");
        Box::new(LocalResolver {
            endpoint: Endpoint::new(config.local_host.clone(), config.local_port),
        })
    }
}
