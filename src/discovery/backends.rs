// src/discovery/backends.rs
use crate::config::DiscoveryConfig;
use crate::discovery::kubectl::{kubectl, parse_pod_names, pod_args};
use crate::discovery::DiscoveryError;
use async_trait::async_trait;
use tracing::info;

/// Lists the backend identities to cycle over.
#[async_trait]
pub trait BackendSource: Send + Sync {
    async fn backends(&self) -> Result<Vec<String>, DiscoveryError>;

    fn name(&self) -> &'static str;
}

/// Running pods of a deployment, selected by label.
pub struct KubectlPods {
    pub namespace: String,
    pub selector: String,
}

#[async_trait]
impl BackendSource for KubectlPods {
    async fn backends(&self) -> Result<Vec<String>, DiscoveryError> {
        let stdout = kubectl(&pod_args(&self.namespace, &self.selector)).await?;
        let pods = parse_pod_names(&stdout);
        if pods.is_empty() {
            return Err(DiscoveryError::NoBackends {
                selector: self.selector.clone(),
                namespace: self.namespace.clone(),
            });
        }
        info!("Pods found: {:?}", pods);
        Ok(pods)
    }

    fn name(&self) -> &'static str {
        "kubectl"
    }
}

pub struct StaticBackends {
    pub ids: Vec<String>,
}

#[async_trait]
impl BackendSource for StaticBackends {
    async fn backends(&self) -> Result<Vec<String>, DiscoveryError> {
        Ok(self.ids.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

pub fn select_backend_source(configured: &[String], config: &DiscoveryConfig) -> Box<dyn BackendSource> {
    if configured.is_empty() {
        Box::new(KubectlPods {
            namespace: config.namespace.clone(),
            selector: config.pod_selector(),
        })
    } else {
        Box::new(StaticBackends {
            ids: configured.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_list_wins() {
        let ids = vec!["pod-a".to_string(), "pod-b".to_string()];
        let source = select_backend_source(&ids, &DiscoveryConfig::default());
        assert_eq!(source.name(), "static");
        assert_eq!(source.backends().await.unwrap(), ids);
    }

    #[test]
    fn test_kubectl_when_nothing_configured() {
        let source = select_backend_source(&[], &DiscoveryConfig::default());
        assert_eq!(source.name(), "kubectl");
    }
}
