// src/discovery/mod.rs
//
// Collaborators that produce the endpoint and backend set a run consumes.
// Both are resolved once, before dispatch starts.
mod backends;
pub mod kubectl;
mod resolver;

pub use backends::{select_backend_source, BackendSource, KubectlPods, StaticBackends};
pub use resolver::{select_resolver, EndpointResolver, IngressResolver, LocalResolver};

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Failed to run kubectl: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("`{command}` exited with status {status:?}: {stderr}")]
    Command {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Ingress {ingress} has no load balancer address yet")]
    EmptyIngressHost { ingress: String },

    #[error("No running pods match {selector} in namespace {namespace}")]
    NoBackends { selector: String, namespace: String },
}
