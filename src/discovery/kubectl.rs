// src/discovery/kubectl.rs
use crate::discovery::DiscoveryError;
use tokio::process::Command;
use tracing::debug;

pub const INGRESS_ADDRESS_JSONPATH: &str =
    "jsonpath={.status.loadBalancer.ingress[0].ip}{.status.loadBalancer.ingress[0].hostname}";
pub const POD_NAMES_JSONPATH: &str = "jsonpath={.items[*].metadata.name}";

/// Runs `kubectl` with `args` and returns its stdout.
pub async fn kubectl(args: &[String]) -> Result<String, DiscoveryError> {
    debug!("Running command: kubectl {}", args.join(" "));

    let output = Command::new("kubectl")
        .args(args)
        .output()
        .await
        .map_err(DiscoveryError::Spawn)?;

    if !output.status.success() {
        return Err(DiscoveryError::Command {
            command: format!("kubectl {}", args.join(" ")),
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub fn ingress_args(name: &str, namespace: &str) -> Vec<String> {
    vec![
        "get".into(),
        "ingress".into(),
        name.into(),
        "-n".into(),
        namespace.into(),
        "-o".into(),
        INGRESS_ADDRESS_JSONPATH.into(),
    ]
}

pub fn pod_args(namespace: &str, selector: &str) -> Vec<String> {
    vec![
        "get".into(),
        "pods".into(),
        "-n".into(),
        namespace.into(),
        "-l".into(),
        selector.into(),
        "-o".into(),
        POD_NAMES_JSONPATH.into(),
    ]
}

/// Ingress address is either an IP or a hostname; only one is ever set.
pub fn parse_ingress_host(stdout: &str) -> Option<String> {
    let host = stdout.trim();
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

pub fn parse_pod_names(stdout: &str) -> Vec<String> {
    stdout.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pod_names() {
        assert_eq!(
            parse_pod_names("add-app-7d9f-abc add-app-7d9f-def\n"),
            vec!["add-app-7d9f-abc", "add-app-7d9f-def"]
        );
        assert!(parse_pod_names("  \n").is_empty());
    }

    #[test]
    fn test_parse_ingress_host() {
        assert_eq!(parse_ingress_host("10.1.2.3\n"), Some("10.1.2.3".to_string()));
        assert_eq!(
            parse_ingress_host("lb.example.com"),
            Some("lb.example.com".to_string())
        );
        assert_eq!(parse_ingress_host(""), None);
    }

    #[test]
    fn test_pod_args_use_selector() {
        let args = pod_args("default", "app=add-app");
        assert_eq!(&args[..6], ["get", "pods", "-n", "default", "-l", "app=add-app"]);
        assert_eq!(args[7], POD_NAMES_JSONPATH);
    }
}
